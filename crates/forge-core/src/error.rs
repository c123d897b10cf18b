//! Error types for project generation
//!
//! Every fatal failure in the build pipeline is a [`ForgeError`]. The builder
//! converts these into a failed [`BuildOutcome`](crate::builder::BuildOutcome),
//! so no error escapes a build unhandled.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for the generation pipeline
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The build configuration failed a structural check
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// No template directory exists for the requested framework/variant
    #[error("Template not found for framework: {framework} (looked in {path})")]
    TemplateNotFound { framework: String, path: PathBuf },

    /// A `replace` directive carries a malformed regular expression
    #[error("Invalid pattern '{pattern}' for {file}: {source}")]
    InvalidPattern {
        file: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Filesystem failure while reading or writing the generated tree
    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive writer reported an error
    #[error("Failed to write archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The merged package manifest could not be serialized
    #[error("Failed to serialize package manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A settings file could not be parsed
    #[error("Failed to parse settings at {}: {message}", path.display())]
    Settings { path: PathBuf, message: String },

    /// The file-write concurrency gate was closed
    #[error("Concurrency gate closed: {0}")]
    Gate(#[from] tokio::sync::AcquireError),

    /// A background task panicked or was aborted
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ForgeError {
    /// Wrap an I/O error with the action and path that produced it
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for generation operations
pub type Result<T> = std::result::Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_mentions_action_and_path() {
        let err = ForgeError::io(
            "write",
            "/tmp/app/src/main.ts",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("Failed to write /tmp/app/src/main.ts"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn template_not_found_names_framework() {
        let err = ForgeError::TemplateNotFound {
            framework: "nextjs".to_string(),
            path: PathBuf::from("templates/nextjs/app-tail-es"),
        };
        assert!(err.to_string().contains("nextjs"));
    }
}
