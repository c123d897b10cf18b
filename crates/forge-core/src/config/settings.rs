//! Process-wide settings: where templates live and where builds are staged

use crate::error::{ForgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the template root
pub const TEMPLATE_DIR_ENV: &str = "STACKFORGE_TEMPLATE_DIR";

/// Environment variable overriding the temporary-storage root
pub const TEMP_DIR_ENV: &str = "STACKFORGE_TEMP_DIR";

/// Settings shared by every build in the process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeSettings {
    /// Root directory holding the base templates
    pub template_dir: PathBuf,

    /// Root under which working directories and archives are created
    pub temp_dir: PathBuf,

    /// Seconds to keep an archive after it was handed to the client
    pub archive_grace_secs: u64,
}

impl Default for ForgeSettings {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("templates"),
            temp_dir: std::env::temp_dir(),
            archive_grace_secs: 5,
        }
    }
}

impl ForgeSettings {
    /// Load settings from an optional YAML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(settings.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Parse a YAML settings file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ForgeError::io("read", path, e))?;
        serde_yaml::from_str(&content).map_err(|e| ForgeError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply overrides looked up by environment variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(TEMPLATE_DIR_ENV).filter(|v| !v.is_empty()) {
            self.template_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(TEMP_DIR_ENV).filter(|v| !v.is_empty()) {
            self.temp_dir = PathBuf::from(dir);
        }
        self
    }

    /// Parent of every per-build working directory
    pub fn builds_dir(&self) -> PathBuf {
        self.temp_dir.join("project-builds")
    }

    /// Directory archives are written to
    pub fn archives_dir(&self) -> PathBuf {
        self.temp_dir.join("project-archives")
    }

    pub fn archive_grace(&self) -> Duration {
        Duration::from_secs(self.archive_grace_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stackforge.yaml");
        std::fs::write(&path, "template_dir: /srv/templates\n").unwrap();

        let settings = ForgeSettings::from_file(&path).unwrap();
        assert_eq!(settings.template_dir, PathBuf::from("/srv/templates"));
        assert_eq!(settings.archive_grace_secs, 5);
        assert_eq!(settings.temp_dir, std::env::temp_dir());
    }

    #[test]
    fn test_malformed_file_is_settings_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stackforge.yaml");
        std::fs::write(&path, "archive_grace_secs: [not, a, number]\n").unwrap();

        let err = ForgeSettings::from_file(&path).unwrap_err();
        assert!(matches!(err, ForgeError::Settings { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let settings = ForgeSettings::default().with_overrides(|key| match key {
            TEMPLATE_DIR_ENV => Some("/opt/templates".to_string()),
            TEMP_DIR_ENV => Some(String::new()),
            _ => None,
        });

        assert_eq!(settings.template_dir, PathBuf::from("/opt/templates"));
        // Empty values are ignored
        assert_eq!(settings.temp_dir, std::env::temp_dir());
        assert_eq!(
            settings.builds_dir(),
            std::env::temp_dir().join("project-builds")
        );
    }
}
