//! Build orchestration and cleanup
//!
//! [`ProjectBuilder`] runs one build in its own working directory:
//! template copy, `package.json` merge, additional files, patches, archive.
//! Any stage error becomes a [`BuildOutcome::Failure`]. Cleanup is explicit:
//! the caller releases the working directory and the archive once the archive
//! has been delivered.

use crate::archive::build_archive;
use crate::config::{BuildConfig, ForgeSettings};
use crate::error::{ForgeError, Result};
use crate::patch::{apply_patches, write_additional_files};
use crate::plugins::{self, ModuleList};
use crate::templates::{copy_template, resolve_template, write_manifest};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Paths produced by a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifacts {
    pub project_path: PathBuf,
    pub archive_path: PathBuf,
    pub archive_name: String,
}

/// Uniform result of a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Success(BuildArtifacts),
    Failure { error: String },
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Success(_))
    }

    pub fn artifacts(&self) -> Option<&BuildArtifacts> {
        match self {
            BuildOutcome::Success(artifacts) => Some(artifacts),
            BuildOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            BuildOutcome::Success(_) => None,
            BuildOutcome::Failure { error } => Some(error),
        }
    }

    pub fn into_result(self) -> std::result::Result<BuildArtifacts, String> {
        match self {
            BuildOutcome::Success(artifacts) => Ok(artifacts),
            BuildOutcome::Failure { error } => Err(error),
        }
    }
}

/// One build request and its isolated working directory
pub struct ProjectBuilder {
    config: BuildConfig,
    settings: ForgeSettings,
    build_id: Uuid,
    project_path: PathBuf,
}

impl ProjectBuilder {
    pub fn new(config: BuildConfig, settings: ForgeSettings) -> Self {
        let build_id = Uuid::new_v4();
        let project_path = settings
            .builds_dir()
            .join(format!("{}-{}", config.app_name, build_id.simple()));

        Self {
            config,
            settings,
            build_id,
            project_path,
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn build_id(&self) -> Uuid {
        self.build_id
    }

    /// Working directory of this build (may not exist yet)
    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Feature modules this build applies
    pub fn modules(&self) -> ModuleList {
        plugins::select(&self.config)
    }

    /// Run the whole pipeline; never returns an error, only a failed outcome
    pub async fn build(&self) -> BuildOutcome {
        tracing::info!(
            app = %self.config.app_name,
            framework = self.config.framework.as_str(),
            build_id = %self.build_id,
            "Starting build"
        );

        match self.run().await {
            Ok(artifacts) => {
                tracing::info!(archive = %artifacts.archive_path.display(), "Build completed");
                BuildOutcome::Success(artifacts)
            }
            Err(e) => {
                tracing::error!("Build failed: {}", e);
                BuildOutcome::Failure {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn run(&self) -> Result<BuildArtifacts> {
        self.config.validate()?;
        let template = resolve_template(&self.settings.template_dir, &self.config)?;

        let builds_dir = self.settings.builds_dir();
        fs::create_dir_all(&builds_dir)
            .await
            .map_err(|e| ForgeError::io("create directory", &builds_dir, e))?;

        tracing::info!(template = %template.display(), "Copying template");
        let copied = copy_template(&template, &self.project_path).await?;
        tracing::debug!(files = copied.len(), "Template copied");

        let modules = self.modules();
        let names: Vec<&str> = modules.iter().map(|m| m.name()).collect();

        tracing::info!(modules = ?names, "Patching package.json");
        write_manifest(&self.project_path, &modules, &self.config).await?;

        tracing::info!("Creating additional files");
        let created = write_additional_files(&modules, &self.config, &self.project_path).await?;

        tracing::info!("Applying plugin modifications");
        let patched = apply_patches(&modules, &self.config, &self.project_path).await?;
        tracing::debug!(created, patched, "Tree generated");

        tracing::info!("Creating archive");
        self.create_archive(&self.project_path).await
    }

    /// Package `tree`; a failed archive is deleted before the error is returned
    async fn create_archive(&self, tree: &Path) -> Result<BuildArtifacts> {
        let archives_dir = self.settings.archives_dir();
        fs::create_dir_all(&archives_dir)
            .await
            .map_err(|e| ForgeError::io("create directory", &archives_dir, e))?;

        let archive_name = format!(
            "{}-{}-{}.zip",
            self.config.app_name,
            chrono::Utc::now().timestamp_millis(),
            &self.build_id.simple().to_string()[..8]
        );
        let archive_path = archives_dir.join(&archive_name);

        let result = build_archive(
            tree.to_path_buf(),
            self.config.app_name.clone(),
            archive_path.clone(),
        )
        .await;

        match result {
            Ok(summary) => {
                tracing::info!(
                    entries = summary.entries,
                    bytes = summary.bytes,
                    "Archive created: {}",
                    archive_path.display()
                );
                Ok(BuildArtifacts {
                    project_path: self.project_path.clone(),
                    archive_path,
                    archive_name,
                })
            }
            Err(e) => {
                // A partial archive is never handed out
                release_archive(&archive_path).await;
                Err(e)
            }
        }
    }

    /// Remove this build's working directory
    pub async fn cleanup(&self) {
        release_project_dir(&self.project_path).await;
    }
}

/// Recursively remove a working directory; absence is not an error
pub async fn release_project_dir(path: &Path) {
    match fs::remove_dir_all(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed working directory"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            "Error removing working directory {}: {}",
            path.display(),
            e
        ),
    }
}

/// Remove an archive file; absence is not an error
pub async fn release_archive(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Archive deleted"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Error deleting archive {}: {}", path.display(), e),
    }
}

/// Remove an archive after `delay`, giving a slow client time to finish
pub fn release_archive_after(path: PathBuf, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        release_archive(&path).await;
    })
}
