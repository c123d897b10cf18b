//! Forge Core - composition, patching and packaging of generated projects
//!
//! A build copies a base template, lets the selected feature modules describe
//! their changes, applies those changes, and packages the tree into a zip.
//!
//! # Architecture
//!
//! - **Feature modules** ([`plugins`]) - pure descriptions of dependencies,
//!   text patches and extra files, selected per configuration
//! - **Stages** ([`templates`], [`patch`], [`archive`]) - manifest merge,
//!   additional files, bounded-concurrency patching, zip streaming
//! - **Orchestration** ([`builder`]) - one isolated working directory per
//!   build, uniform outcomes, explicit cleanup
//! - **CLI/TUI Interface** - optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use forge_core::{BuildConfig, ForgeSettings, Framework, ProjectBuilder};
//!
//! let config = BuildConfig::new("shop", Framework::Vue);
//! let builder = ProjectBuilder::new(config, ForgeSettings::load(None)?);
//! let outcome = builder.build().await;
//! ```

pub mod archive;
pub mod builder;
pub mod config;
pub mod error;
pub mod patch;
pub mod plugins;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use builder::{
    release_archive, release_archive_after, release_project_dir, BuildArtifacts, BuildOutcome,
    ProjectBuilder,
};
pub use config::{
    BuildConfig, ForgeSettings, Framework, Linting, PackageManager, Routing, StateManager, Styling,
};
pub use error::{ForgeError, Result};
pub use plugins::{AdditionalFile, DependencySet, FeatureModule, PatchDirective, PatchOp};

#[cfg(feature = "tui")]
pub use tui::run;
