//! Build configuration and process settings
//!
//! This module provides:
//! - The per-request [`BuildConfig`] and its option enums
//! - Process-wide [`ForgeSettings`] (template and temp roots)

pub mod settings;

use crate::error::{ForgeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use settings::ForgeSettings;

/// Target framework of the generated application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    React,
    Vue,
    Svelte,
    #[serde(alias = "next")]
    Nextjs,
}

impl Framework {
    pub const ALL: [Framework; 4] = [
        Framework::React,
        Framework::Vue,
        Framework::Svelte,
        Framework::Nextjs,
    ];

    /// Identifier used in template paths and requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::React => "react",
            Framework::Vue => "vue",
            Framework::Svelte => "svelte",
            Framework::Nextjs => "nextjs",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::React => "React",
            Framework::Vue => "Vue",
            Framework::Svelte => "Svelte",
            Framework::Nextjs => "Next.js",
        }
    }

    /// Frameworks whose generated sources are TypeScript/TSX
    pub fn is_typescript(&self) -> bool {
        matches!(self, Framework::React | Framework::Nextjs)
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Routing choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Routing {
    #[default]
    None,
    ReactRouter,
    VueRouter,
    #[serde(alias = "app")]
    AppRouter,
    #[serde(alias = "pages")]
    PagesRouter,
}

impl Routing {
    pub const ALL: [Routing; 5] = [
        Routing::None,
        Routing::ReactRouter,
        Routing::VueRouter,
        Routing::AppRouter,
        Routing::PagesRouter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Routing::None => "none",
            Routing::ReactRouter => "react-router",
            Routing::VueRouter => "vue-router",
            Routing::AppRouter => "app-router",
            Routing::PagesRouter => "pages-router",
        }
    }
}

/// Styling choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Styling {
    #[default]
    None,
    Tailwind,
    CssModules,
}

impl Styling {
    pub const ALL: [Styling; 3] = [Styling::None, Styling::Tailwind, Styling::CssModules];

    pub fn as_str(&self) -> &'static str {
        match self {
            Styling::None => "none",
            Styling::Tailwind => "tailwind",
            Styling::CssModules => "css-modules",
        }
    }
}

/// State-manager choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateManager {
    #[default]
    None,
    ReduxToolkit,
    Zustand,
    Pinia,
}

impl StateManager {
    pub const ALL: [StateManager; 4] = [
        StateManager::None,
        StateManager::ReduxToolkit,
        StateManager::Zustand,
        StateManager::Pinia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateManager::None => "none",
            StateManager::ReduxToolkit => "redux-toolkit",
            StateManager::Zustand => "zustand",
            StateManager::Pinia => "pinia",
        }
    }
}

/// Linting choice (selects the Next.js template variant)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linting {
    #[default]
    Eslint,
    Biome,
    None,
}

impl Linting {
    pub const ALL: [Linting; 3] = [Linting::Eslint, Linting::Biome, Linting::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            Linting::Eslint => "eslint",
            Linting::Biome => "biome",
            Linting::None => "none",
        }
    }
}

/// Package manager the generated project is meant to be installed with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Bun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Command that installs the generated project's dependencies
    pub fn install_command(&self) -> String {
        match self {
            PackageManager::Yarn => "yarn".to_string(),
            other => format!("{} install", other.as_str()),
        }
    }

    /// Command that runs a package.json script
    pub fn run_command(&self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {}", script),
            other => format!("{} {}", other.as_str(), script),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything one build request asks for. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    pub app_name: String,

    #[serde(default)]
    pub package_manager: PackageManager,

    pub framework: Framework,

    #[serde(default)]
    pub routing: Routing,

    #[serde(default)]
    pub styling: Styling,

    #[serde(default)]
    pub state_manager: StateManager,

    #[serde(default)]
    pub linting: Linting,

    /// Additional runtime dependencies as `name` or `name@version`
    #[serde(default)]
    pub extra_dependencies: Vec<String>,
}

impl BuildConfig {
    /// Config with every optional axis left at its default
    pub fn new(app_name: impl Into<String>, framework: Framework) -> Self {
        Self {
            app_name: app_name.into(),
            package_manager: PackageManager::default(),
            framework,
            routing: Routing::default(),
            styling: Styling::default(),
            state_manager: StateManager::default(),
            linting: Linting::default(),
            extra_dependencies: Vec::new(),
        }
    }

    /// Check that the application name can be used as a single path segment
    pub fn validate(&self) -> Result<()> {
        let name = self.app_name.as_str();
        let invalid = |reason: &str| ForgeError::InvalidConfig {
            message: format!("application name '{}' {}", name, reason),
        };

        if name.trim().is_empty() {
            return Err(invalid("is empty"));
        }
        if name == "." || name == ".." {
            return Err(invalid("is a relative path component"));
        }
        if name.chars().any(|c| matches!(c, '/' | '\\' | '\0')) {
            return Err(invalid("contains a path separator"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_json() {
        let config: BuildConfig = serde_json::from_str(
            r#"{
                "appName": "shop",
                "packageManager": "pnpm",
                "framework": "vue",
                "routing": "vue-router",
                "styling": "tailwind",
                "stateManager": "pinia"
            }"#,
        )
        .unwrap();

        assert_eq!(config.app_name, "shop");
        assert_eq!(config.package_manager, PackageManager::Pnpm);
        assert_eq!(config.framework, Framework::Vue);
        assert_eq!(config.routing, Routing::VueRouter);
        assert_eq!(config.styling, Styling::Tailwind);
        assert_eq!(config.state_manager, StateManager::Pinia);
        assert_eq!(config.linting, Linting::Eslint);
        assert!(config.extra_dependencies.is_empty());
    }

    #[test]
    fn test_routing_aliases() {
        let pages: Routing = serde_json::from_str(r#""pages""#).unwrap();
        let app: Routing = serde_json::from_str(r#""app""#).unwrap();
        assert_eq!(pages, Routing::PagesRouter);
        assert_eq!(app, Routing::AppRouter);
    }

    #[test]
    fn test_validate_rejects_path_like_names() {
        for name in ["", "  ", ".", "..", "a/b", "a\\b"] {
            let config = BuildConfig::new(name, Framework::React);
            assert!(config.validate().is_err(), "accepted '{}'", name);
        }
        assert!(BuildConfig::new("my-app", Framework::React).validate().is_ok());
    }

    #[test]
    fn test_package_manager_commands() {
        assert_eq!(PackageManager::Npm.install_command(), "npm install");
        assert_eq!(PackageManager::Yarn.install_command(), "yarn");
        assert_eq!(PackageManager::Npm.run_command("dev"), "npm run dev");
        assert_eq!(PackageManager::Bun.run_command("dev"), "bun dev");
    }
}
