//! Feature modules and the registry that selects them
//!
//! A feature module only *describes* changes: dependencies to add, text
//! patches to apply, and whole files to create. The pipeline in
//! [`crate::builder`] performs all I/O.
//!
//! Selection order is fixed (routing, then state manager, then styling) and
//! determines both the dependency merge order and the order of directives
//! that target the same file.

mod css_modules;
mod pinia;
mod react_router;
mod redux_toolkit;
mod tailwind;
mod vue_router;
mod zustand;

use crate::config::{BuildConfig, Framework, Routing, StateManager, Styling};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runtime and development dependencies, package name to version constraint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencySet {
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dependency(mut self, name: &str, version: &str) -> Self {
        self.dependencies.insert(name.to_string(), version.to_string());
        self
    }

    pub fn dev_dependency(mut self, name: &str, version: &str) -> Self {
        self.dev_dependencies
            .insert(name.to_string(), version.to_string());
        self
    }

    /// Fold another set into this one; `other` wins on shared package names
    pub fn extend(&mut self, other: DependencySet) {
        self.dependencies.extend(other.dependencies);
        self.dev_dependencies.extend(other.dev_dependencies);
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }
}

/// What a directive does to its file's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PatchOp {
    /// Substitute every non-overlapping match of `pattern` (a regex)
    Replace { pattern: String, replacement: String },
    /// Add `content` after the existing text
    Append { content: String },
    /// Add `content` before the existing text
    Prepend { content: String },
}

/// A textual change to one file, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchDirective {
    pub file: String,
    #[serde(flatten)]
    pub op: PatchOp,
}

impl PatchDirective {
    pub fn replace(file: &str, pattern: &str, replacement: &str) -> Self {
        Self {
            file: file.to_string(),
            op: PatchOp::Replace {
                pattern: pattern.to_string(),
                replacement: replacement.to_string(),
            },
        }
    }

    pub fn append(file: &str, content: &str) -> Self {
        Self {
            file: file.to_string(),
            op: PatchOp::Append {
                content: content.to_string(),
            },
        }
    }

    pub fn prepend(file: &str, content: &str) -> Self {
        Self {
            file: file.to_string(),
            op: PatchOp::Prepend {
                content: content.to_string(),
            },
        }
    }
}

/// A file created verbatim in the generated project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalFile {
    pub path: String,
    pub content: String,
}

impl AdditionalFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// A stateless capability unit contributing to the generated project
///
/// Every method must be deterministic and free of side effects.
pub trait FeatureModule: Send + Sync {
    /// Short identifier shown in logs and listings
    fn name(&self) -> &'static str;

    /// Packages this module adds to `package.json`
    fn dependencies(&self, config: &BuildConfig) -> DependencySet;

    /// Ordered text patches this module applies
    fn patches(&self, config: &BuildConfig) -> Vec<PatchDirective>;

    /// Whole files this module creates
    fn additional_files(&self, _config: &BuildConfig) -> Vec<AdditionalFile> {
        Vec::new()
    }
}

/// Modules selected for one build, in selection order
pub type ModuleList = Vec<&'static dyn FeatureModule>;

/// One option on one feature axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisOption {
    Routing(Routing),
    State(StateManager),
    Styling(Styling),
}

/// Registry entry: an option, the frameworks it is compatible with, and its module
struct Registration {
    option: AxisOption,
    frameworks: &'static [Framework],
    module: &'static dyn FeatureModule,
}

static REGISTRY: &[Registration] = &[
    Registration {
        option: AxisOption::Routing(Routing::ReactRouter),
        frameworks: &[Framework::React],
        module: &react_router::ReactRouter,
    },
    Registration {
        option: AxisOption::Routing(Routing::VueRouter),
        frameworks: &[Framework::Vue],
        module: &vue_router::VueRouter,
    },
    Registration {
        option: AxisOption::State(StateManager::ReduxToolkit),
        frameworks: &[Framework::React],
        module: &redux_toolkit::ReduxToolkit,
    },
    Registration {
        option: AxisOption::State(StateManager::Zustand),
        frameworks: &[Framework::React],
        module: &zustand::Zustand,
    },
    Registration {
        option: AxisOption::State(StateManager::Pinia),
        frameworks: &[Framework::Vue],
        module: &pinia::Pinia,
    },
    Registration {
        option: AxisOption::Styling(Styling::Tailwind),
        frameworks: &Framework::ALL,
        module: &tailwind::Tailwind,
    },
    // Next.js would gain redundant `src/types` declarations from CSS Modules
    Registration {
        option: AxisOption::Styling(Styling::CssModules),
        frameworks: &[Framework::React, Framework::Vue],
        module: &css_modules::CssModules,
    },
];

/// Select the feature modules that apply to a configuration
///
/// Each axis contributes at most one module, and only when its option is
/// registered for the chosen framework. Unknown combinations select nothing.
pub fn select(config: &BuildConfig) -> ModuleList {
    let axes = [
        AxisOption::Routing(config.routing),
        AxisOption::State(config.state_manager),
        AxisOption::Styling(config.styling),
    ];

    axes.iter()
        .filter_map(|wanted| {
            REGISTRY.iter().find(|entry| {
                entry.option == *wanted && entry.frameworks.contains(&config.framework)
            })
        })
        .map(|entry| entry.module)
        .collect()
}
