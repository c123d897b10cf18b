//! `package.json` merging
//!
//! The base template's manifest is combined with every selected module's
//! dependency declarations. Modules are folded in selection order, so a later
//! module's version for a package replaces an earlier one, and the fold in turn
//! replaces whatever the template declared.

use crate::config::{BuildConfig, Framework};
use crate::error::{ForgeError, Result};
use crate::plugins::{DependencySet, FeatureModule};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Manifest file name inside the project
pub const PACKAGE_JSON: &str = "package.json";

/// Version used for extra dependencies given without one
const LATEST: &str = "latest";

/// Manifest used when the template has none, or an unparsable one
pub fn default_manifest(config: &BuildConfig) -> Map<String, Value> {
    let base = match config.framework {
        Framework::React => json!({
            "dependencies": {
                "react": "^18.2.0",
                "react-dom": "^18.2.0"
            },
            "devDependencies": {
                "vite": "^5.0.0",
                "@vitejs/plugin-react": "^4.2.1",
                "typescript": "^5.0.0",
                "@types/react": "^18.2.0",
                "@types/react-dom": "^18.2.0"
            },
            "scripts": {
                "dev": "vite",
                "build": "vite build",
                "preview": "vite preview"
            }
        }),
        Framework::Vue => json!({
            "dependencies": {
                "vue": "^3.4.15"
            },
            "devDependencies": {
                "vite": "^5.0.0",
                "@vitejs/plugin-vue": "^5.0.0",
                "typescript": "^5.0.0"
            },
            "scripts": {
                "dev": "vite",
                "build": "vite build",
                "preview": "vite preview"
            }
        }),
        Framework::Svelte => json!({
            "dependencies": {
                "svelte": "^4.2.0"
            },
            "devDependencies": {
                "vite": "^5.0.0",
                "@sveltejs/vite-plugin-svelte": "^3.0.0",
                "typescript": "^5.0.0"
            },
            "scripts": {
                "dev": "vite",
                "build": "vite build",
                "preview": "vite preview"
            }
        }),
        Framework::Nextjs => json!({
            "dependencies": {
                "next": "16.0.6",
                "react": "19.2.0",
                "react-dom": "19.2.0"
            },
            "devDependencies": {
                "@tailwindcss/postcss": "^4",
                "@types/node": "^20",
                "@types/react": "^19",
                "@types/react-dom": "^19",
                "eslint": "^9",
                "eslint-config-next": "16.0.6",
                "tailwindcss": "^4",
                "typescript": "^5"
            },
            "scripts": {
                "dev": "next dev",
                "build": "next build",
                "start": "next start",
                "lint": "eslint"
            }
        }),
    };

    let mut manifest = Map::new();
    manifest.insert("name".to_string(), Value::String(config.app_name.clone()));
    manifest.insert("version".to_string(), Value::String("0.1.0".to_string()));
    manifest.insert("private".to_string(), Value::Bool(true));
    if let Value::Object(fields) = base {
        manifest.extend(fields);
    }
    manifest
}

/// Split `name@version` into its parts, keeping the scope of `@scope/name`
fn parse_extra_dependency(spec: &str) -> (String, String) {
    let spec = spec.trim();
    let split_at = spec
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '@')
        .map(|(idx, _)| idx);

    match split_at {
        Some(idx) if idx + 1 < spec.len() => {
            (spec[..idx].to_string(), spec[idx + 1..].to_string())
        }
        Some(idx) => (spec[..idx].to_string(), LATEST.to_string()),
        None => (spec.to_string(), LATEST.to_string()),
    }
}

/// Fold every module's dependencies in selection order, then the config's extras
pub fn collect_dependencies(modules: &[&dyn FeatureModule], config: &BuildConfig) -> DependencySet {
    let mut fold = DependencySet::new();
    for module in modules {
        fold.extend(module.dependencies(config));
    }

    for spec in config.extra_dependencies.iter().filter(|s| !s.trim().is_empty()) {
        let (name, version) = parse_extra_dependency(spec);
        fold.dependencies.insert(name, version);
    }

    fold
}

/// Overlay `additions` onto the object at `key`, creating it when missing
fn merge_field(manifest: &mut Map<String, Value>, key: &str, additions: &BTreeMap<String, String>) {
    let mut merged = match manifest.get(key) {
        Some(Value::Object(existing)) => existing.clone(),
        _ => Map::new(),
    };

    for (name, version) in additions {
        merged.insert(name.clone(), Value::String(version.clone()));
    }

    manifest.insert(key.to_string(), Value::Object(merged));
}

/// Produce the final manifest from the base file's content (if any)
///
/// A missing or unparsable base falls back to [`default_manifest`]; this is
/// never an error.
pub fn merge_manifest(
    base: Option<&str>,
    modules: &[&dyn FeatureModule],
    config: &BuildConfig,
) -> Map<String, Value> {
    let parsed = base.and_then(|content| serde_json::from_str::<Value>(content).ok());

    let mut manifest = match parsed {
        Some(Value::Object(map)) => map,
        _ => {
            tracing::debug!(
                framework = config.framework.as_str(),
                "Using default package manifest"
            );
            default_manifest(config)
        }
    };

    manifest.insert("name".to_string(), Value::String(config.app_name.clone()));

    let fold = collect_dependencies(modules, config);
    merge_field(&mut manifest, "dependencies", &fold.dependencies);
    merge_field(&mut manifest, "devDependencies", &fold.dev_dependencies);

    let dev_is_empty = matches!(
        manifest.get("devDependencies"),
        Some(Value::Object(dev)) if dev.is_empty()
    );
    if dev_is_empty {
        manifest.shift_remove("devDependencies");
    }

    manifest
}

/// Read, merge and rewrite `package.json` in the project directory
pub async fn write_manifest(
    project_dir: &Path,
    modules: &[&dyn FeatureModule],
    config: &BuildConfig,
) -> Result<()> {
    let path = project_dir.join(PACKAGE_JSON);

    let base = match fs::read_to_string(&path).await {
        Ok(content) => Some(content),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::InvalidData) => None,
        Err(e) => return Err(ForgeError::io("read", &path, e)),
    };

    let manifest = merge_manifest(base.as_deref(), modules, config);
    let mut content = serde_json::to_string_pretty(&Value::Object(manifest))?;
    content.push('\n');

    fs::write(&path, content)
        .await
        .map_err(|e| ForgeError::io("write", &path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{AdditionalFile, PatchDirective};

    struct Declares(&'static str, DependencySet);

    impl FeatureModule for Declares {
        fn name(&self) -> &'static str {
            self.0
        }

        fn dependencies(&self, _config: &BuildConfig) -> DependencySet {
            self.1.clone()
        }

        fn patches(&self, _config: &BuildConfig) -> Vec<PatchDirective> {
            Vec::new()
        }

        fn additional_files(&self, _config: &BuildConfig) -> Vec<AdditionalFile> {
            Vec::new()
        }
    }

    fn config() -> BuildConfig {
        BuildConfig::new("demo", Framework::React)
    }

    #[test]
    fn test_later_module_wins_shared_package() {
        let first = Declares("first", DependencySet::new().dependency("x", "1.0.0"));
        let second = Declares("second", DependencySet::new().dependency("x", "2.0.0"));
        let modules: Vec<&dyn FeatureModule> = vec![&first, &second];

        for _ in 0..3 {
            let manifest = merge_manifest(Some("{}"), &modules, &config());
            assert_eq!(manifest["dependencies"]["x"], "2.0.0");
        }
    }

    #[test]
    fn test_fold_overrides_base_and_keeps_order() {
        let base = r#"{
            "name": "template",
            "version": "0.0.0",
            "dependencies": { "react": "^18.0.0", "zod": "^3" },
            "scripts": { "dev": "vite" }
        }"#;
        let module = Declares("m", DependencySet::new().dependency("react", "^19.0.0"));
        let modules: Vec<&dyn FeatureModule> = vec![&module];

        let manifest = merge_manifest(Some(base), &modules, &config());
        let keys: Vec<&str> = manifest.keys().map(String::as_str).collect();

        assert_eq!(manifest["name"], "demo");
        assert_eq!(manifest["dependencies"]["react"], "^19.0.0");
        assert_eq!(manifest["dependencies"]["zod"], "^3");
        assert_eq!(keys, vec!["name", "version", "dependencies", "scripts"]);
    }

    #[test]
    fn test_empty_dev_dependencies_dropped_but_dependencies_kept() {
        let manifest = merge_manifest(Some(r#"{"devDependencies": {}}"#), &[], &config());
        assert!(!manifest.contains_key("devDependencies"));
        assert_eq!(manifest["dependencies"], json!({}));
    }

    #[test]
    fn test_unparsable_base_uses_framework_default() {
        let module = Declares(
            "m",
            DependencySet::new()
                .dependency("zustand", "^4.4.7")
                .dev_dependency("vitest", "^1"),
        );
        let modules: Vec<&dyn FeatureModule> = vec![&module];
        let mut vue = config();
        vue.framework = Framework::Vue;

        for base in [Some("{ not json"), Some("[1, 2]"), None] {
            let manifest = merge_manifest(base, &modules, &vue);
            assert_eq!(manifest["name"], "demo");
            assert_eq!(manifest["private"], true);
            assert_eq!(manifest["dependencies"]["vue"], "^3.4.15");
            assert_eq!(manifest["dependencies"]["zustand"], "^4.4.7");
            assert_eq!(manifest["devDependencies"]["vitest"], "^1");
        }
    }

    #[test]
    fn test_extra_dependencies() {
        assert_eq!(
            parse_extra_dependency("axios@^1.6.0"),
            ("axios".to_string(), "^1.6.0".to_string())
        );
        assert_eq!(
            parse_extra_dependency("@tanstack/react-query"),
            ("@tanstack/react-query".to_string(), "latest".to_string())
        );
        assert_eq!(
            parse_extra_dependency("@scope/pkg@2"),
            ("@scope/pkg".to_string(), "2".to_string())
        );
        assert_eq!(
            parse_extra_dependency("dayjs@"),
            ("dayjs".to_string(), "latest".to_string())
        );

        let module = Declares("m", DependencySet::new().dependency("axios", "^0.1"));
        let modules: Vec<&dyn FeatureModule> = vec![&module];
        let mut cfg = config();
        cfg.extra_dependencies = vec!["axios@^1.6.0".to_string(), " ".to_string()];

        let fold = collect_dependencies(&modules, &cfg);
        assert_eq!(fold.dependencies.len(), 1);
        assert_eq!(fold.dependencies["axios"], "^1.6.0");
    }

    #[tokio::test]
    async fn test_write_manifest_to_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join(PACKAGE_JSON), r#"{"name": "x"}"#).unwrap();

        let module = Declares("m", DependencySet::new().dependency("pinia", "^2.1.7"));
        let modules: Vec<&dyn FeatureModule> = vec![&module];
        write_manifest(temp.path(), &modules, &config()).await.unwrap();

        let written = std::fs::read_to_string(temp.path().join(PACKAGE_JSON)).unwrap();
        assert!(written.ends_with("}\n"));
        assert!(written.contains("  \"name\": \"demo\""));
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["dependencies"]["pinia"], "^2.1.7");
    }
}
