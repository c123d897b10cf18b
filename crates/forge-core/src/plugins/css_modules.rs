//! CSS Modules: type declarations for `*.module.css` imports

use super::{AdditionalFile, DependencySet, FeatureModule, PatchDirective};
use crate::config::BuildConfig;

pub struct CssModules;

impl FeatureModule for CssModules {
    fn name(&self) -> &'static str {
        "css-modules"
    }

    fn dependencies(&self, _config: &BuildConfig) -> DependencySet {
        DependencySet::new()
    }

    fn patches(&self, _config: &BuildConfig) -> Vec<PatchDirective> {
        Vec::new()
    }

    fn additional_files(&self, config: &BuildConfig) -> Vec<AdditionalFile> {
        if !config.framework.is_typescript() {
            return Vec::new();
        }

        vec![AdditionalFile::new(
            "src/types/css-modules.d.ts",
            r#"declare module '*.module.css' {
  const classes: { [key: string]: string };
  export default classes;
}

declare module '*.module.scss' {
  const classes: { [key: string]: string };
  export default classes;
}
"#,
        )]
    }
}
