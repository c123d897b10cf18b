//! Tailwind CSS: Vite plugin or PostCSS config, plus the stylesheet import

use super::{AdditionalFile, DependencySet, FeatureModule, PatchDirective};
use crate::config::{BuildConfig, Framework, Routing};

pub struct Tailwind;

/// Global stylesheet each template ships
fn stylesheet(config: &BuildConfig) -> &'static str {
    match (config.framework, config.routing) {
        (Framework::Vue, _) => "src/style.css",
        (Framework::Svelte, _) => "src/app.css",
        (Framework::Nextjs, Routing::PagesRouter) => "src/styles/globals.css",
        (Framework::Nextjs, _) => "src/app/globals.css",
        (Framework::React, _) => "src/index.css",
    }
}

impl FeatureModule for Tailwind {
    fn name(&self) -> &'static str {
        "tailwind"
    }

    fn dependencies(&self, config: &BuildConfig) -> DependencySet {
        if config.framework == Framework::Nextjs {
            DependencySet::new()
                .dev_dependency("@tailwindcss/postcss", "^4")
                .dev_dependency("tailwindcss", "^4")
        } else {
            DependencySet::new()
                .dependency("@tailwindcss/vite", "^4.1.17")
                .dependency("tailwindcss", "^4.1.17")
        }
    }

    fn patches(&self, config: &BuildConfig) -> Vec<PatchDirective> {
        // `@import` must precede every other rule
        let mut patches = vec![PatchDirective::prepend(
            stylesheet(config),
            "@import \"tailwindcss\";\n",
        )];

        if config.framework != Framework::Nextjs {
            patches.push(PatchDirective::prepend(
                "vite.config.ts",
                "import tailwindcss from '@tailwindcss/vite'\n",
            ));
            patches.push(PatchDirective::replace(
                "vite.config.ts",
                r"plugins:\s*\[",
                "plugins: [tailwindcss(), ",
            ));
        }

        patches
    }

    fn additional_files(&self, config: &BuildConfig) -> Vec<AdditionalFile> {
        if config.framework != Framework::Nextjs {
            return Vec::new();
        }

        vec![AdditionalFile::new(
            "postcss.config.mjs",
            r#"const config = {
  plugins: {
    "@tailwindcss/postcss": {},
  },
};

export default config;
"#,
        )]
    }
}
