//! Template lookup: maps a configuration to a base template directory

use crate::config::{BuildConfig, Framework, Linting, Routing, Styling};
use crate::error::{ForgeError, Result};
use std::path::{Path, PathBuf};

/// Directory name of the Next.js variant, e.g. `app-tail-es`
pub fn nextjs_variant(config: &BuildConfig) -> String {
    let routing = match config.routing {
        Routing::PagesRouter => "pages",
        _ => "app",
    };
    let tailwind = match config.styling {
        Styling::Tailwind => "tail",
        _ => "notail",
    };
    let linting = match config.linting {
        Linting::Eslint => "es",
        Linting::Biome => "biome",
        Linting::None => "no",
    };
    format!("{}-{}-{}", routing, tailwind, linting)
}

/// Candidate directories for a configuration, most specific first
fn candidates(template_dir: &Path, config: &BuildConfig) -> Vec<PathBuf> {
    match config.framework {
        Framework::Nextjs => vec![template_dir.join("nextjs").join(nextjs_variant(config))],
        framework => vec![
            template_dir.join(framework.as_str()).join("ts"),
            template_dir
                .join("node_modules")
                .join("create-vite")
                .join(format!("template-{}-ts", framework.as_str())),
        ],
    }
}

/// Resolve the template directory, failing if none of the candidates exist
pub fn resolve_template(template_dir: &Path, config: &BuildConfig) -> Result<PathBuf> {
    let candidates = candidates(template_dir, config);

    if let Some(found) = candidates.iter().find(|path| path.is_dir()) {
        return Ok(found.clone());
    }

    Err(ForgeError::TemplateNotFound {
        framework: config.framework.as_str().to_string(),
        path: candidates
            .into_iter()
            .next()
            .unwrap_or_else(|| template_dir.to_path_buf()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_nextjs_variant_names() {
        let mut config = BuildConfig::new("app", Framework::Nextjs);
        assert_eq!(nextjs_variant(&config), "app-notail-es");

        config.routing = Routing::PagesRouter;
        config.styling = Styling::Tailwind;
        config.linting = Linting::Biome;
        assert_eq!(nextjs_variant(&config), "pages-tail-biome");

        config.linting = Linting::None;
        assert_eq!(nextjs_variant(&config), "pages-tail-no");
    }

    #[test]
    fn test_resolves_local_template() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("react/ts")).unwrap();

        let config = BuildConfig::new("app", Framework::React);
        let path = resolve_template(temp.path(), &config).unwrap();
        assert_eq!(path, temp.path().join("react/ts"));
    }

    #[test]
    fn test_falls_back_to_create_vite() {
        let temp = TempDir::new().unwrap();
        let vite = temp.path().join("node_modules/create-vite/template-vue-ts");
        std::fs::create_dir_all(&vite).unwrap();

        let config = BuildConfig::new("app", Framework::Vue);
        assert_eq!(resolve_template(temp.path(), &config).unwrap(), vite);
    }

    #[test]
    fn test_missing_template_is_error() {
        let temp = TempDir::new().unwrap();
        let config = BuildConfig::new("app", Framework::Nextjs);

        let err = resolve_template(temp.path(), &config).unwrap_err();
        match err {
            ForgeError::TemplateNotFound { framework, path } => {
                assert_eq!(framework, "nextjs");
                assert!(path.ends_with("nextjs/app-notail-es"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
