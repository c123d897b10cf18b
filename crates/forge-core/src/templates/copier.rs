//! Template file copying with npm-safe renames

use crate::error::{ForgeError, Result};
use std::path::Path;
use tokio::fs;
use walkdir::{DirEntry, WalkDir};

/// Map a template file name to its name in the generated project
///
/// npm strips `.gitignore` from published packages, so templates ship it
/// without the leading dot.
fn destination_name(name: &str) -> &str {
    match name {
        "gitignore" => ".gitignore",
        "README-template.md" => "README.md",
        other => other,
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Copy every non-hidden file of a template into the target directory
///
/// Returns the relative paths written, in traversal order.
pub async fn copy_template(template_dir: &Path, target_dir: &Path) -> Result<Vec<String>> {
    fs::create_dir_all(target_dir)
        .await
        .map_err(|e| ForgeError::io("create directory", target_dir, e))?;

    let mut copied_files = Vec::new();

    let walker = WalkDir::new(template_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(template_dir).to_path_buf();
            ForgeError::io("read", path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(template_dir)
            .unwrap_or(entry.path());
        let file_name = entry.file_name().to_string_lossy();
        let renamed = relative.with_file_name(destination_name(&file_name));

        // Ensure parent directories exist
        let target_path = target_dir.join(&renamed);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ForgeError::io("create directory", parent, e))?;
        }

        fs::copy(entry.path(), &target_path)
            .await
            .map_err(|e| ForgeError::io("copy", entry.path(), e))?;

        copied_files.push(renamed.to_string_lossy().replace('\\', "/"));
    }

    tracing::debug!(
        files = copied_files.len(),
        from = %template_dir.display(),
        "Copied template"
    );

    Ok(copied_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_destination_names() {
        assert_eq!(destination_name("gitignore"), ".gitignore");
        assert_eq!(destination_name("README-template.md"), "README.md");
        assert_eq!(destination_name("README.md"), "README.md");
        assert_eq!(destination_name("main.tsx"), "main.tsx");
    }

    #[tokio::test]
    async fn test_copy_renames_and_skips_hidden() {
        let template = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        let root = template.path();

        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::create_dir_all(root.join(".cache")).unwrap();
        std::fs::write(root.join("package.json"), "{}").unwrap();
        std::fs::write(root.join("gitignore"), "node_modules\n").unwrap();
        std::fs::write(root.join(".npmrc"), "").unwrap();
        std::fs::write(root.join(".cache/blob"), "").unwrap();
        std::fs::write(root.join("src/main.tsx"), "render(<App />)").unwrap();

        let copied = copy_template(root, target.path()).await.unwrap();

        assert_eq!(copied, vec![".gitignore", "package.json", "src/main.tsx"]);
        assert_eq!(
            std::fs::read_to_string(target.path().join(".gitignore")).unwrap(),
            "node_modules\n"
        );
        assert!(!target.path().join(".npmrc").exists());
        assert!(!target.path().join(".cache").exists());
    }
}
