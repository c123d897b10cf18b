//! Zip packaging of a generated project
//!
//! The tree is walked once; every file that survives the exclusion filter is
//! streamed into a Deflate entry as it is discovered, and the central directory
//! is written only after the last file. Entries are prefixed with the
//! application name so the archive extracts into a single directory.

use crate::error::{ForgeError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Directories never packaged, at any depth
pub const EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", ".next", ".cache", "dist", "build"];

/// File names never packaged, at any depth
pub const EXCLUDED_FILES: &[&str] = &[".DS_Store"];

/// Maximum Deflate level
const COMPRESSION_LEVEL: i64 = 9;

/// Result of a finished archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entries: usize,
    pub bytes: u64,
}

/// Whether a traversal entry is filtered out of the archive
fn is_excluded(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_dir() {
        EXCLUDED_DIRS.contains(&name.as_ref())
    } else {
        EXCLUDED_FILES.contains(&name.as_ref()) || name.ends_with(".log")
    }
}

/// Archive entry name: `<app>/<relative path>` with forward slashes
fn entry_name(app_name: &str, relative: &Path) -> String {
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    format!("{}/{}", app_name, parts.join("/"))
}

/// Write the archive synchronously
///
/// On error the output file may be partially written; callers discard it.
pub fn write_archive(tree: &Path, app_name: &str, archive_path: &Path) -> Result<ArchiveSummary> {
    let zip_error = |source| ForgeError::Archive {
        path: archive_path.to_path_buf(),
        source,
    };

    let output = File::create(archive_path).map_err(|e| ForgeError::io("create", archive_path, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(output));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    let walker = WalkDir::new(tree)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry));

    let mut entries = 0;
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(tree).to_path_buf();
            ForgeError::io("read", path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(tree).unwrap_or(entry.path());
        let mut source =
            File::open(entry.path()).map_err(|e| ForgeError::io("read", entry.path(), e))?;

        zip.start_file(entry_name(app_name, relative), options)
            .map_err(zip_error)?;
        std::io::copy(&mut source, &mut zip)
            .map_err(|e| ForgeError::io("archive", entry.path(), e))?;
        entries += 1;
    }

    let mut output = zip.finish().map_err(zip_error)?;
    output
        .flush()
        .map_err(|e| ForgeError::io("write", archive_path, e))?;

    let bytes = std::fs::metadata(archive_path)
        .map(|meta| meta.len())
        .unwrap_or_default();

    Ok(ArchiveSummary {
        path: archive_path.to_path_buf(),
        entries,
        bytes,
    })
}

/// Package `tree` into `archive_path` on a blocking thread
pub async fn build_archive(
    tree: PathBuf,
    app_name: String,
    archive_path: PathBuf,
) -> Result<ArchiveSummary> {
    tokio::task::spawn_blocking(move || write_archive(&tree, &app_name, &archive_path)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn names(archive_path: &Path) -> BTreeSet<String> {
        let archive = ZipArchive::new(File::open(archive_path).unwrap()).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[tokio::test]
    async fn test_exclusions_at_any_depth() {
        let tree = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let root = tree.path();

        write(root, "package.json", "{}");
        write(root, ".gitignore", "node_modules\n");
        write(root, "src/components/Button.tsx", "export {}");
        write(root, "node_modules/react/index.js", "");
        write(root, "packages/ui/node_modules/x/index.js", "");
        write(root, ".git/HEAD", "ref: refs/heads/main");
        write(root, "packages/ui/.git/config", "");
        write(root, ".next/cache/x", "");
        write(root, "dist/bundle.js", "");
        write(root, "src/build/out.js", "");
        write(root, "src/.DS_Store", "");
        write(root, "npm-debug.log", "");
        std::fs::create_dir_all(root.join("empty")).unwrap();

        let archive_path = out.path().join("demo.zip");
        let summary = build_archive(root.to_path_buf(), "demo".to_string(), archive_path.clone())
            .await
            .unwrap();

        let expected: BTreeSet<String> = [
            "demo/.gitignore",
            "demo/package.json",
            "demo/src/components/Button.tsx",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        assert_eq!(names(&archive_path), expected);
        assert_eq!(summary.entries, 3);
        assert!(summary.bytes > 0);
    }

    #[test]
    fn test_entries_are_deflated_and_intact() {
        let tree = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let body = "const x = 1;\n".repeat(200);
        write(tree.path(), "src/main.ts", &body);

        let archive_path = out.path().join("app.zip");
        write_archive(tree.path(), "app", &archive_path).unwrap();

        let mut archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        let mut entry = archive.by_name("app/src/main.ts").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        assert!(entry.compressed_size() < entry.size());

        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, body);
    }

    #[test]
    fn test_missing_output_directory_fails() {
        let tree = TempDir::new().unwrap();
        write(tree.path(), "index.html", "<html></html>");

        let err = write_archive(
            tree.path(),
            "app",
            &tree.path().join("missing/dir/app.zip"),
        )
        .unwrap_err();
        assert!(matches!(err, ForgeError::Io { action: "create", .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_source_fails() {
        let tree = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(tree.path(), "index.html", "<html></html>");
        std::os::unix::fs::symlink(tree.path().join("gone.ts"), tree.path().join("src.ts")).unwrap();

        let err = write_archive(tree.path(), "app", &out.path().join("app.zip")).unwrap_err();
        assert!(matches!(err, ForgeError::Io { action: "read", .. }));
    }

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let relative = Path::new("src").join("pages").join("Home.tsx");
        assert_eq!(entry_name("shop", &relative), "shop/src/pages/Home.tsx");
    }
}
