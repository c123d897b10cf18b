//! Patch application and additional-file materialization
//!
//! Directives from every selected module are collected in selection order,
//! grouped by target file (stable: order within a file is preserved), and
//! applied. Files are patched concurrently, at most
//! [`MAX_CONCURRENT_FILE_WRITES`] at a time; the directives for one file are
//! folded strictly in order because each one sees the previous one's output.

use crate::config::BuildConfig;
use crate::error::{ForgeError, Result};
use crate::plugins::{FeatureModule, PatchDirective, PatchOp};
use regex::Regex;
use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Upper bound on file groups being patched at once
pub const MAX_CONCURRENT_FILE_WRITES: usize = 8;

/// A directive ready to run, with its pattern already compiled
#[derive(Debug, Clone)]
pub enum CompiledOp {
    Replace { regex: Regex, replacement: String },
    Append(String),
    Prepend(String),
}

/// All directives targeting one file, in application order
#[derive(Debug, Clone)]
pub struct FileGroup {
    pub file: String,
    pub ops: Vec<CompiledOp>,
}

/// Evaluate every module's directives, in module order then declaration order
pub fn collect_directives(
    modules: &[&dyn FeatureModule],
    config: &BuildConfig,
) -> Vec<PatchDirective> {
    modules
        .iter()
        .flat_map(|module| module.patches(config))
        .collect()
}

/// Partition directives into one group per file, ordered by first appearance
///
/// Patterns are compiled here so that a malformed one aborts the build before
/// any file is touched.
pub fn group_directives(directives: Vec<PatchDirective>) -> Result<Vec<FileGroup>> {
    let mut groups: Vec<FileGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for PatchDirective { file, op } in directives {
        let op = match op {
            PatchOp::Replace { pattern, .. } if pattern.is_empty() => {
                tracing::debug!(file = %file, "Skipping replace with empty pattern");
                continue;
            }
            PatchOp::Replace {
                pattern,
                replacement,
            } => {
                let regex = Regex::new(&pattern).map_err(|source| ForgeError::InvalidPattern {
                    file: file.clone(),
                    pattern: pattern.clone(),
                    source,
                })?;
                CompiledOp::Replace { regex, replacement }
            }
            PatchOp::Append { content } => CompiledOp::Append(content),
            PatchOp::Prepend { content } => CompiledOp::Prepend(content),
        };

        match index.get(&file) {
            Some(&slot) => groups[slot].ops.push(op),
            None => {
                index.insert(file.clone(), groups.len());
                groups.push(FileGroup {
                    file,
                    ops: vec![op],
                });
            }
        }
    }

    Ok(groups)
}

/// Apply directives to content in memory
///
/// `replace` substitutes every non-overlapping match; `$1` and `${name}` in
/// the replacement expand to capture groups.
pub fn fold_directives(content: String, ops: &[CompiledOp]) -> String {
    ops.iter().fold(content, |content, op| match op {
        CompiledOp::Replace { regex, replacement } => regex
            .replace_all(&content, replacement.as_str())
            .into_owned(),
        CompiledOp::Append(extra) => content + extra,
        CompiledOp::Prepend(extra) => format!("{}{}", extra, content),
    })
}

async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ForgeError::io("create directory", parent, e))?;
    }
    Ok(())
}

/// Read, fold and write back one file. A missing file starts out empty.
async fn apply_group(project_dir: &Path, group: FileGroup) -> Result<()> {
    let path = project_dir.join(&group.file);

    let content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            ensure_parent(&path).await?;
            String::new()
        }
        Err(e) => return Err(ForgeError::io("read", &path, e)),
    };

    let patched = fold_directives(content, &group.ops);

    ensure_parent(&path).await?;
    fs::write(&path, patched)
        .await
        .map_err(|e| ForgeError::io("write", &path, e))?;

    tracing::debug!(file = %group.file, directives = group.ops.len(), "Patched file");
    Ok(())
}

/// Run `work` once per group, at most [`MAX_CONCURRENT_FILE_WRITES`] at a time
///
/// Every scheduled group runs to completion; if any failed, the first error
/// observed is returned.
async fn run_gated<F, Fut>(groups: Vec<FileGroup>, work: F) -> Result<usize>
where
    F: Fn(FileGroup) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let gate = Arc::new(Semaphore::new(MAX_CONCURRENT_FILE_WRITES));
    let count = groups.len();

    let mut tasks = JoinSet::new();
    for group in groups {
        let gate = Arc::clone(&gate);
        let job = work(group);
        tasks.spawn(async move {
            match gate.acquire_owned().await {
                Ok(_permit) => job.await,
                Err(e) => Err(ForgeError::from(e)),
            }
        });
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.map_err(ForgeError::from).and_then(|result| result);
        if let Err(e) = outcome {
            tracing::warn!("Patch group failed: {}", e);
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(count),
    }
}

/// Apply file groups concurrently, gated to [`MAX_CONCURRENT_FILE_WRITES`]
pub async fn apply_groups(project_dir: &Path, groups: Vec<FileGroup>) -> Result<usize> {
    let root = Arc::new(project_dir.to_path_buf());
    run_gated(groups, move |group| {
        let root = Arc::clone(&root);
        async move { apply_group(&root, group).await }
    })
    .await
}

/// Collect, group and apply every selected module's patches
///
/// Returns the number of files written.
pub async fn apply_patches(
    modules: &[&dyn FeatureModule],
    config: &BuildConfig,
    project_dir: &Path,
) -> Result<usize> {
    let directives = collect_directives(modules, config);
    let groups = group_directives(directives)?;
    apply_groups(project_dir, groups).await
}

/// Write every module's additional files verbatim, in module order
///
/// A later module's file at the same path overwrites an earlier one's.
pub async fn write_additional_files(
    modules: &[&dyn FeatureModule],
    config: &BuildConfig,
    project_dir: &Path,
) -> Result<usize> {
    let mut written = 0;

    for module in modules {
        for file in module.additional_files(config) {
            let path = project_dir.join(&file.path);
            ensure_parent(&path).await?;
            fs::write(&path, &file.content)
                .await
                .map_err(|e| ForgeError::io("write", &path, e))?;
            tracing::debug!(module = module.name(), file = %file.path, "Created file");
            written += 1;
        }
    }

    Ok(written)
}
