use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use walkdir::WalkDir;

const LEGACY_TOKEN: &str = "CLAUDE";
const REPLACEMENT_TOKEN: &str = "AGENTS";

#[derive(Debug, Clone)]
pub struct RenamedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Rename every file under the matched group directories whose file name
/// contains the legacy `CLAUDE` token, substituting `AGENTS`.
///
/// Only file names change; directory structure is untouched. A rename whose
/// target already exists aborts the run rather than overwriting a file in a
/// tree that keeps no backups.
pub fn rename_legacy_files(pattern: &str, dry_run: bool) -> Result<Vec<RenamedFile>> {
    let mut renamed = Vec::new();
    for root in glob::glob(pattern).context("invalid root pattern")? {
        let root = root.context("list group directories")?;
        if !root.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&root).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            if !file_name.contains(LEGACY_TOKEN) {
                continue;
            }
            let target = path.with_file_name(file_name.replace(LEGACY_TOKEN, REPLACEMENT_TOKEN));
            if target == path {
                continue;
            }
            if target.exists() {
                anyhow::bail!(
                    "rename collision: {} -> {} (target already exists)",
                    path.display(),
                    target.display()
                );
            }
            if !dry_run {
                fs::rename(path, &target).with_context(|| {
                    format!("rename {} -> {}", path.display(), target.display())
                })?;
            }
            renamed.push(RenamedFile {
                from: path.to_path_buf(),
                to: target,
            });
        }
    }
    Ok(renamed)
}
