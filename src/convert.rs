use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::discover::{discover_hidden_skills, SkillId};
use crate::frontmatter::{transform_frontmatter, FileKind};
use crate::rename::rename_legacy_files;
use crate::rewrite::rewrite_references;
use crate::tools::transform_tools;
use crate::util::{read_to_string, write_string};

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub pattern: String,
    pub dry_run: bool,
    pub skip_rename: bool,
}

#[derive(Debug, Default)]
pub struct ConvertSummary {
    pub hidden_skills: usize,
    pub renamed: usize,
    pub converted: usize,
}

/// Run the full conversion over every plugin group matched by the pattern.
///
/// Fixed sequence: discover skill visibility, rename legacy-named files, then
/// rewrite commands, agents, and skills in that order. Files are processed one
/// at a time and written back in place; the first error aborts the rest of the
/// run.
pub fn run_convert(opts: &ConvertOptions) -> Result<ConvertSummary> {
    let mut summary = ConvertSummary::default();

    println!("[ocport] discovering non-user-invocable skills...");
    let hidden_skills = discover_hidden_skills(&opts.pattern)?;
    if hidden_skills.is_empty() {
        println!("[ocport]   none found");
    } else {
        for id in &hidden_skills {
            println!("[ocport]   {}:{}", id.group, id.name);
        }
    }
    summary.hidden_skills = hidden_skills.len();

    if !opts.skip_rename {
        let renamed = rename_legacy_files(&opts.pattern, opts.dry_run)?;
        for entry in &renamed {
            println!(
                "[ocport] rename {} -> {}",
                entry.from.display(),
                entry.to.display()
            );
        }
        summary.renamed = renamed.len();
    }

    for kind in [FileKind::Command, FileKind::Agent, FileKind::Skill] {
        for path in definition_files(&opts.pattern, kind)? {
            convert_file(&path, kind, &hidden_skills, opts.dry_run)?;
            println!("[ocport] {}: {}", kind.label(), path.display());
            summary.converted += 1;
        }
    }

    println!("[ocport] done");
    Ok(summary)
}

fn definition_files(pattern: &str, kind: FileKind) -> Result<Vec<PathBuf>> {
    let file_glob = match kind {
        FileKind::Command => format!("{pattern}/command/*.md"),
        FileKind::Agent => format!("{pattern}/agent/*.md"),
        FileKind::Skill => format!("{pattern}/skill/*/SKILL.md"),
    };
    let mut files = Vec::new();
    for entry in glob::glob(&file_glob).context("invalid root pattern")? {
        files.push(entry.context("enumerate definition files")?);
    }
    Ok(files)
}

/// Apply the per-category pipeline to a single file: frontmatter, then the
/// tools conversion for agents, then the inline-reference passes.
pub fn convert_file(
    path: &Path,
    kind: FileKind,
    hidden_skills: &BTreeSet<SkillId>,
    dry_run: bool,
) -> Result<()> {
    let contents = read_to_string(path)?;
    let mut updated = transform_frontmatter(&contents, kind);
    if kind == FileKind::Agent {
        updated = transform_tools(&updated);
    }
    updated = rewrite_references(&updated, hidden_skills);
    if !dry_run && updated != contents {
        write_string(path, &updated)?;
    }
    Ok(())
}
