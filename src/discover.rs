use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value as YamlValue};

use crate::util::read_to_string;

/// Identity of a skill across plugin groups.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SkillId {
    pub group: String,
    pub name: String,
}

/// Scan `<pattern>/skill/*/SKILL.md` and collect skills that are not
/// user-invocable.
///
/// A skill is non-user-invocable when its frontmatter declares
/// `user-invocable: false`, or when its directory holds anything besides the
/// SKILL.md itself (supporting files make it a background skill). No file is
/// modified here; read errors abort the run.
pub fn discover_hidden_skills(pattern: &str) -> Result<BTreeSet<SkillId>> {
    let mut hidden = BTreeSet::new();
    let skill_glob = format!("{pattern}/skill/*/SKILL.md");
    for entry in glob::glob(&skill_glob).context("invalid root pattern")? {
        let skill_md = entry.context("list skill definitions")?;
        let Some(id) = skill_identity(&skill_md) else {
            continue;
        };
        let contents = read_to_string(&skill_md)?;
        if declares_non_invocable(&contents) {
            hidden.insert(id);
            continue;
        }
        let skill_dir = skill_md
            .parent()
            .with_context(|| format!("skill directory of {}", skill_md.display()))?;
        if has_auxiliary_files(skill_dir)? {
            hidden.insert(id);
        }
    }
    Ok(hidden)
}

/// Derive (group, skill-name) from `<group>/skill/<skill-name>/SKILL.md`.
fn skill_identity(skill_md: &Path) -> Option<SkillId> {
    let skill_dir = skill_md.parent()?;
    let name = skill_dir.file_name()?.to_str()?.to_string();
    let group_dir = skill_dir.parent()?.parent()?;
    let group = group_dir.file_name()?.to_str()?.to_string();
    Some(SkillId { group, name })
}

fn declares_non_invocable(contents: &str) -> bool {
    let Some(mapping) = frontmatter_mapping(contents) else {
        return false;
    };
    let key = YamlValue::String("user-invocable".to_string());
    matches!(mapping.get(&key), Some(YamlValue::Bool(false)))
}

fn frontmatter_mapping(contents: &str) -> Option<Mapping> {
    let mut lines = contents.lines();
    if lines.next().unwrap_or("").trim() != "---" {
        return None;
    }
    let mut yaml_lines = Vec::new();
    for line in lines {
        if line.trim() == "---" {
            break;
        }
        yaml_lines.push(line);
    }
    serde_yaml::from_str::<Mapping>(&yaml_lines.join("\n")).ok()
}

fn has_auxiliary_files(skill_dir: &Path) -> Result<bool> {
    let entries = fs::read_dir(skill_dir)
        .with_context(|| format!("list skill dir {}", skill_dir.display()))?;
    Ok(entries.count() > 1)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::util::{create_temp_dir, ensure_dir};

    struct TempDir {
        path: PathBuf,
    }

    impl TempDir {
        fn new(prefix: &str) -> Self {
            let path = create_temp_dir(prefix).expect("create temp dir");
            Self { path }
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    fn write_skill(root: &Path, group: &str, name: &str, contents: &str) -> PathBuf {
        let dir = root.join(group).join("skill").join(name);
        ensure_dir(&dir).expect("mkdir skill");
        let path = dir.join("SKILL.md");
        fs::write(&path, contents).expect("write skill");
        dir
    }

    #[test]
    fn discover_flags_declared_non_invocable_skill() {
        let tmp = TempDir::new("ocport-test-");
        write_skill(
            &tmp.path,
            "vibe-demo",
            "helper",
            "---\nname: helper\nuser-invocable: false\n---\nbody\n",
        );

        let pattern = format!("{}/vibe-*", tmp.path.display());
        let hidden = discover_hidden_skills(&pattern).expect("discover");
        assert!(hidden.contains(&SkillId {
            group: "vibe-demo".to_string(),
            name: "helper".to_string(),
        }));
    }

    #[test]
    fn discover_flags_skill_with_auxiliary_files() {
        let tmp = TempDir::new("ocport-test-");
        let dir = write_skill(
            &tmp.path,
            "vibe-demo",
            "bundled",
            "---\nname: bundled\n---\nbody\n",
        );
        ensure_dir(&dir.join("references")).expect("mkdir references");

        let pattern = format!("{}/vibe-*", tmp.path.display());
        let hidden = discover_hidden_skills(&pattern).expect("discover");
        assert!(hidden.contains(&SkillId {
            group: "vibe-demo".to_string(),
            name: "bundled".to_string(),
        }));
    }

    #[test]
    fn discover_skips_plain_invocable_skill() {
        let tmp = TempDir::new("ocport-test-");
        write_skill(
            &tmp.path,
            "vibe-demo",
            "visible",
            "---\nname: visible\nuser-invocable: true\n---\nbody\n",
        );

        let pattern = format!("{}/vibe-*", tmp.path.display());
        let hidden = discover_hidden_skills(&pattern).expect("discover");
        assert!(hidden.is_empty(), "expected no hidden skills: {hidden:?}");
    }
}
