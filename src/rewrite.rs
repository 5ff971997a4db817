use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::discover::SkillId;

static SKILL_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Skill\s*\(\s*"([\w-]+):([\w-]+)"\s*(?:,\s*"([^"]*)")?\s*\)"#).unwrap()
});

static DELEGATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Task tool with subagent_type="[\w-]+:([\w-]+)""#).unwrap());

/// Legacy path spellings and their OpenCode equivalents, applied in order.
/// The home-relative form comes before the bare `.claude/` prefix so that
/// `~/.claude/...` is not half-rewritten to `~/.opencode/...`.
const LEGACY_PATHS: &[(&str, &str)] = &[
    ("CLAUDE.md", "AGENTS.md"),
    ("claude-md", "agents-md"),
    ("~/.claude", "~/.config/opencode"),
    (".claude/", ".opencode/"),
];

/// Legacy tool names rewritten as plain words in prose. These are textual
/// replacements only; the permission keys live in [`crate::tools::TOOL_MAP`].
const PROSE_TOOLS: &[(&str, &str)] = &[
    ("BashOutput", "bash"),
    ("NotebookEdit", "notebook"),
    ("WebFetch", "webfetch"),
    ("WebSearch", "websearch"),
];

static PROSE_TOOL_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    PROSE_TOOLS
        .iter()
        .map(|(legacy, replacement)| {
            (
                Regex::new(&format!(r"\b{legacy}\b")).unwrap(),
                *replacement,
            )
        })
        .collect()
});

/// Apply every inline prose rewrite to a document, in fixed order: skill
/// invocations, sub-agent delegation phrases, legacy paths, legacy tool
/// names. Each pass is a plain text substitution over the whole document.
pub fn rewrite_references(contents: &str, hidden_skills: &BTreeSet<SkillId>) -> String {
    let out = rewrite_skill_calls(contents, hidden_skills);
    let out = rewrite_delegations(&out);
    let out = rewrite_legacy_paths(&out);
    rewrite_legacy_tool_names(&out)
}

/// Rewrite `Skill("group:name")` / `Skill("group:name", "args")` calls.
///
/// Non-user-invocable targets become a structured `skill({ ... })` invocation;
/// user-invocable targets become the `/name` slash form. An empty argument
/// string counts as no argument.
pub fn rewrite_skill_calls(contents: &str, hidden_skills: &BTreeSet<SkillId>) -> String {
    SKILL_CALL_RE
        .replace_all(contents, |caps: &Captures| {
            let target = SkillId {
                group: caps[1].to_string(),
                name: caps[2].to_string(),
            };
            let args = caps
                .get(3)
                .map(|m| m.as_str())
                .filter(|args| !args.is_empty());
            let name = &target.name;
            if hidden_skills.contains(&target) {
                match args {
                    Some(args) => format!(r#"skill({{ name: "{name}", arguments: "{args}" }})"#),
                    None => format!(r#"skill({{ name: "{name}" }})"#),
                }
            } else {
                match args {
                    Some(args) => format!("/{name} {args}"),
                    None => format!("/{name}"),
                }
            }
        })
        .into_owned()
}

/// Rewrite `Task tool with subagent_type="group:agent"` phrases to name the
/// sub-agent directly.
pub fn rewrite_delegations(contents: &str) -> String {
    DELEGATION_RE
        .replace_all(contents, "the $1 agent")
        .into_owned()
}

pub fn rewrite_legacy_paths(contents: &str) -> String {
    let mut out = contents.to_string();
    for (legacy, replacement) in LEGACY_PATHS {
        out = out.replace(legacy, replacement);
    }
    out
}

pub fn rewrite_legacy_tool_names(contents: &str) -> String {
    let mut out = contents.to_string();
    for (pattern, replacement) in PROSE_TOOL_RES.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out
}
