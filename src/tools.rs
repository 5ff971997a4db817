use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Legacy capability names and the OpenCode permission keys they map to.
/// Names absent from this table are dropped from converted tool lists.
pub const TOOL_MAP: &[(&str, &str)] = &[
    ("AskUserQuestion", "ask"),
    ("Bash", "bash"),
    ("BashOutput", "bash"),
    ("Edit", "edit"),
    ("NotebookEdit", "notebook"),
    ("Read", "read"),
    ("Skill", "skill"),
    ("Task", "task"),
    ("WebFetch", "webfetch"),
    ("WebSearch", "websearch"),
    ("Write", "edit"),
];

/// Permission keys that would block an autonomous sub-agent on user
/// interaction. Always emitted, always denied.
pub const INTERACTIVE_DENY: &[&str] = &["ask"];

static TOOLS_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^tools: (.+)$").unwrap());
static TOOLS_CONVERTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^tools:[ \t]*$").unwrap());
static MODE_SUBAGENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^mode: subagent$").unwrap());

/// Convert an agent's flat `tools:` comma list into a structured allow/deny
/// map. Exactly one branch applies per file:
///
/// - a flat list is mapped through [`TOOL_MAP`], deduplicated, and emitted
///   sorted by permission key, with [`INTERACTIVE_DENY`] keys forced to
///   `deny`;
/// - a bare `tools:` header means the map already exists (prior run) and the
///   file is left alone;
/// - no `tools` key at all gets the minimal forced-deny map injected after
///   `mode: subagent` when present, else right after the opening delimiter.
pub fn transform_tools(contents: &str) -> String {
    if let Some(caps) = TOOLS_LIST_RE.captures(contents) {
        let block = render_permission_block(&caps[1]);
        return TOOLS_LIST_RE
            .replace(contents, regex::NoExpand(&block))
            .into_owned();
    }
    if TOOLS_CONVERTED_RE.is_match(contents) {
        return contents.to_string();
    }
    inject_minimal_tools(contents)
}

fn render_permission_block(list: &str) -> String {
    let mut perms: BTreeMap<&str, &str> = BTreeMap::new();
    for raw in list.split(',') {
        let name = raw.trim();
        if let Some((_, key)) = TOOL_MAP.iter().find(|(legacy, _)| *legacy == name) {
            perms.insert(*key, "allow");
        }
    }
    for key in INTERACTIVE_DENY {
        perms.insert(*key, "deny");
    }
    let mut block = String::from("tools:");
    for (key, decision) in &perms {
        block.push_str(&format!("\n  {key}: {decision}"));
    }
    block
}

fn inject_minimal_tools(contents: &str) -> String {
    let mut block = String::from("tools:");
    for key in INTERACTIVE_DENY {
        block.push_str(&format!("\n  {key}: deny"));
    }

    if let Some(found) = MODE_SUBAGENT_RE.find(contents) {
        let mut out = String::with_capacity(contents.len() + block.len() + 1);
        out.push_str(&contents[..found.end()]);
        out.push('\n');
        out.push_str(&block);
        out.push_str(&contents[found.end()..]);
        return out;
    }

    match contents.strip_prefix("---\n") {
        Some(rest) => format!("---\n{block}\n{rest}"),
        None => contents.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_list_becomes_sorted_permission_map() {
        let input = "---\ndescription: Reviewer\ntools: Bash, Read, Edit\nmode: subagent\n---\nBody.\n";
        let output = transform_tools(input);
        assert!(output.contains(
            "tools:\n  ask: deny\n  bash: allow\n  edit: allow\n  read: allow\nmode: subagent"
        ));
    }

    #[test]
    fn unknown_tool_names_are_dropped() {
        let input = "---\ntools: Bash, Hologram, Read\nmode: subagent\n---\n";
        let output = transform_tools(input);
        assert!(!output.to_lowercase().contains("hologram"));
        assert!(output.contains("bash: allow"));
        assert!(output.contains("read: allow"));
    }

    #[test]
    fn duplicate_mappings_collapse() {
        // Bash and BashOutput map to the same key, as do Edit and Write.
        let input = "---\ntools: Bash, BashOutput, Edit, Write\nmode: subagent\n---\n";
        let output = transform_tools(input);
        assert_eq!(output.matches("bash: allow").count(), 1);
        assert_eq!(output.matches("edit: allow").count(), 1);
    }

    #[test]
    fn interactive_capability_is_forced_to_deny() {
        let input = "---\ntools: AskUserQuestion, Bash\nmode: subagent\n---\n";
        let output = transform_tools(input);
        assert!(output.contains("ask: deny"));
        assert!(!output.contains("ask: allow"));
    }

    #[test]
    fn already_converted_map_is_left_alone() {
        let converted = "---\ndescription: R\ntools:\n  bash: allow\n  ask: deny\nmode: subagent\n---\n";
        assert_eq!(transform_tools(converted), converted);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let input = "---\ndescription: R\ntools: Bash, Read\nmode: subagent\n---\nBody.\n";
        let once = transform_tools(input);
        let twice = transform_tools(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_tools_key_injects_deny_map_after_mode() {
        let input = "---\ndescription: R\nmode: subagent\n---\nBody.\n";
        let output = transform_tools(input);
        assert_eq!(
            output,
            "---\ndescription: R\nmode: subagent\ntools:\n  ask: deny\n---\nBody.\n"
        );
    }

    #[test]
    fn missing_tools_key_without_mode_injects_after_opening_delimiter() {
        let input = "---\ndescription: R\n---\nBody.\n";
        let output = transform_tools(input);
        assert_eq!(
            output,
            "---\ntools:\n  ask: deny\ndescription: R\n---\nBody.\n"
        );
    }
}
