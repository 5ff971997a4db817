/// Definition file category, derived from the file's location in the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Command,
    Agent,
    Skill,
}

impl FileKind {
    pub fn label(self) -> &'static str {
        match self {
            FileKind::Command => "command",
            FileKind::Agent => "agent",
            FileKind::Skill => "skill",
        }
    }
}

/// Short model aliases and the fully qualified identifiers that replace them.
pub const MODEL_MAP: &[(&str, &str)] = &[
    ("opus", "anthropic/claude-opus-4-5-20251101"),
    ("sonnet", "anthropic/claude-sonnet-4-5-20250929"),
    ("haiku", "anthropic/claude-haiku-4-5-20251001"),
];

/// Rewrite the frontmatter block for one definition file.
///
/// Commands and agents lose their `name:` key (identity comes from the file
/// path); skills keep it, since OpenCode discovers skills by declared name.
/// Everything the transform does not touch round-trips byte-for-byte, so the
/// editing here is line-oriented rather than parse-and-reserialize.
///
/// Files without a twice-repeated `---` delimiter are returned unchanged.
pub fn transform_frontmatter(contents: &str, kind: FileKind) -> String {
    let mut parts = contents.splitn(3, "---");
    let (Some(_preamble), Some(frontmatter), Some(body)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return contents.to_string();
    };

    let mut frontmatter = frontmatter.to_string();
    if kind != FileKind::Skill {
        frontmatter = remove_key_line(&frontmatter, "name");
    }
    frontmatter = remove_key_line(&frontmatter, "user-invocable");
    frontmatter = map_model_aliases(&frontmatter);

    match kind {
        FileKind::Command if !has_key(&frontmatter, "agent") => {
            frontmatter = inject_after_description(&frontmatter, "agent: build");
        }
        FileKind::Agent if !has_key(&frontmatter, "mode") => {
            frontmatter = format!("{}\nmode: subagent\n", frontmatter.trim_end());
        }
        _ => {}
    }

    format!("---{frontmatter}---{body}")
}

fn remove_key_line(frontmatter: &str, key: &str) -> String {
    let prefix = format!("{key}: ");
    frontmatter
        .split_inclusive('\n')
        .filter(|line| !line.starts_with(&prefix))
        .collect()
}

fn map_model_aliases(frontmatter: &str) -> String {
    let mut out = String::with_capacity(frontmatter.len());
    for line in frontmatter.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        let mapped = MODEL_MAP
            .iter()
            .find(|(short, _)| content == format!("model: {short}"));
        match mapped {
            Some((_, full)) => {
                out.push_str(&format!("model: {full}"));
                if line.ends_with('\n') {
                    out.push('\n');
                }
            }
            None => out.push_str(line),
        }
    }
    out
}

fn has_key(frontmatter: &str, key: &str) -> bool {
    let prefix = format!("{key}:");
    frontmatter.lines().any(|line| line.starts_with(&prefix))
}

/// Insert `injected` on its own line directly after the `description:` line.
/// Without a description line this is a no-op.
fn inject_after_description(frontmatter: &str, injected: &str) -> String {
    let mut out = String::with_capacity(frontmatter.len() + injected.len() + 1);
    let mut done = false;
    for line in frontmatter.split_inclusive('\n') {
        out.push_str(line);
        if !done && line.starts_with("description: ") && line.ends_with('\n') {
            out.push_str(injected);
            out.push('\n');
            done = true;
        }
    }
    out
}
