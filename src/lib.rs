//! In-place conversion of Claude Code plugin trees (commands, agents,
//! skills) to OpenCode format: frontmatter edits, tool-permission maps, and
//! inline reference rewrites, driven by a one-shot CLI.

pub mod convert;
pub mod discover;
pub mod frontmatter;
pub mod rename;
pub mod rewrite;
pub mod tools;
pub mod util;
