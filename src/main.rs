use anyhow::Result;
use clap::Parser;

use ocport::convert::{run_convert, ConvertOptions};

#[derive(Parser)]
#[command(author, version, about = "Convert Claude Code plugin definitions to OpenCode format", long_about = None)]
struct Cli {
    /// Glob pattern selecting plugin group directories
    #[arg(default_value = "./*")]
    pattern: String,
    /// Report what would change without touching any file
    #[arg(long = "dry-run")]
    dry_run: bool,
    /// Skip renaming files that carry the legacy CLAUDE token
    #[arg(long = "skip-rename")]
    skip_rename: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run_convert(&ConvertOptions {
        pattern: cli.pattern,
        dry_run: cli.dry_run,
        skip_rename: cli.skip_rename,
    })?;
    Ok(())
}
