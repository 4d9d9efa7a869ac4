// src/bin/syndiff.rs
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use syndiff::{DefinitionKind, DiffEngine, DiffRequest, SyndiffConfig, SyntaxDiff};

// =============================================================================
// CLI
// =============================================================================
#[derive(Parser)]
#[command(
    name = "syndiff",
    version,
    about = "Show the textual change of one definition between two versions of a source file",
    after_help = "EXAMPLES:
    syndiff old/foo.c new/foo.c --name foo --first-line 10 --second-line 20
    syndiff old/foo.h new/foo.h --name foo_t --kind type --first-line 3 --second-line 3
    syndiff a.c b.c --name MAX --kind macro --first-line 7 --second-line 9 --engine embedded"
)]
struct Cli {
    /// Old version of the source file
    first: PathBuf,

    /// New version of the source file
    second: PathBuf,

    /// Name of the compared function, type or macro
    #[arg(long)]
    name: String,

    /// Kind of definition
    #[arg(long, default_value = "function", value_parser = ["function", "type", "macro"])]
    kind: String,

    /// Line the definition starts on in FIRST
    #[arg(long)]
    first_line: usize,

    /// Line the definition starts on in SECOND
    #[arg(long)]
    second_line: usize,

    /// Diff implementation (overrides the config file)
    #[arg(long, value_parser = ["external", "embedded"])]
    engine: Option<String>,

    /// External diff program (overrides the config file)
    #[arg(long)]
    diff_program: Option<PathBuf>,

    /// Keep the scratch directory for inspection
    #[arg(long)]
    keep_scratch: bool,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug messages to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

// =============================================================================
// CONFIG
// =============================================================================
fn resolve_config(cli: &Cli) -> Result<SyndiffConfig> {
    let mut config = match &cli.config {
        Some(path) => SyndiffConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SyndiffConfig::default(),
    };
    if let Some(engine) = &cli.engine {
        config.engine = engine.parse::<DiffEngine>()?;
    }
    if let Some(program) = &cli.diff_program {
        config.diff_program = program.clone();
    }
    config.keep_scratch |= cli.keep_scratch;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .init();

    let config = resolve_config(&cli)?;
    let request = DiffRequest::new(
        &cli.first,
        &cli.second,
        cli.name.as_str(),
        cli.kind.parse::<DefinitionKind>()?,
        cli.first_line,
        cli.second_line,
    );

    let diff = SyntaxDiff::new(config)
        .diff(&request)
        .with_context(|| format!("Failed to diff `{}`", cli.name))?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(diff.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
