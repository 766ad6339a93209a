//! scaffold: render project templates and keep generated projects up to date.
//!
//! # Usage
//!
//! ```text
//! scaffold generate <TEMPLATE_DIR> <OUTPUT_DIR> [--config-file F] [--replay] [--yes] [--no-input] [--json]
//! scaffold status <OUTPUT_DIR> [--json]
//! scaffold diff <TEMPLATE_DIR> <OUTPUT_DIR> [--config-file F] [--replay]
//! scaffold list <TEMPLATES_ROOT> [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, generate::GenerateArgs, list::ListArgs, status::StatusArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "scaffold",
    version,
    about = "Generate projects from templates without clobbering your edits",
    long_about = None,
)]
struct Cli {
    /// Log per-file decisions to stderr (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template into a directory, merging with earlier output.
    Generate(GenerateArgs),

    /// Show which generated files were edited or removed since the last run.
    Status(StatusArgs),

    /// Show unified diff of what generate would change.
    Diff(DiffArgs),

    /// List the templates found under a directory.
    List(ListArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Generate(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::List(args) => args.run(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
