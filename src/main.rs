//! `pathvet` command line interface.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod ui;

use commands::{CheckArgs, SanitizeArgs, Target};

#[derive(Parser)]
#[command(name = "pathvet", version, about = "Validate and sanitize filenames and file paths")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that each value is a valid filename
    CheckName(CheckArgs),
    /// Check that each value is a valid file path
    CheckPath(CheckArgs),
    /// Print a valid filename for each value
    SanitizeName(SanitizeArgs),
    /// Print a valid file path for each value
    SanitizePath(SanitizeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::init_tracing(cli.verbose, cli.log_json);

    match cli.command {
        Commands::CheckName(args) => commands::check::execute(&args, Target::Name),
        Commands::CheckPath(args) => commands::check::execute(&args, Target::Path),
        Commands::SanitizeName(args) => commands::sanitize::execute(&args, Target::Name),
        Commands::SanitizePath(args) => commands::sanitize::execute(&args, Target::Path),
    }
}
