//! cachepool CLI entry point

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use cachepool_cli::commands::{build_parser, load_settings, InspectCommand, NormalizeCommand};
use cachepool_cli::{init_tracing, CliErrorHandler};

//-----------------------------------------------------------------------------
// Command Definition
//-----------------------------------------------------------------------------

/// Inspect and normalize cache resource pool configuration
#[derive(Debug, Parser)]
#[command(name = "cachepool", version, about = "Cache resource pool configuration tools")]
struct Cli {
    /// Enable verbose error output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log filter, e.g. "debug" or "cachepool_xml=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Parser settings (TOML)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the resource tiers of every cache
    Inspect {
        /// Configuration file
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite every cache's resources in canonical form
    Normalize {
        /// Configuration file
        file: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

//-----------------------------------------------------------------------------
// Main Function
//-----------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();

    let json = matches!(cli.command, Command::Inspect { json: true, .. });
    let error_handler = CliErrorHandler::new(cli.verbose, json);

    if let Err(err) = init_tracing(cli.log_level.as_deref(), cli.log_json) {
        eprintln!("warning: logging disabled: {}", err);
    }

    if let Err(err) = run(cli) {
        process::exit(error_handler.handle_error(&err));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli.settings.as_deref())?;
    let parser = build_parser(&settings)?;

    match cli.command {
        Command::Inspect { file, json } => InspectCommand { file, json }.execute(&parser),
        Command::Normalize { file, output } => NormalizeCommand { file, output }.execute(&parser),
    }
}
