mod commands;
mod error;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{columns, completions, locate, normalize, process, Context};
use crate::error::{exit_code_for, report_error, report_error_json};
use blocksieve_config as config;

#[derive(Debug, Parser)]
#[command(name = "blocksieve", version, about = "Filter phone lists against a blocklist")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize, dedupe and filter a file against the blocklist
    Process(process::ProcessArgs),
    /// Show how an input file is read and which columns it has
    Columns(columns::ColumnsArgs),
    /// Print the canonical form of phone numbers
    Normalize(normalize::NormalizeArgs),
    /// Find a previously written artifact by job id
    Locate(locate::LocateArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let json = cli.json;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            if json {
                report_error_json(&err);
            }
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let command = match command {
        Command::Completions(args) => return completions::emit(args),
        command => command,
    };

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }

    let ctx = Context {
        json,
        config: &app_config,
    };

    match command {
        Command::Process(args) => process::process(&ctx, args),
        Command::Columns(args) => columns::columns(&ctx, args),
        Command::Normalize(args) => normalize::normalize(&ctx, args),
        Command::Locate(args) => locate::locate(&ctx, args),
        Command::Completions(_) => {
            unreachable!("completions command handled before config is loaded")
        }
    }
}

// Logs go to stderr; stdout is reserved for command output.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
