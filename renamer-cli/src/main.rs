use anyhow::{Context, Result};
use clap::Parser;
use renamer_core::{Config, OutputFormatter, RenameError, VersionResult};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod eml;
mod rename;
mod save_log;
mod status;
mod undo;

use cli::{Cli, Commands, OutputFormat};

/// Exit codes
const EXIT_HALTED: i32 = 1;
const EXIT_INVALID_INPUT: i32 = 2;
const EXIT_FAILURE: i32 = 3;

/// Failures reported by the CLI after the result has been printed
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Renaming halted after {renamed} renames; run `renamer undo` to revert them")]
    Halted { renamed: usize },

    #[error("Email renaming stopped at the first failure")]
    EmlHalted,
}

fn main() {
    let cli = Cli::parse();
    let use_color = !cli.no_color && io::stdout().is_terminal();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli, use_color) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(exit_code(&e));
        },
    }
}

fn run(cli: Cli, use_color: bool) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Rename {
            directory,
            rule,
            dry_run,
            overwrite_log,
            keep_going,
            no_progress,
            output,
            quiet,
        } => {
            let directory = absolute(&directory)?;
            let rule = rename::resolve_rule(&config.rename, &rule)?;
            let options = rename::resolve_options(&config.rename, overwrite_log, keep_going);
            let show_progress = !no_progress && io::stderr().is_terminal();
            rename::handle_rename(
                &directory,
                &rule,
                options,
                dry_run,
                show_progress,
                use_color,
                output,
                quiet,
            )
        },

        Commands::Undo {
            directory,
            output,
            quiet,
        } => undo::handle_undo(&absolute(&directory)?, output, quiet),

        Commands::SaveLog {
            directory,
            destination,
            output,
            quiet,
        } => save_log::handle_save_log(&absolute(&directory)?, &destination, output, quiet),

        Commands::Eml {
            path,
            timezone,
            fail_fast,
            output,
            quiet,
        } => eml::handle_eml(&path, &config.eml, timezone, fail_fast, output, quiet),

        Commands::Status {
            directory,
            output,
            quiet,
        } => status::handle_status(&absolute(&directory)?, output, quiet),

        Commands::Version { output } => handle_version(output),
    }
}

/// Logged paths are absolute so an undo works from any working directory.
fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Invalid path: {}", path.display()))
}

fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<CliError>().is_some() {
        EXIT_HALTED
    } else if err
        .downcast_ref::<RenameError>()
        .is_some_and(RenameError::is_invalid_input)
    {
        EXIT_INVALID_INPUT
    } else {
        EXIT_FAILURE
    }
}

/// Print a result in the requested format; `quiet` only silences summaries.
pub fn print_result(result: &impl OutputFormatter, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => println!("{}", result.format(output.into())),
        OutputFormat::Summary if !quiet => print!("{}", result.format(output.into())),
        OutputFormat::Summary => {},
    }
}

fn handle_version(output: OutputFormat) -> Result<()> {
    let version_result = VersionResult {
        name: "renamer".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    print_result(&version_result, output, false);
    Ok(())
}
