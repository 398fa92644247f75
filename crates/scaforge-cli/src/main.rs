//! Binary entry point.
//!
//! Startup order: `.env`, argument parsing, tracing subscriber, app
//! configuration, command dispatch.  Everything after parsing funnels
//! failures through [`CliError`], which owns message formatting and the
//! exit-code table (0 success, 1 internal, 2 user input, 3 not found,
//! 4 configuration).

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // A missing .env is fine; real environments set variables directly.
    let _ = dotenvy::dotenv();

    // clap renders help, version, and usage errors itself; usage errors
    // exit 2 without reaching dispatch.
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(&cli.global) {
        eprintln!("{e}");
        return ExitCode::from(1);
    }

    let verbose = cli.global.verbose > 0;
    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e, verbose),
    }
}

fn dispatch(cli: Cli) -> CliResult<()> {
    let config =
        AppConfig::load(cli.global.config.as_ref()).map_err(|e| CliError::ConfigError {
            message: format!("{e:#}"),
            source: None,
        })?;
    let output = OutputManager::new(&cli.global, &config);

    match cli.command {
        Commands::Init(cmd) => commands::init::execute(cmd, cli.global, config, output),
        Commands::Add(cmd) => commands::add::execute(cmd, cli.global, config, output),
        Commands::Remove(cmd) => commands::remove::execute(cmd, cli.global, config, output),
        Commands::List(cmd) => commands::list::execute(cmd, cli.global, config, output),
        Commands::Info(cmd) => commands::info::execute(cmd, cli.global, config, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
    }
}

/// Print the failure to stderr and map it to an exit code.
///
/// Colour tracks whether stderr is a terminal, independent of stdout.
fn report(err: &CliError, verbose: bool) -> ExitCode {
    err.log();

    let rendered = if std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{rendered}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
