//! Tracing subscriber setup.
//!
//! Only the binary installs a subscriber; the library crates emit spans and
//! events and stay subscriber-agnostic.  The default level comes from the
//! `-v` count (warn, then info/debug/trace; `--quiet` forces error), and a
//! set `RUST_LOG` replaces the whole filter.

use std::io::IsTerminal as _;

use tracing_subscriber::EnvFilter;

use crate::cli::GlobalArgs;

/// Install the global subscriber, writing compact output to stderr.
///
/// Fails if a subscriber is already set for this process.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(args)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("could not install tracing subscriber: {e}"))
}

/// Filter directives covering every scaforge crate at the derived level.
fn directives(args: &GlobalArgs) -> String {
    let level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    format!("scaforge={level},scaforge_core={level},scaforge_adapters={level}")
}
