//! Terminal output for command handlers.
//!
//! Commands never print status lines directly; they go through
//! [`OutputManager`], which applies `--quiet` and decides once, at startup,
//! whether lines get ANSI colour.  Machine output (the JSON listing) bypasses
//! this and writes straight to stdout.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Severity of a status line, mapped to its symbol and colour.
#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Info,
}

impl Tone {
    fn symbol(self) -> &'static str {
        match self {
            Tone::Success => "\u{2713}", // ✓
            Tone::Warning => "\u{26a0}", // ⚠
            Tone::Info => "\u{2139}",    // ℹ
        }
    }

    fn paint(self, text: &str) -> String {
        match self {
            Tone::Success => text.green().to_string(),
            Tone::Warning => text.yellow().to_string(),
            Tone::Info => text.blue().to_string(),
        }
    }
}

/// Writes user-facing lines to stdout, honouring quiet mode and colour
/// settings.
pub struct OutputManager {
    term: Term,
    quiet: bool,
    colored: bool,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let no_color = args.no_color || config.output.no_color;
        Self {
            term: Term::stdout(),
            quiet: args.quiet,
            colored: colors_enabled(args.output_format, no_color, io::stdout().is_terminal()),
        }
    }

    /// Plain line, suppressed by `--quiet`.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Success, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Info, msg)
    }

    /// Section heading (bold cyan when colour is on).
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.colored {
            text.cyan().bold().to_string()
        } else {
            text.to_owned()
        };
        self.term.write_line(&line)
    }

    fn status(&self, tone: Tone, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.colored {
            format!("{} {}", tone.paint(tone.symbol()), tone.paint(msg))
        } else {
            format!("{} {msg}", tone.symbol())
        };
        self.term.write_line(&line)
    }
}

/// Resolve the colour decision from the format flag, `--no-color`, and
/// whether stdout is a terminal (only consulted for `auto`).
fn colors_enabled(format: OutputFormat, no_color: bool, stdout_tty: bool) -> bool {
    if no_color {
        return false;
    }
    match format {
        OutputFormat::Human => true,
        OutputFormat::Plain => false,
        OutputFormat::Auto => stdout_tty,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
