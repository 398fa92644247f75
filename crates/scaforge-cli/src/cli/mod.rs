//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "scaforge",
    bin_name = "scaforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f528} Plugin-based project scaffolding",
    long_about = "Scaforge adds and removes feature plugins (database, auth, \
                  payments, email) in generated web projects, wiring up \
                  packages, files and environment variables.",
    after_help = "EXAMPLES:\n\
        \x20 scaforge init my-app --template nextjs\n\
        \x20 scaforge add prisma -o provider=sqlite\n\
        \x20 scaforge add better-auth\n\
        \x20 scaforge remove stripe\n\
        \x20 scaforge list --installed",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialise a scaforge project configuration.
    #[command(
        about = "Initialise a project",
        after_help = "EXAMPLES:\n\
            \x20 scaforge init my-app --template nextjs\n\
            \x20 scaforge init my-site --template astro"
    )]
    Init(InitArgs),

    /// Add a plugin to the project.
    #[command(
        visible_alias = "a",
        about = "Add a plugin",
        after_help = "EXAMPLES:\n\
            \x20 scaforge add prisma\n\
            \x20 scaforge add prisma -o provider=sqlite\n\
            \x20 scaforge add better-auth -o socialProviders=true\n\
            \x20 scaforge add trpc --dry-run"
    )]
    Add(AddArgs),

    /// Remove a plugin from the project.
    #[command(
        visible_alias = "rm",
        about = "Remove a plugin",
        after_help = "EXAMPLES:\n\
            \x20 scaforge remove stripe\n\
            \x20 scaforge remove prisma   # fails while better-auth depends on it"
    )]
    Remove(RemoveArgs),

    /// List available plugins.
    #[command(
        visible_alias = "ls",
        about = "List plugins",
        after_help = "EXAMPLES:\n\
            \x20 scaforge list\n\
            \x20 scaforge list --category database\n\
            \x20 scaforge list --installed\n\
            \x20 scaforge list --format json"
    )]
    List(ListArgs),

    /// Show details for one plugin.
    #[command(
        about = "Show plugin details",
        after_help = "EXAMPLES:\n\
            \x20 scaforge info prisma\n\
            \x20 scaforge info better-auth"
    )]
    Info(InfoArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 scaforge completions bash > ~/.local/share/bash-completion/completions/scaforge\n\
            \x20 scaforge completions zsh  > ~/.zfunc/_scaforge\n\
            \x20 scaforge completions fish > ~/.config/fish/completions/scaforge.fish"
    )]
    Completions(CompletionsArgs),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `scaforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project name.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// Base template the project was generated from.
    #[arg(
        short = 't',
        long = "template",
        value_name = "TEMPLATE",
        help = "Base template id (e.g. nextjs, astro, sveltekit)"
    )]
    pub template: String,

    /// Overwrite an existing project configuration.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── add ───────────────────────────────────────────────────────────────────────

/// Arguments for `scaforge add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Plugin to add.
    #[arg(value_name = "PLUGIN", help = "Plugin name")]
    pub plugin: String,

    /// Plugin options as `key=value` pairs.  Values parse as JSON where
    /// possible (`true`, `5`), otherwise as strings.
    #[arg(
        short = 'o',
        long = "option",
        value_name = "KEY=VALUE",
        help = "Set a plugin option (repeatable)"
    )]
    pub options: Vec<String>,

    /// Validate without changing anything.
    #[arg(long = "dry-run", help = "Validate the add without applying it")]
    pub dry_run: bool,

    /// Update files and configuration but skip the package manager.
    #[arg(long = "skip-install", help = "Do not run the package manager")]
    pub skip_install: bool,
}

// ── remove ────────────────────────────────────────────────────────────────────

/// Arguments for `scaforge remove`.
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Plugin to remove.
    #[arg(value_name = "PLUGIN", help = "Plugin name")]
    pub plugin: String,

    /// Update the configuration but skip the package manager.
    #[arg(long = "skip-install", help = "Do not run the package manager")]
    pub skip_install: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `scaforge list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter by category.
    #[arg(
        long = "category",
        value_name = "CATEGORY",
        help = "Filter by category (api, database, auth, payments, cms, email)"
    )]
    pub category: Option<String>,

    /// Show only plugins installed in the current project.
    #[arg(long = "installed", help = "Show only installed plugins")]
    pub installed: bool,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── info ──────────────────────────────────────────────────────────────────────

/// Arguments for `scaforge info`.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Plugin to describe.
    #[arg(value_name = "PLUGIN", help = "Plugin name")]
    pub plugin: String,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `scaforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: clap_complete::Shell,
}

// ── tests ─────────────────────────────────────────────────────────────────────
