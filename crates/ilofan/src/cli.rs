//! Clap derive structures for the `ilofan` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of workspace crates so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ilofan -- fan telemetry and manual fan control for HPE iLO
#[derive(Debug, Parser)]
#[command(
    name = "ilofan",
    version,
    about = "Read and control server fans through an HPE iLO management controller",
    long_about = "Reads fan and temperature telemetry over Redfish and pins fan speeds\n\
        through the iLO command interface over SSH.\n\n\
        Credentials come from ILO_HOST, ILO_USERNAME and ILO_PASSWORD, or from\n\
        the config file (see `ilofan config path`).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (default: platform config dir, or $ILOFAN_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ILOFAN_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Timeout in seconds for each request and SSH round trip
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// SSH port of the iLO command interface
    #[arg(long, global = true, value_name = "PORT")]
    pub ssh_port: Option<u16>,

    /// SSH key exchange to offer (repeatable, in preference order)
    #[arg(long, global = true, value_name = "ALG")]
    pub kex: Vec<String>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read and set fan speeds
    #[command(alias = "f")]
    Fans(FansArgs),

    /// Show temperature sensors
    #[command(alias = "t")]
    Temps,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Fans ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FansArgs {
    #[command(subcommand)]
    pub command: FansCommand,
}

#[derive(Debug, Subcommand)]
pub enum FansCommand {
    /// List fans with their current speed and health
    #[command(alias = "ls")]
    List,

    /// Pin fans to fixed percentages of full speed (10-100)
    ///
    /// One value per fan, in the order `fans list` shows them.
    #[command(group(
        clap::ArgGroup::new("speeds").required(true).args(["percent", "all", "from_json"])
    ))]
    Set {
        /// Percentage for each fan, in fan order
        #[arg(value_name = "PCT", allow_negative_numbers = true)]
        percent: Vec<i64>,

        /// Apply one percentage to every fan
        #[arg(long, value_name = "PCT", allow_negative_numbers = true)]
        all: Option<i64>,

        /// Read `{"fans": [..]}` from a file ("-" for stdin)
        #[arg(long, value_name = "PATH")]
        from_json: Option<PathBuf>,
    },

    /// Apply a named speed profile to every fan
    Preset {
        /// Profile name
        preset: Preset,
    },

    /// Return all fans to automatic control
    Unlock,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Preset {
    /// 30%
    Quiet,
    /// 40%
    Normal,
    /// 80%
    Turbo,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter config file
    Init {
        /// Controller address
        #[arg(long)]
        host: Option<String>,

        /// Controller user
        #[arg(long)]
        username: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display the resolved configuration (password masked)
    Show,

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
