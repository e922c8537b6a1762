//! Clap derive structures for the `camcred` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// camcred -- camera credential mapping and resolution
#[derive(Debug, Parser)]
#[command(
    name = "camcred",
    version,
    about = "Resolve ONVIF camera credentials from MAC address mappings",
    long_about = "Maps camera MAC addresses to named credential groups and resolves\n\
        the username, password and auth mode a camera should be contacted with.\n\n\
        Credential groups are read from the system keyring, falling back to\n\
        plaintext [secrets.<group>] tables in the config file.",
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
    /// Config file to use instead of the platform default
    #[arg(long, env = "CAMCRED_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CAMCRED_OUTPUT",
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
    /// Normalize a MAC address to canonical form
    Sanitize {
        /// MAC address in any supported format
        mac: String,
    },

    /// Reverse the byte order of a MAC address
    Reverse {
        /// MAC address in any supported format
        mac: String,
    },

    /// Show which credential group a MAC address maps to
    Group {
        /// MAC address in any supported format
        mac: String,
    },

    /// Find a known MAC address inside an endpoint reference string
    #[command(name = "match")]
    Match {
        /// Endpoint reference (or any opaque string)
        text: String,
    },

    /// List configured devices with their identity and credential group
    #[command(alias = "dev")]
    Devices,

    /// Resolve credentials for a MAC address, device, or group
    Resolve(ResolveArgs),

    /// List MAC address to credential group mappings
    #[command(alias = "map")]
    Mappings,

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOLVE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["mac", "device", "group"])
))]
pub struct ResolveArgs {
    /// Resolve for a MAC address
    #[arg(long)]
    pub mac: Option<String>,

    /// Resolve for a configured device
    #[arg(long, short = 'd')]
    pub device: Option<String>,

    /// Resolve a credential group directly
    #[arg(long, short = 'g')]
    pub group: Option<String>,

    /// Print the password instead of masking it
    #[arg(long)]
    pub show_password: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
