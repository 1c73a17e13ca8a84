//! Clap derive structures for the `cephdash` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cephdash -- CephFS status from the Ceph dashboard
#[derive(Debug, Parser)]
#[command(
    name = "cephdash",
    version,
    about = "Inspect CephFS filesystems through the Ceph dashboard",
    long_about = "Lists CephFS filesystems and shows their MDS ranks, standbys, pools,\n\
        performance counters, and client sessions.\n\n\
        `watch` keeps the view fresh by polling the dashboard, the same way the\n\
        dashboard's own filesystem tabs do.",
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
    /// Dashboard profile to use
    #[arg(long, short = 'p', env = "CEPHDASH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Dashboard URL (overrides profile)
    #[arg(long, env = "CEPHDASH_URL", global = true)]
    pub url: Option<String>,

    /// Dashboard user (overrides profile)
    #[arg(long, short = 'u', env = "CEPHDASH_USERNAME", global = true)]
    pub username: Option<String>,

    /// Pre-issued bearer token (skips login)
    #[arg(long, env = "CEPHDASH_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CEPHDASH_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CEPHDASH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "CEPHDASH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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
    /// List CephFS filesystems
    #[command(alias = "fs")]
    Filesystems,

    /// Show the status tabs of one filesystem
    Tabs(TabsArgs),

    /// Poll a filesystem's status tabs and print every update
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Tabs ─────────────────────────────────────────────────────────────

/// Which part of the tab payload to render in table mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TabSection {
    /// Everything
    #[default]
    All,
    /// MDS rank assignments and standbys
    Ranks,
    /// Data and metadata pools
    Pools,
    /// Connected client sessions
    Clients,
    /// Latest MDS performance counter samples
    Counters,
}

#[derive(Debug, Args)]
pub struct TabsArgs {
    /// Filesystem id (see `cephdash filesystems`)
    pub id: i64,

    /// Section to show
    #[arg(long, short = 's', value_enum, default_value_t = TabSection::All)]
    pub section: TabSection,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Filesystem id (see `cephdash filesystems`)
    pub id: i64,

    /// Polling period, e.g. "5s" or "1m" (overrides profile)
    #[arg(long, short = 'i', value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Stop after this many updates
    #[arg(long, short = 'n')]
    pub count: Option<u64>,

    /// Section to show
    #[arg(long, short = 's', value_enum, default_value_t = TabSection::All)]
    pub section: TabSection,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Dashboard URL, e.g. https://mgr-host:8443
        #[arg(long)]
        url: String,

        /// Dashboard user
        #[arg(long)]
        username: Option<String>,

        /// Environment variable holding the password
        #[arg(long)]
        password_env: Option<String>,

        /// Accept self-signed TLS certificates for this profile
        #[arg(long)]
        insecure: bool,

        /// Replace an existing profile of the same name
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring (read from stdin)
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
