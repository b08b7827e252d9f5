//! Clap derive structures for the `tiklens` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use tiklens_core::RouterSlot;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tiklens -- inspect and compare RouterOS firewall address lists
#[derive(Debug, Parser)]
#[command(
    name = "tiklens",
    version,
    about = "Inspect, export and compare RouterOS firewall configuration",
    long_about = "Connects to up to two RouterOS routers, shows their firewall address lists\n\
        and filter rules, exports them as JSON documents, and reports which\n\
        address-list entries exist on only one of them.",
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
    #[arg(long, env = "TIKLENS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Acquisition mode (overrides config)
    #[arg(long, short = 'm', env = "TIKLENS_MODE", global = true)]
    pub mode: Option<ModeArg>,

    /// Intermediary base URL for proxied mode
    #[arg(long, short = 'b', env = "TIKLENS_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Router login port (direct mode, and the port `serve` dials)
    #[arg(long, global = true)]
    pub auth_port: Option<u16>,

    /// Request timeout in seconds
    #[arg(long, env = "TIKLENS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// What to show when a router cannot be reached
    #[arg(long, global = true)]
    pub on_failure: Option<OnFailureArg>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Output format
    #[arg(long, short = 'o', env = "TIKLENS_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Talk to the router's management endpoint
    Direct,
    /// Go through an intermediary service
    Proxied,
}

impl ModeArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Proxied => "proxied",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnFailureArg {
    /// Show demo data and a warning
    Fallback,
    /// Fail the command
    Error,
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
    /// Connect to a router and show its firewall data
    #[command(alias = "c")]
    Connect(ConnectArgs),

    /// Write a router's firewall data to a JSON document
    #[command(alias = "x")]
    Export(ExportArgs),

    /// Compare address lists of the primary and secondary router
    #[command(alias = "diff")]
    Compare(CompareArgs),

    /// Run the intermediary HTTP service used by proxied mode
    Serve(ServeArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Router selection ─────────────────────────────────────────────────

/// Which router to talk to, with per-invocation overrides of its profile.
#[derive(Debug, Args)]
pub struct RouterArgs {
    /// Router slot (primary or secondary)
    #[arg(long, short = 'r', default_value = "primary")]
    pub router: RouterSlot,

    /// Router address (overrides profile)
    #[arg(long, short = 'H')]
    pub host: Option<String>,

    /// Login user (overrides profile)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Login password (prefer TIKLENS_PASSWORD or the prompt)
    #[arg(long)]
    pub password: Option<String>,

    /// Display name (overrides profile)
    #[arg(long)]
    pub name: Option<String>,
}

// ── Connect ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConnectArgs {
    #[command(flatten)]
    pub router: RouterArgs,

    /// Which collections to show
    #[arg(long, default_value = "all")]
    pub view: ViewArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    All,
    AddressLists,
    FirewallRules,
}

// ── Export ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub router: RouterArgs,

    /// Directory to write the document into
    #[arg(long, short = 'd', default_value = ".")]
    pub out_dir: PathBuf,

    /// Print the document instead of writing a file
    #[arg(long, conflicts_with = "out_dir")]
    pub stdout: bool,
}

// ── Compare ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Primary router address (overrides profile)
    #[arg(long)]
    pub primary_host: Option<String>,

    /// Primary router login user
    #[arg(long)]
    pub primary_username: Option<String>,

    /// Primary router password (prefer TIKLENS_PRIMARY_PASSWORD)
    #[arg(long)]
    pub primary_password: Option<String>,

    /// Use an export document instead of connecting to the primary router
    #[arg(long, conflicts_with_all = ["primary_host", "primary_username", "primary_password"])]
    pub primary_file: Option<PathBuf>,

    /// Secondary router address (overrides profile)
    #[arg(long)]
    pub secondary_host: Option<String>,

    /// Secondary router login user
    #[arg(long)]
    pub secondary_username: Option<String>,

    /// Secondary router password (prefer TIKLENS_SECONDARY_PASSWORD)
    #[arg(long)]
    pub secondary_password: Option<String>,

    /// Use an export document instead of connecting to the secondary router
    #[arg(long, conflicts_with_all = ["secondary_host", "secondary_username", "secondary_password"])]
    pub secondary_file: Option<PathBuf>,

    /// Also list the firewall rules that reference each differing list
    #[arg(long)]
    pub details: bool,
}

// ── Serve ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, short = 'l', default_value = "127.0.0.1:5000")]
    pub listen: SocketAddr,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
