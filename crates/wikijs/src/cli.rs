//! Clap derive structures for the `wikijs` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wikijs -- bootstrap and inspect Wiki.js instances
#[derive(Debug, Parser)]
#[command(
    name = "wikijs",
    version,
    about = "Bootstrap and inspect Wiki.js instances from the command line",
    long_about = "Connects to a Wiki.js instance, runs the first-start setup when asked,\n\
        logs in as the admin, enables the GraphQL API and issues a short-lived\n\
        API key for the duration of the command. The key is revoked on exit.",
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

/// Connection flags override the config file, which overrides `WIKIJS_*`.
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (default: platform config dir)
    #[arg(long, env = "WIKIJS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Wiki.js base URL
    #[arg(long, short = 'H', global = true)]
    pub host: Option<String>,

    /// Admin email
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Admin password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Run the first-start setup if the instance still needs it
    #[arg(long, global = true)]
    pub initial_setup: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// PEM bundle to trust instead of the system roots
    #[arg(long, global = true)]
    pub ca_cert_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WIKIJS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

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

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the instance answers and whether setup is done
    Status,

    /// List every authentication strategy the instance supports
    #[command(alias = "ls")]
    Strategies,

    /// List the configured (active) authentication strategies
    #[command(name = "active-strategies", alias = "active")]
    ActiveStrategies,

    /// Show a single authentication strategy by key
    Strategy {
        /// Strategy key, e.g. `local` or `keycloak`
        key: String,
    },

    /// Show the effective configuration (password masked)
    Config,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
