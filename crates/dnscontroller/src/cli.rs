//! Clap derive structures for the `dnscontroller` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// dnscontroller -- manage DNS records and their answers
#[derive(Debug, Parser)]
#[command(
    name = "dnscontroller",
    version,
    about = "Run the DNS record controller API or talk to one",
    long_about = "Stores DNS records (A and SRV) and the answers that resolve them.\n\n\
        `serve` runs the HTTP API over a SQLite database; the `records` and\n\
        `answers` commands are a client for a running server.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "DNSCONTROLLER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Server URL for client commands (overrides client.url)
    #[arg(long, short = 's', global = true)]
    pub server: Option<String>,

    /// Request timeout in seconds (overrides client.timeout)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the API server
    Serve(ServeArgs),

    /// Get, create and delete records
    #[command(alias = "rec", alias = "r")]
    Records(RecordsArgs),

    /// Add answers to a record
    #[command(alias = "ans", alias = "a")]
    Answers(AnswersArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Serve ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address on which to listen
    #[arg(long)]
    pub listen: Option<String>,

    /// URI for the database connection
    #[arg(long)]
    pub db_uri: Option<String>,

    /// Log every SQL statement
    #[arg(long)]
    pub debug_sql: bool,

    /// Log every HTTP request
    #[arg(long)]
    pub debug_http: bool,
}

// ── Records ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecordsArgs {
    #[command(subcommand)]
    pub command: RecordsCommand,
}

/// A record is addressed by its name and type.
#[derive(Debug, Clone, Args)]
pub struct RecordRef {
    /// Record name, e.g. example.com
    pub name: String,

    /// Record type (A or SRV)
    #[arg(value_name = "TYPE")]
    pub record_type: String,
}

#[derive(Debug, Subcommand)]
pub enum RecordsCommand {
    /// Show a record and its answers
    Get(RecordRef),

    /// Create an empty record
    Create(RecordRef),

    /// Delete a record and all of its answers
    #[command(alias = "rm")]
    Delete(RecordRef),
}

// ── Answers ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AnswersArgs {
    #[command(subcommand)]
    pub command: AnswersCommand,
}

#[derive(Debug, Subcommand)]
pub enum AnswersCommand {
    /// Add one answer from flags, or a batch from a JSON file
    Add(AddAnswerArgs),
}

#[derive(Debug, Args)]
pub struct AddAnswerArgs {
    #[command(flatten)]
    pub record: RecordRef,

    /// JSON array of answers, as accepted by the API
    #[arg(long, short = 'f', conflicts_with_all = ["target", "owner"])]
    pub file: Option<PathBuf>,

    /// Answer target (an address, or a host for SRV)
    #[arg(long, required_unless_present = "file")]
    pub target: Option<String>,

    /// Answer type (defaults to the record's type)
    #[arg(long = "answer-type")]
    pub answer_type: Option<String>,

    /// Time to live in seconds
    #[arg(long, default_value = "3600")]
    pub ttl: u64,

    /// Owning principal
    #[arg(long, required_unless_present = "file")]
    pub owner: Option<Uuid>,

    /// SRV port; setting it attaches a detail to the answer
    #[arg(long)]
    pub port: Option<i64>,

    /// SRV priority
    #[arg(long, default_value = "0")]
    pub priority: i64,

    /// SRV weight
    #[arg(long, default_value = "0")]
    pub weight: i64,

    /// SRV protocol
    #[arg(long, default_value = "tcp")]
    pub protocol: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with the default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
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
