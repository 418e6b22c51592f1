//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repocat")]
#[command(
    author,
    version,
    about = "Deduplicating file catalogue for repository trees"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file (defaults to the user cache directory)
    #[arg(long, global = true, env = "REPOCAT_DB")]
    pub db: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Populate the catalogue from a directory tree
    Populate(PopulateArgs),

    /// Query hard or soft file records
    Files(FilesArgs),

    /// Query code-element node records
    Nodes(NodesArgs),

    /// Show catalogue status
    Status,
}

#[derive(Args)]
pub struct PopulateArgs {
    /// Directory to index
    pub input_dir: PathBuf,

    /// Wipe existing data before populating
    #[arg(long)]
    pub wipe: bool,
}

#[derive(Args)]
pub struct FilesArgs {
    /// Fuzzy path pattern (SQL LIKE wildcards: % and _)
    #[arg(default_value = "%")]
    pub pattern: String,

    /// Query soft (per-path) records instead of hard records
    #[arg(long)]
    pub soft: bool,
}

#[derive(Args)]
pub struct NodesArgs {
    /// Fuzzy element name pattern
    #[arg(default_value = "%")]
    pub name: String,

    /// Fuzzy file path pattern
    #[arg(long, default_value = "%")]
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Cli,
    /// Pretty-printed JSON
    Json,
}
