//! Repocat CLI
//!
//! Catalogue every file under a directory tree and query the result.

use clap::Parser;
use repocat_core::{default_db_path, FileStore, NodeStore, Result, SqliteFileStore, SqliteNodeStore};

mod app;
mod commands;

use app::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let db_path = cli.db.clone().unwrap_or_else(default_db_path);
    let files = SqliteFileStore::open(&db_path)?;
    let nodes = SqliteNodeStore::open(&db_path)?;
    files.initialize_schema(false)?;
    nodes.initialize_schema(false)?;

    match cli.command {
        Commands::Populate(args) => commands::populate::run(args, &files),
        Commands::Files(args) => commands::files::run(args, &files, cli.format),
        Commands::Nodes(args) => commands::nodes::run(args, &nodes, cli.format),
        Commands::Status => commands::status::run(&files, &nodes, cli.format),
    }
}
