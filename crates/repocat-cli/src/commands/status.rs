//! Status command

use crate::app::OutputFormat;
use repocat_core::{Result, SqliteFileStore, SqliteNodeStore};

#[derive(serde::Serialize)]
struct StatusReport {
    hard_files: usize,
    soft_files: usize,
    nodes: usize,
}

pub fn run(files: &SqliteFileStore, nodes: &SqliteNodeStore, format: OutputFormat) -> Result<()> {
    let report = StatusReport {
        hard_files: files.count_hard_records()?,
        soft_files: files.count_soft_records()?,
        nodes: nodes.count_node_records()?,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Cli => {
            println!("Hard files: {}", report.hard_files);
            println!("Soft files: {}", report.soft_files);
            println!("Nodes:      {}", report.nodes);
        }
    }
    Ok(())
}
