//! Node query command

use crate::app::{NodesArgs, OutputFormat};
use repocat_core::{NodeStore, Result, SqliteNodeStore};

pub fn run(args: NodesArgs, store: &SqliteNodeStore, format: OutputFormat) -> Result<()> {
    let records = store.query_node_records(&args.name, &args.path)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Cli => {
            for record in records {
                match &record.container {
                    Some(container) => println!(
                        "{}  {} ({}) in {}",
                        record.hard_file_path, record.name, record.kind, container
                    ),
                    None => println!(
                        "{}  {} ({})",
                        record.hard_file_path, record.name, record.kind
                    ),
                }
            }
        }
    }
    Ok(())
}
