//! File query command

use crate::app::{FilesArgs, OutputFormat};
use repocat_core::{FileStore, Result, SqliteFileStore};

pub fn run(args: FilesArgs, store: &SqliteFileStore, format: OutputFormat) -> Result<()> {
    if args.soft {
        let records = store.query_soft_records(&args.pattern)?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
            OutputFormat::Cli => {
                for record in records {
                    println!("{} -> {}", record.path, record.hard_path);
                }
            }
        }
    } else {
        let records = store.query_hard_records(&args.pattern)?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
            OutputFormat::Cli => {
                for record in records {
                    if !record.processed {
                        println!("{} [unprocessed, {} bytes]", record.path, record.size);
                    } else if record.is_binary {
                        println!("{} [binary, {} bytes]", record.path, record.size);
                    } else {
                        println!(
                            "{} [{} lines, {} bytes]",
                            record.path, record.number_of_lines, record.size
                        );
                    }
                }
            }
        }
    }
    Ok(())
}
