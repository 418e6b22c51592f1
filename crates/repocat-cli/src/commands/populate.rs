//! Populate command

use crate::app::PopulateArgs;
use repocat_core::{populate_index, Result, SqliteFileStore};

pub fn run(args: PopulateArgs, store: &SqliteFileStore) -> Result<()> {
    let summary = populate_index(store, &args.input_dir, args.wipe)?;
    println!(
        "{} files catalogued, {} paths observed, {} failures",
        summary.hard_files, summary.soft_files, summary.failures
    );
    Ok(())
}
