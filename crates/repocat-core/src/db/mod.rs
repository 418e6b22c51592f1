//! Storage layer for repocat
//!
//! Two SQLite-backed stores over one local database file:
//! - hard/soft file catalogue (`SqliteFileStore`)
//! - code-element containment index (`SqliteNodeStore`)

mod files;
mod nodes;

pub use files::{FileStore, HardFileRecord, SoftFileRecord, SqliteFileStore};
pub use nodes::{NodeRecord, NodeStore, SqliteNodeStore};

use std::path::PathBuf;

/// Get the default database path
pub fn default_db_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(crate::CACHE_DIR_NAME)
        .join("index.sqlite")
}
