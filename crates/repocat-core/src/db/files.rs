//! Hard/soft file store
//!
//! The hard table holds one record per distinct on-disk file, keyed by its
//! resolved path. The soft table maps every walk-visible path (symlinks and
//! the canonical path itself) to its hard record.

use crate::error::{is_constraint_violation, Error, Result};
use rusqlite::{params, Connection};
use std::path::Path;

/// Canonical metadata for one physical file, keyed by its resolved path.
///
/// `number_of_lines` is meaningful only when `is_binary` is false.
/// `processed` is false for records whose metadata computation failed;
/// such records are kept so the catalogue reflects attempted scans.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HardFileRecord {
    pub path: String,
    pub size: u64,
    pub is_binary: bool,
    pub number_of_lines: u64,
    pub processed: bool,
}

/// A path observed during traversal, mapped to its canonical hard record.
///
/// The canonical path maps to itself; every symlink pointing at it gets its
/// own record with the same `hard_path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SoftFileRecord {
    pub path: String,
    pub hard_path: String,
}

/// Capability set of the hard/soft file catalogue.
pub trait FileStore {
    /// Create the hard/soft tables if absent; drop them first when asked.
    /// Idempotent.
    fn initialize_schema(&self, drop_existing: bool) -> Result<()>;

    /// Delete all rows from both tables, leaving the schema intact.
    fn wipe_data(&self) -> Result<()>;

    /// Bulk insert, best effort: rows commit one at a time and the first
    /// failing row aborts the remainder of the call.
    fn insert_hard_records(&self, records: &[HardFileRecord]) -> Result<()>;

    fn insert_soft_records(&self, records: &[SoftFileRecord]) -> Result<()>;

    /// Fuzzy query with SQL `LIKE` wildcards (`%`, `_`) against the full
    /// path, ordered by insertion order. No match yields an empty Vec.
    fn query_hard_records(&self, fuzzy_path: &str) -> Result<Vec<HardFileRecord>>;

    fn query_soft_records(&self, fuzzy_path: &str) -> Result<Vec<SoftFileRecord>>;
}

const CREATE_TABLES: &str = r#"
-- Canonical file records (one per distinct resolved path)
CREATE TABLE IF NOT EXISTS hard_files (
    path TEXT PRIMARY KEY,
    size INTEGER NOT NULL,
    is_binary INTEGER NOT NULL,
    number_of_lines INTEGER NOT NULL,
    processed INTEGER NOT NULL
);

-- Walk-visible paths (symlinks and the canonical path itself)
CREATE TABLE IF NOT EXISTS soft_files (
    path TEXT PRIMARY KEY,
    hard_path TEXT NOT NULL REFERENCES hard_files(path)
);

CREATE INDEX IF NOT EXISTS idx_soft_files_hard_path ON soft_files(hard_path);
"#;

/// SQLite-backed file store owning one exclusive connection.
///
/// Callers must serialize all operations through one instance; concurrent
/// writers against the same backing file are unsupported.
pub struct SqliteFileStore {
    conn: Connection,
}

impl SqliteFileStore {
    /// Open store at path, creating the database file if necessary
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Number of hard records
    pub fn count_hard_records(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM hard_files", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of soft records
    pub fn count_soft_records(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM soft_files", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl FileStore for SqliteFileStore {
    fn initialize_schema(&self, drop_existing: bool) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        if drop_existing {
            // soft_files references hard_files, so it goes first
            self.conn.execute_batch(
                "DROP TABLE IF EXISTS soft_files;
                 DROP TABLE IF EXISTS hard_files;",
            )?;
        }

        self.conn.execute_batch(CREATE_TABLES)?;
        Ok(())
    }

    fn wipe_data(&self) -> Result<()> {
        self.conn.execute("DELETE FROM soft_files", [])?;
        self.conn.execute("DELETE FROM hard_files", [])?;
        Ok(())
    }

    fn insert_hard_records(&self, records: &[HardFileRecord]) -> Result<()> {
        for record in records {
            let inserted = self
                .conn
                .execute(
                    "INSERT INTO hard_files (path, size, is_binary, number_of_lines, processed)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        record.path,
                        record.size,
                        record.is_binary,
                        record.number_of_lines,
                        record.processed
                    ],
                )
                .map_err(|e| {
                    if is_constraint_violation(&e) {
                        Error::Integrity(format!(
                            "cannot insert hard record for {}: {}",
                            record.path, e
                        ))
                    } else {
                        e.into()
                    }
                })?;
            if inserted != 1 {
                return Err(Error::Integrity(format!(
                    "hard record insert for {} affected {} rows",
                    record.path, inserted
                )));
            }
        }
        Ok(())
    }

    fn insert_soft_records(&self, records: &[SoftFileRecord]) -> Result<()> {
        for record in records {
            let inserted = self
                .conn
                .execute(
                    "INSERT INTO soft_files (path, hard_path) VALUES (?1, ?2)",
                    params![record.path, record.hard_path],
                )
                .map_err(|e| {
                    if is_constraint_violation(&e) {
                        Error::Integrity(format!(
                            "cannot insert soft record for {}: {}",
                            record.path, e
                        ))
                    } else {
                        e.into()
                    }
                })?;
            if inserted != 1 {
                return Err(Error::Integrity(format!(
                    "soft record insert for {} affected {} rows",
                    record.path, inserted
                )));
            }
        }
        Ok(())
    }

    fn query_hard_records(&self, fuzzy_path: &str) -> Result<Vec<HardFileRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT path, size, is_binary, number_of_lines, processed
             FROM hard_files WHERE path LIKE ?1 ORDER BY rowid",
        )?;

        let results = stmt
            .query_map(params![fuzzy_path], |row| {
                Ok(HardFileRecord {
                    path: row.get(0)?,
                    size: row.get(1)?,
                    is_binary: row.get::<_, i32>(2)? != 0,
                    number_of_lines: row.get(3)?,
                    processed: row.get::<_, i32>(4)? != 0,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(results)
    }

    fn query_soft_records(&self, fuzzy_path: &str) -> Result<Vec<SoftFileRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT path, hard_path FROM soft_files WHERE path LIKE ?1 ORDER BY rowid",
        )?;

        let results = stmt
            .query_map(params![fuzzy_path], |row| {
                Ok(SoftFileRecord {
                    path: row.get(0)?,
                    hard_path: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteFileStore {
        let store = SqliteFileStore::open_in_memory().unwrap();
        store.initialize_schema(false).unwrap();
        store
    }

    fn hard(path: &str) -> HardFileRecord {
        HardFileRecord {
            path: path.to_string(),
            size: 1234,
            is_binary: false,
            number_of_lines: 100,
            processed: true,
        }
    }

    #[test]
    fn test_initialize_schema_is_idempotent() {
        let store = store();
        store.initialize_schema(false).unwrap();
        store.initialize_schema(true).unwrap();
        assert_eq!(store.count_hard_records().unwrap(), 0);
    }

    #[test]
    fn test_drop_existing_discards_rows() {
        let store = store();
        store.insert_hard_records(&[hard("/path/to/file.txt")]).unwrap();
        store.initialize_schema(true).unwrap();
        assert!(store.query_hard_records("%").unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_query_hard_records() {
        let store = store();
        let record = hard("/path/to/file.txt");
        store.insert_hard_records(&[record.clone()]).unwrap();
        let results = store.query_hard_records("%file.txt").unwrap();
        assert_eq!(results, vec![record]);
    }

    #[test]
    fn test_insert_and_query_soft_records() {
        let store = store();
        store.insert_hard_records(&[hard("/path/to/file.txt")]).unwrap();
        let soft = SoftFileRecord {
            path: "/path/to/soft_link.txt".to_string(),
            hard_path: "/path/to/file.txt".to_string(),
        };
        store.insert_soft_records(&[soft.clone()]).unwrap();
        let results = store.query_soft_records("%soft_link.txt").unwrap();
        assert_eq!(results, vec![soft]);
    }

    #[test]
    fn test_wipe_data_leaves_schema() {
        let store = store();
        store.insert_hard_records(&[hard("/path/to/file.txt")]).unwrap();
        store.wipe_data().unwrap();
        assert!(store.query_hard_records("%").unwrap().is_empty());
        // schema survives, inserts still work
        store.insert_hard_records(&[hard("/path/to/file.txt")]).unwrap();
    }

    #[test]
    fn test_query_patterns() {
        let store = store();
        let record1 = hard("/path/to/file1.txt");
        let record2 = HardFileRecord {
            path: "/path/to/file2.txt".to_string(),
            size: 5678,
            is_binary: true,
            number_of_lines: 0,
            processed: true,
        };
        store
            .insert_hard_records(&[record1.clone(), record2.clone()])
            .unwrap();

        assert_eq!(store.query_hard_records("%file1%").unwrap(), vec![record1.clone()]);
        assert_eq!(
            store.query_hard_records("/path/to/file_.txt").unwrap(),
            vec![record1.clone(), record2.clone()]
        );
        assert!(store.query_hard_records("nonexistent").unwrap().is_empty());
        assert_eq!(store.query_hard_records("%").unwrap(), vec![record1, record2]);
    }

    #[test]
    fn test_query_preserves_insertion_order() {
        let store = store();
        let records: Vec<HardFileRecord> =
            (0..5).rev().map(|i| hard(&format!("/z/{i}.txt"))).collect();
        store.insert_hard_records(&records).unwrap();
        assert_eq!(store.query_hard_records("%").unwrap(), records);
    }

    #[test]
    fn test_duplicate_hard_path_is_integrity_error() {
        let store = store();
        store.insert_hard_records(&[hard("/path/to/file.txt")]).unwrap();
        let err = store
            .insert_hard_records(&[hard("/path/to/file.txt")])
            .unwrap_err();
        assert!(matches!(err, Error::Integrity(_)), "got {err:?}");
    }

    #[test]
    fn test_soft_record_requires_hard_record() {
        let store = store();
        let orphan = SoftFileRecord {
            path: "/path/to/link.txt".to_string(),
            hard_path: "/path/to/missing.txt".to_string(),
        };
        let err = store.insert_soft_records(&[orphan]).unwrap_err();
        assert!(matches!(err, Error::Integrity(_)), "got {err:?}");
        assert!(store.query_soft_records("%").unwrap().is_empty());
    }

    #[test]
    fn test_partial_failure_aborts_remaining_batch() {
        let store = store();
        store.insert_hard_records(&[hard("/a.txt")]).unwrap();
        let batch = vec![hard("/b.txt"), hard("/a.txt"), hard("/c.txt")];
        assert!(store.insert_hard_records(&batch).is_err());
        // best-effort loader: rows before the failure stay committed,
        // rows after it were never attempted
        let paths: Vec<String> = store
            .query_hard_records("%")
            .unwrap()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, vec!["/a.txt".to_string(), "/b.txt".to_string()]);
    }
}
