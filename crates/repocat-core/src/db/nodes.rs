//! Node containment store
//!
//! Records named code elements (classes, functions, constants) per hard
//! file, with optional nesting inside another element of the same file.

use crate::error::{is_constraint_violation, Error, Result};
use rusqlite::{params, Connection};
use std::path::Path;

/// A named, typed code element, optionally nested inside another element
/// of the same file.
///
/// Keyed by `(hard_file_path, name)`: element names are unique per file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct NodeRecord {
    pub hard_file_path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub container: Option<String>,
}

/// Capability set of the node containment store.
pub trait NodeStore {
    /// Create the nodes table if absent; drop it first when asked.
    /// Idempotent.
    fn initialize_schema(&self, drop_existing: bool) -> Result<()>;

    /// Delete all rows, leaving the schema intact.
    fn wipe_data(&self) -> Result<()>;

    /// Transactional batch insert. A record whose `container` names a
    /// `(hard_file_path, name)` pair not yet registered, or a duplicate
    /// key, fails the whole call and commits nothing. Parents inserted
    /// earlier in the same call are visible to later records.
    fn insert_node_records(&self, records: &[NodeRecord]) -> Result<()>;

    /// Fuzzy query with SQL `LIKE` wildcards over element name and file
    /// path, ordered by insertion order. Pass `"%"` to leave a dimension
    /// unfiltered.
    fn query_node_records(&self, fuzzy_name: &str, fuzzy_path: &str) -> Result<Vec<NodeRecord>>;
}

// hard_file_path is a logical reference into the file store; the node store
// never joins against it, so it stays unenforced here.
const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS nodes (
    hard_file_path TEXT NOT NULL,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    container TEXT,
    PRIMARY KEY (hard_file_path, name)
);
"#;

/// SQLite-backed node store owning one exclusive connection.
pub struct SqliteNodeStore {
    conn: Connection,
}

impl SqliteNodeStore {
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

    /// Number of node records
    pub fn count_node_records(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Exact-match existence check for a container reference.
    ///
    /// Deliberately not the fuzzy query: a wildcard character in an element
    /// name must not satisfy the containment check by accident.
    fn container_exists(&self, hard_file_path: &str, name: &str) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM nodes WHERE hard_file_path = ?1 AND name = ?2)",
            params![hard_file_path, name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl NodeStore for SqliteNodeStore {
    fn initialize_schema(&self, drop_existing: bool) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        if drop_existing {
            self.conn.execute("DROP TABLE IF EXISTS nodes", [])?;
        }

        self.conn.execute_batch(CREATE_TABLES)?;
        Ok(())
    }

    fn wipe_data(&self) -> Result<()> {
        self.conn.execute("DELETE FROM nodes", [])?;
        Ok(())
    }

    fn insert_node_records(&self, records: &[NodeRecord]) -> Result<()> {
        // Containment is validated with an explicit pre-check per record
        // rather than a deferred self-referencing constraint: the batch must
        // reject any child whose parent has not been registered, enforcing
        // parents-before-children insertion order.
        let tx = self.conn.unchecked_transaction()?;
        for record in records {
            if let Some(container) = record.container.as_deref() {
                // same connection as the transaction, so rows inserted
                // earlier in this batch are visible here
                if !self.container_exists(&record.hard_file_path, container)? {
                    return Err(Error::Integrity(format!(
                        "cannot insert node {}: container {} does not exist in {}",
                        record.name, container, record.hard_file_path
                    )));
                }
            }

            let inserted = tx
                .execute(
                    "INSERT INTO nodes (hard_file_path, name, kind, container)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        record.hard_file_path,
                        record.name,
                        record.kind,
                        record.container
                    ],
                )
                .map_err(|e| {
                    if is_constraint_violation(&e) {
                        Error::Integrity(format!(
                            "cannot insert node {} in {}: {}",
                            record.name, record.hard_file_path, e
                        ))
                    } else {
                        e.into()
                    }
                })?;
            if inserted != 1 {
                return Err(Error::Integrity(format!(
                    "node insert for {} affected {} rows",
                    record.name, inserted
                )));
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn query_node_records(&self, fuzzy_name: &str, fuzzy_path: &str) -> Result<Vec<NodeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT hard_file_path, name, kind, container
             FROM nodes WHERE hard_file_path LIKE ?1 AND name LIKE ?2 ORDER BY rowid",
        )?;

        let results = stmt
            .query_map(params![fuzzy_path, fuzzy_name], |row| {
                Ok(NodeRecord {
                    hard_file_path: row.get(0)?,
                    name: row.get(1)?,
                    kind: row.get(2)?,
                    container: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteNodeStore {
        let store = SqliteNodeStore::open_in_memory().unwrap();
        store.initialize_schema(false).unwrap();
        store
    }

    fn node(name: &str, kind: &str, container: Option<&str>) -> NodeRecord {
        NodeRecord {
            hard_file_path: "/path/to/file.txt".to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            container: container.map(str::to_string),
        }
    }

    #[test]
    fn test_insert_and_query() {
        let store = store();
        let record = node("MyClass", "class", None);
        store.insert_node_records(&[record.clone()]).unwrap();
        assert_eq!(
            store
                .query_node_records("MyClass", "/path/to/file.txt")
                .unwrap(),
            vec![record]
        );
    }

    #[test]
    fn test_wipe_data() {
        let store = store();
        store
            .insert_node_records(&[node("MyClass", "class", None)])
            .unwrap();
        store.wipe_data().unwrap();
        assert!(store.query_node_records("%", "%").unwrap().is_empty());
    }

    #[test]
    fn test_missing_container_rejects_whole_batch() {
        let store = store();
        let orphan = node("MySubClass", "class", Some("MyClass"));
        let err = store.insert_node_records(&[orphan.clone()]).unwrap_err();
        assert!(matches!(err, Error::Integrity(_)), "got {err:?}");
        assert!(store.query_node_records("%", "%").unwrap().is_empty());

        // parent first, then the child in the same batch
        let parent = node("MyClass", "class", None);
        store
            .insert_node_records(&[parent.clone(), orphan.clone()])
            .unwrap();
        assert_eq!(
            store.query_node_records("%", "%").unwrap(),
            vec![parent, orphan]
        );
    }

    #[test]
    fn test_failed_batch_commits_nothing() {
        let store = store();
        let batch = vec![
            node("Outer", "class", None),
            node("inner", "function", Some("Missing")),
        ];
        assert!(store.insert_node_records(&batch).is_err());
        assert!(store.query_node_records("%", "%").unwrap().is_empty());
    }

    #[test]
    fn test_container_in_other_file_does_not_count() {
        let store = store();
        store
            .insert_node_records(&[node("MyClass", "class", None)])
            .unwrap();
        let other = NodeRecord {
            hard_file_path: "/path/to/other.txt".to_string(),
            name: "inner".to_string(),
            kind: "function".to_string(),
            container: Some("MyClass".to_string()),
        };
        let err = store.insert_node_records(&[other]).unwrap_err();
        assert!(matches!(err, Error::Integrity(_)), "got {err:?}");
    }

    #[test]
    fn test_duplicate_name_per_file_is_integrity_error() {
        let store = store();
        store
            .insert_node_records(&[node("MyClass", "class", None)])
            .unwrap();
        let err = store
            .insert_node_records(&[node("MyClass", "function", None)])
            .unwrap_err();
        assert!(matches!(err, Error::Integrity(_)), "got {err:?}");

        // same name in a different file is fine
        let elsewhere = NodeRecord {
            hard_file_path: "/path/to/other.txt".to_string(),
            name: "MyClass".to_string(),
            kind: "class".to_string(),
            container: None,
        };
        store.insert_node_records(&[elsewhere]).unwrap();
    }

    #[test]
    fn test_query_patterns() {
        let store = store();
        let record1 = NodeRecord {
            hard_file_path: "/path/to/file1.txt".to_string(),
            name: "MyClass1".to_string(),
            kind: "class".to_string(),
            container: None,
        };
        let record2 = NodeRecord {
            hard_file_path: "/path/to/file2.txt".to_string(),
            name: "MyClass2".to_string(),
            kind: "class".to_string(),
            container: None,
        };
        store
            .insert_node_records(&[record1.clone(), record2.clone()])
            .unwrap();

        assert_eq!(
            store
                .query_node_records("MyClass1", "/path/to/file1.txt")
                .unwrap(),
            vec![record1.clone()]
        );
        assert!(store.query_node_records("nonexistent", "%").unwrap().is_empty());
        assert_eq!(
            store.query_node_records("%", "%").unwrap(),
            vec![record1.clone(), record2.clone()]
        );
        assert_eq!(
            store.query_node_records("%", "%file2%").unwrap(),
            vec![record2]
        );
    }
}
