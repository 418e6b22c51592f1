//! Per-file registration context for the classification collaborator
//!
//! The classification process reads file content on its own; once it judges
//! a file to contain importable code, it collects the discovered elements
//! here and commits them in one batch. One context per file, passed through
//! the collaborator's call chain — no shared process-wide state.

use crate::db::{NodeRecord, NodeStore};
use crate::error::Result;

/// Accumulates the classification outcome and discovered elements for one
/// catalogued file.
///
/// Elements must be registered in discovery order, outer declarations
/// before their nested members, so the containment check at commit time
/// sees every parent before its children.
#[derive(Debug, Clone)]
pub struct FileRegistration {
    hard_file_path: String,
    contains_code: bool,
    records: Vec<NodeRecord>,
}

impl FileRegistration {
    /// Start a context for one hard file
    pub fn new(hard_file_path: impl Into<String>) -> Self {
        Self {
            hard_file_path: hard_file_path.into(),
            contains_code: false,
            records: Vec::new(),
        }
    }

    pub fn hard_file_path(&self) -> &str {
        &self.hard_file_path
    }

    /// Mark the file as containing importable code without registering
    /// elements yet
    pub fn mark_contains_code(&mut self) {
        self.contains_code = true;
    }

    pub fn contains_code(&self) -> bool {
        self.contains_code
    }

    /// Register a discovered element. Implies the file contains code.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        container: Option<&str>,
    ) {
        self.contains_code = true;
        self.records.push(NodeRecord {
            hard_file_path: self.hard_file_path.clone(),
            name: name.into(),
            kind: kind.into(),
            container: container.map(str::to_string),
        });
    }

    /// Elements registered so far, in discovery order
    pub fn elements(&self) -> &[NodeRecord] {
        &self.records
    }

    /// Flush the collected elements into the node store as one batch.
    ///
    /// Returns the number of records committed; a file with nothing
    /// registered commits nothing.
    pub fn commit<S: NodeStore>(self, store: &S) -> Result<usize> {
        if self.records.is_empty() {
            return Ok(0);
        }
        store.insert_node_records(&self.records)?;
        Ok(self.records.len())
    }
}
