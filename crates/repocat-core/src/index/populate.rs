//! File catalogue population
//!
//! Recursively walks a directory tree, deduplicates symlink aliases onto
//! canonical hard records and writes a soft record per observed path.

use crate::db::{FileStore, HardFileRecord, SoftFileRecord};
use crate::error::{Error, Result};
use crate::index::probe::probe_file;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Per-run counters reported back to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct PopulateSummary {
    /// Distinct canonical files catalogued
    pub hard_files: usize,
    /// Paths observed, including the canonical paths themselves
    pub soft_files: usize,
    /// Entries that failed metadata computation or insertion
    pub failures: usize,
}

/// Populate the file catalogue from a directory tree.
///
/// With `wipe` the schema is dropped, recreated and cleared before the scan;
/// without it, any pre-existing record aborts the call before the filesystem
/// is touched. The walk follows symbolic links; each distinct canonical path
/// gets one hard record, each observed path a soft record pointing at it.
///
/// Per-file failures are logged and recovered: the walk continues and a
/// partial hard record with `processed = false` is still inserted where a
/// content identity exists.
pub fn populate_index<S: FileStore>(store: &S, root: &Path, wipe: bool) -> Result<PopulateSummary> {
    // refuse over existing data before touching the filesystem at all
    if !wipe
        && (!store.query_hard_records("%")?.is_empty()
            || !store.query_soft_records("%")?.is_empty())
    {
        return Err(Error::ExistingData(
            "there are existing records in the index; re-run with wipe enabled".to_string(),
        ));
    }

    if !root.is_dir() {
        return Err(Error::InvalidInput(format!(
            "input path {} is not a directory or does not exist",
            root.display()
        )));
    }

    if wipe {
        store.initialize_schema(true)?;
        store.wipe_data()?;
    }

    let mut summary = PopulateSummary::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                summary.failures += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        // the path as observed, absolute but with symlinks left in place
        let observed = match std::path::absolute(entry.path()) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Cannot absolutize {}: {}", entry.path().display(), e);
                summary.failures += 1;
                continue;
            }
        };
        let canonical = match entry.path().canonicalize() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Cannot resolve {}: {}", entry.path().display(), e);
                summary.failures += 1;
                continue;
            }
        };

        if seen.insert(canonical.clone()) {
            let record = probe_hard_record(&canonical);
            if !record.processed {
                summary.failures += 1;
            }
            match store.insert_hard_records(&[record]) {
                Ok(()) => summary.hard_files += 1,
                Err(e) => {
                    tracing::warn!(
                        "Failed to insert hard record for {}: {}",
                        canonical.display(),
                        e
                    );
                    summary.failures += 1;
                }
            }
        }

        let soft = SoftFileRecord {
            path: observed.to_string_lossy().into_owned(),
            hard_path: canonical.to_string_lossy().into_owned(),
        };
        match store.insert_soft_records(&[soft]) {
            Ok(()) => summary.soft_files += 1,
            Err(e) => {
                tracing::warn!(
                    "Failed to insert soft record for {}: {}",
                    observed.display(),
                    e
                );
                summary.failures += 1;
            }
        }
    }

    Ok(summary)
}

/// Build the hard record for a canonical path, recovering from I/O errors.
///
/// On failure the record keeps whatever was computed so far and stays
/// `processed = false`; the catalogue retains attempted-but-failed scans.
fn probe_hard_record(canonical: &Path) -> HardFileRecord {
    let mut record = HardFileRecord {
        path: canonical.to_string_lossy().into_owned(),
        size: 0,
        is_binary: false,
        number_of_lines: 0,
        processed: false,
    };

    match std::fs::metadata(canonical) {
        Ok(meta) => record.size = meta.len(),
        Err(e) => {
            tracing::warn!("Cannot stat {}: {}", canonical.display(), e);
            return record;
        }
    }

    match probe_file(canonical) {
        Ok(probe) => {
            record.is_binary = probe.is_binary;
            record.number_of_lines = probe.number_of_lines;
            record.processed = true;
        }
        Err(e) => {
            tracing::warn!("Error processing file {}: {}", canonical.display(), e);
        }
    }

    record
}
