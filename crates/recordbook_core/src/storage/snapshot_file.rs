//! Snapshot file adapter.
//!
//! # Responsibility
//! - Load a snapshot file into a store and save a store to a file.
//! - Emit `snapshot_load` / `snapshot_save` logging events with duration.
//!
//! # Invariants
//! - Saves go through a sibling temp file plus rename, so readers never see
//!   a half-written snapshot.

use super::{StorageError, StorageResult};
use crate::store::record_store::RecordStore;
use log::{error, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Result of a load attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// File was absent; store left as it was.
    Missing,
    /// Snapshot decoded; store now holds `records` records.
    Loaded { records: usize },
}

/// Snapshot file location bound to one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file and replaces the store state with its contents.
    ///
    /// # Errors
    /// - `Io` when the file exists but cannot be read.
    /// - `Store(Deserialization)` when its contents are rejected.
    pub fn load_into(&self, store: &mut RecordStore) -> StorageResult<LoadOutcome> {
        let started_at = Instant::now();
        info!(
            "event=snapshot_load module=storage status=start path={}",
            self.path.display()
        );

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(
                    "event=snapshot_load module=storage status=missing path={} duration_ms={}",
                    self.path.display(),
                    started_at.elapsed().as_millis()
                );
                return Ok(LoadOutcome::Missing);
            }
            Err(err) => {
                error!(
                    "event=snapshot_load module=storage status=error path={} duration_ms={} error_code=read_failed error={}",
                    self.path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(self.io_error(err));
            }
        };

        match store.load_snapshot(&bytes) {
            Ok(()) => {
                let records = store.count();
                info!(
                    "event=snapshot_load module=storage status=ok path={} records={} duration_ms={}",
                    self.path.display(),
                    records,
                    started_at.elapsed().as_millis()
                );
                Ok(LoadOutcome::Loaded { records })
            }
            Err(err) => {
                error!(
                    "event=snapshot_load module=storage status=error path={} duration_ms={} error_code=decode_failed error={}",
                    self.path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Overwrites the file with the full store snapshot.
    ///
    /// Creates the parent directory when missing. Returns the number of
    /// records written.
    pub fn save_from(&self, store: &RecordStore) -> StorageResult<usize> {
        let started_at = Instant::now();
        info!(
            "event=snapshot_save module=storage status=start path={}",
            self.path.display()
        );

        match self.write_snapshot(store) {
            Ok(records) => {
                info!(
                    "event=snapshot_save module=storage status=ok path={} records={} duration_ms={}",
                    self.path.display(),
                    records,
                    started_at.elapsed().as_millis()
                );
                Ok(records)
            }
            Err(err) => {
                error!(
                    "event=snapshot_save module=storage status=error path={} duration_ms={} error={}",
                    self.path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn write_snapshot(&self, store: &RecordStore) -> StorageResult<usize> {
        let bytes = store.save_snapshot()?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let staging = self.staging_path();
        fs::write(&staging, &bytes).map_err(|err| StorageError::Io {
            path: staging.clone(),
            source: err,
        })?;
        if let Err(err) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(self.io_error(err));
        }

        Ok(store.count())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
