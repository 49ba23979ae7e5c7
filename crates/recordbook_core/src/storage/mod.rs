//! File persistence for store snapshots.
//!
//! # Responsibility
//! - Read and write snapshot bytes on disk.
//! - Keep file access out of the store itself.
//!
//! # Invariants
//! - A missing snapshot file on load is not an error.
//! - Saving overwrites the whole file; there is no partial write path.

use crate::store::record_store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod snapshot_file;

pub use snapshot_file::{LoadOutcome, SnapshotFile};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Store(StoreError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o failure on `{}`: {source}", path.display()),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for StorageError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
