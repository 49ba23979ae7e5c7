//! Thread-shareable handle around one `RecordStore`.
//!
//! The whole store sits behind a single mutex; every closure passed to
//! `with` runs one or more operations under that lock.

use crate::store::record_store::RecordStore;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct SharedRecordStore {
    inner: Arc<Mutex<RecordStore>>,
}

impl SharedRecordStore {
    pub fn new(store: RecordStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with exclusive access to the store.
    pub fn with<T>(&self, f: impl FnOnce(&mut RecordStore) -> T) -> T {
        // Store operations validate before mutating, so a poisoned guard still
        // holds a consistent store.
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}
