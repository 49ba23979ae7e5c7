//! JSON snapshot encoding for `RecordStore`.
//!
//! # Invariants
//! - A snapshot is a JSON object keyed by decimal identifier; each value is
//!   the full record with wire fields `id,name,email,age,created,active`.
//! - Loading is a full replace, never a merge.
//! - A rejected snapshot leaves the store exactly as it was.

use crate::model::record::{Record, RecordId};
use crate::store::record_store::{RecordStore, StoreError, StoreResult};
use std::collections::BTreeMap;

impl RecordStore {
    /// Serializes the whole mapping as pretty-printed JSON.
    pub fn save_snapshot(&self) -> StoreResult<Vec<u8>> {
        serde_json::to_vec_pretty(&self.records).map_err(StoreError::Serialization)
    }

    /// Replaces the in-memory state with the decoded snapshot.
    ///
    /// Empty or whitespace-only input is accepted as "nothing stored yet" and
    /// leaves the current state in place. After a successful load the counter
    /// is `max(id) + 1`, or `1` for an empty snapshot.
    ///
    /// # Errors
    /// - `Deserialization` for malformed JSON, records failing validation,
    ///   an object key that disagrees with its record `id`, or a highest id
    ///   of `RecordId::MAX` (no successor left for the counter).
    pub fn load_snapshot(&mut self, bytes: &[u8]) -> StoreResult<()> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return self.observe("snapshot_load", None, Ok(()), |_| {
                "empty input; state unchanged".to_string()
            });
        }

        let result = decode_snapshot(bytes).map(|(records, next_id)| {
            let loaded = records.len();
            self.next_id = next_id;
            self.records = records;
            loaded
        });
        self.observe("snapshot_load", None, result, |loaded| {
            format!("records={loaded}")
        })
        .map(|_| ())
    }
}

fn decode_snapshot(bytes: &[u8]) -> StoreResult<(BTreeMap<RecordId, Record>, RecordId)> {
    let records: BTreeMap<RecordId, Record> = serde_json::from_slice(bytes)
        .map_err(|err| StoreError::Deserialization(err.to_string()))?;

    if let Some((key, record)) = records.iter().find(|(key, record)| **key != record.id()) {
        return Err(StoreError::Deserialization(format!(
            "snapshot key {key} does not match record id {}",
            record.id()
        )));
    }

    let next_id = match records.keys().next_back() {
        None => 1,
        Some(max) => max.checked_add(1).ok_or_else(|| {
            StoreError::Deserialization(format!("record id {max} leaves no next identifier"))
        })?,
    };

    Ok((records, next_id))
}
