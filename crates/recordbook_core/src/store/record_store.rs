//! In-memory record store.
//!
//! # Responsibility
//! - Own the identifier -> record mapping and the identifier counter.
//! - Validate every write before it touches the mapping.
//! - Buffer one `StoreEvent` per mutating operation.
//!
//! # Invariants
//! - `next_id` is greater than every identifier ever issued by this store
//!   or present in the last loaded snapshot.
//! - The counter advances only on a successful create.
//! - A failing operation leaves the mapping and counter untouched.

use crate::model::record::{
    validate_age, validate_email, validate_name, Record, RecordId, RecordValidationError,
};
use crate::store::event::{EventLevel, StoreEvent};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error taxonomy for store operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(RecordValidationError),
    NotFound(RecordId),
    AlreadyActive(RecordId),
    AlreadyInactive(RecordId),
    /// The counter cannot advance past `RecordId::MAX`.
    IdsExhausted,
    Serialization(serde_json::Error),
    Deserialization(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record {id} does not exist"),
            Self::AlreadyActive(id) => write!(f, "record {id} is already active"),
            Self::AlreadyInactive(id) => write!(f, "record {id} is already inactive"),
            Self::IdsExhausted => write!(f, "no record identifiers left to issue"),
            Self::Serialization(err) => write!(f, "failed to serialize snapshot: {err}"),
            Self::Deserialization(message) => {
                write!(f, "failed to deserialize snapshot: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::NotFound(_)
            | Self::AlreadyActive(_)
            | Self::AlreadyInactive(_)
            | Self::IdsExhausted
            | Self::Deserialization(_) => None,
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl StoreError {
    fn to_event(&self, event: &'static str, id: Option<RecordId>) -> StoreEvent {
        match self {
            Self::Validation(_) | Self::AlreadyActive(_) | Self::AlreadyInactive(_) => {
                StoreEvent::rejected(EventLevel::Warn, event, id, self.to_string())
            }
            Self::NotFound(_) | Self::IdsExhausted => {
                StoreEvent::rejected(EventLevel::Error, event, id, self.to_string())
            }
            Self::Serialization(_) | Self::Deserialization(_) => {
                StoreEvent::failed(event, self.to_string())
            }
        }
    }
}

/// Single-owner in-memory store of records.
#[derive(Debug)]
pub struct RecordStore {
    pub(super) records: BTreeMap<RecordId, Record>,
    pub(super) next_id: RecordId,
    pub(super) events: Vec<StoreEvent>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Creates an empty store whose first issued identifier is `1`.
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: 1,
            events: Vec::new(),
        }
    }

    /// Validates and stores a new record, returning the stored value.
    ///
    /// # Errors
    /// - `Validation(EmptyName)` when the trimmed name is empty.
    /// - `Validation(InvalidEmail)` when email lacks `@` or `.`.
    /// - `Validation(InvalidAge)` when age is outside `[0, 150]`.
    /// - `IdsExhausted` when the counter already sits at `RecordId::MAX`.
    pub fn create(&mut self, name: &str, email: &str, age: i64) -> StoreResult<Record> {
        let result = self.try_create(name, email, age);
        let id = result.as_ref().ok().map(Record::id);
        self.observe("record_create", id, result, |record| {
            format!("name={} email={}", record.name(), record.email())
        })
    }

    fn try_create(&mut self, name: &str, email: &str, age: i64) -> StoreResult<Record> {
        let name = validate_name(name)?;
        validate_email(email)?;
        let age = validate_age(age)?;

        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted)?;

        let record = Record::new(self.next_id, name, email.to_string(), age);
        self.records.insert(record.id(), record.clone());
        self.next_id = next_id;
        Ok(record)
    }

    /// Looks up one record by identifier.
    pub fn get(&self, id: RecordId) -> StoreResult<Record> {
        self.records.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// Applies a partial update with all-or-nothing semantics.
    ///
    /// - Blank `name` (after trim) keeps the current name.
    /// - Empty `email` keeps the current email; a non-empty invalid one fails.
    /// - `age <= 0` keeps the current age, so age cannot be set to `0` here.
    ///
    /// Every field is validated before the stored value is replaced.
    pub fn update(
        &mut self,
        id: RecordId,
        name: &str,
        email: &str,
        age: i64,
    ) -> StoreResult<Record> {
        let result = self.try_update(id, name, email, age);
        self.observe("record_update", Some(id), result, |record| {
            format!(
                "name={} email={} age={}",
                record.name(),
                record.email(),
                record.age()
            )
        })
    }

    fn try_update(
        &mut self,
        id: RecordId,
        name: &str,
        email: &str,
        age: i64,
    ) -> StoreResult<Record> {
        let current = self.get(id)?;

        let name = match name.trim() {
            "" => None,
            trimmed => Some(trimmed.to_string()),
        };
        let email = if email.is_empty() {
            None
        } else {
            validate_email(email)?;
            Some(email.to_string())
        };
        let age = if age > 0 { Some(validate_age(age)?) } else { None };

        let mut updated = current;
        if let Some(name) = name {
            updated = updated.with_name(name);
        }
        if let Some(email) = email {
            updated = updated.with_email(email);
        }
        if let Some(age) = age {
            updated = updated.with_age(age);
        }

        self.records.insert(id, updated.clone());
        Ok(updated)
    }

    /// Removes a record. Its identifier is never issued again.
    pub fn delete(&mut self, id: RecordId) -> StoreResult<()> {
        let result = match self.records.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id)),
        };
        self.observe("record_delete", Some(id), result, |_| String::new())
    }

    /// Returns every record. Callers must not rely on the order.
    pub fn list(&self) -> Vec<Record> {
        self.records.values().cloned().collect()
    }

    /// Case-insensitive substring match on record names.
    pub fn search_by_name(&self, needle: &str) -> Vec<Record> {
        let needle = needle.to_lowercase();
        self.records
            .values()
            .filter(|record| record.name().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Marks an inactive record active. Not idempotent.
    pub fn activate(&mut self, id: RecordId) -> StoreResult<()> {
        let result = self.set_active(id, true);
        self.observe("record_activate", Some(id), result, |_| String::new())
    }

    /// Marks an active record inactive. Not idempotent.
    pub fn deactivate(&mut self, id: RecordId) -> StoreResult<()> {
        let result = self.set_active(id, false);
        self.observe("record_deactivate", Some(id), result, |_| String::new())
    }

    fn set_active(&mut self, id: RecordId, active: bool) -> StoreResult<()> {
        let current = self.get(id)?;
        match (current.is_active(), active) {
            (true, true) => return Err(StoreError::AlreadyActive(id)),
            (false, false) => return Err(StoreError::AlreadyInactive(id)),
            _ => {}
        }
        self.records.insert(id, current.with_active(active));
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Returns records whose active flag is set.
    pub fn active_records(&self) -> Vec<Record> {
        self.records
            .values()
            .filter(|record| record.is_active())
            .cloned()
            .collect()
    }

    /// Identifier the next successful create will receive.
    pub fn next_id(&self) -> RecordId {
        self.next_id
    }

    /// Takes all buffered events, oldest first.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }

    pub(super) fn observe<T>(
        &mut self,
        event: &'static str,
        id: Option<RecordId>,
        result: StoreResult<T>,
        describe: impl FnOnce(&T) -> String,
    ) -> StoreResult<T> {
        let entry = match &result {
            Ok(value) => StoreEvent::ok(event, id, describe(value)),
            Err(err) => err.to_event(event, id),
        };
        self.events.push(entry);
        result
    }
}
