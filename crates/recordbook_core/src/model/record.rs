//! Record domain model.
//!
//! # Responsibility
//! - Define the canonical record value owned by the store.
//! - Own the field validation predicates shared by create/update/load paths.
//!
//! # Invariants
//! - `id` is positive and assigned by the store, never by callers.
//! - `name` is non-empty after trimming and is stored trimmed.
//! - `email` contains both `@` and `.`.
//! - `age` lies in `[MIN_AGE, MAX_AGE]`.
//! - `created` is set once and never changes.
//! - A `Record` is never mutated in place; `with_*` helpers build a new value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned record identifier.
pub type RecordId = u64;

/// Lowest accepted age (inclusive).
pub const MIN_AGE: i64 = 0;
/// Highest accepted age (inclusive).
pub const MAX_AGE: i64 = 150;

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Name is empty after trimming whitespace.
    EmptyName,
    /// Email lacks `@` or `.`.
    InvalidEmail { email: String },
    /// Age outside `[MIN_AGE, MAX_AGE]`.
    InvalidAge { age: i64 },
    /// Identifier `0` is never issued.
    ZeroId,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::InvalidEmail { email } => write!(f, "invalid email address: `{email}`"),
            Self::InvalidAge { age } => write!(
                f,
                "age must be between {MIN_AGE} and {MAX_AGE}, got {age}"
            ),
            Self::ZeroId => write!(f, "record id must be positive"),
        }
    }
}

impl Error for RecordValidationError {}

/// Canonical stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct Record {
    id: RecordId,
    name: String,
    email: String,
    age: u8,
    /// Serialized as RFC 3339 with sub-second precision.
    created: DateTime<Utc>,
    active: bool,
}

/// Unchecked wire shape; converted into `Record` only through validation.
#[derive(Deserialize)]
struct RecordFields {
    id: RecordId,
    name: String,
    email: String,
    age: i64,
    created: DateTime<Utc>,
    active: bool,
}

impl TryFrom<RecordFields> for Record {
    type Error = RecordValidationError;

    fn try_from(fields: RecordFields) -> Result<Self, Self::Error> {
        if fields.id == 0 {
            return Err(RecordValidationError::ZeroId);
        }
        let record = Self {
            id: fields.id,
            name: validate_name(&fields.name)?,
            email: fields.email,
            age: validate_age(fields.age)?,
            created: fields.created,
            active: fields.active,
        };
        record.validate()?;
        Ok(record)
    }
}

impl Record {
    /// Builds a freshly created record: `active = true`, `created = now`.
    ///
    /// Callers must pass already-validated field values.
    pub(crate) fn new(id: RecordId, name: String, email: String, age: u8) -> Self {
        Self {
            id,
            name,
            email,
            age,
            created: Utc::now(),
            active: true,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    /// Creation instant, fixed for the record lifetime.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Re-checks every field predicate.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id == 0 {
            return Err(RecordValidationError::ZeroId);
        }
        if self.name.trim().is_empty() {
            return Err(RecordValidationError::EmptyName);
        }
        validate_email(&self.email)?;
        validate_age(i64::from(self.age))?;
        Ok(())
    }

    pub(crate) fn with_name(self, name: String) -> Self {
        Self { name, ..self }
    }

    pub(crate) fn with_email(self, email: String) -> Self {
        Self { email, ..self }
    }

    pub(crate) fn with_age(self, age: u8) -> Self {
        Self { age, ..self }
    }

    pub(crate) fn with_active(self, active: bool) -> Self {
        Self { active, ..self }
    }
}

/// Returns the trimmed name, or `EmptyName` when nothing is left.
pub fn validate_name(name: &str) -> Result<String, RecordValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RecordValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Weak email check: must contain `@` and `.` somewhere. Not RFC 5322.
pub fn validate_email(email: &str) -> Result<(), RecordValidationError> {
    if email.contains('@') && email.contains('.') {
        Ok(())
    } else {
        Err(RecordValidationError::InvalidEmail {
            email: email.to_string(),
        })
    }
}

/// Narrows a caller-supplied age into the stored representation.
pub fn validate_age(age: i64) -> Result<u8, RecordValidationError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(RecordValidationError::InvalidAge { age });
    }
    u8::try_from(age).map_err(|_| RecordValidationError::InvalidAge { age })
}
