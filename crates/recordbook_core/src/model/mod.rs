//! Domain model for stored records.
//!
//! # Responsibility
//! - Define the record value type and its validation predicates.
//!
//! # Invariants
//! - Every `Record` reachable through the public API satisfies
//!   `Record::validate()`.
//! - Identifiers are never reused after deletion.

pub mod record;
