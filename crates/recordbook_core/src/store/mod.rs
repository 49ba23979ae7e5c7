//! Record store and its snapshot codec.
//!
//! # Responsibility
//! - Own all records and the identifier counter.
//! - Enforce validation before every mutation.
//! - Expose observability as buffered events instead of logging directly.
//!
//! # Invariants
//! - Identifiers are unique, strictly increasing and never reused.
//! - Loading a snapshot replaces state wholesale.

pub mod event;
pub mod record_store;
pub mod shared;
mod snapshot;
