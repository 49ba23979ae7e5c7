//! Observability events produced by store operations.
//!
//! The store never logs directly. It buffers `StoreEvent`s and a consumer
//! (the command dispatcher, via `logging::emit_store_events`) drains them.

use crate::model::record::RecordId;
use std::fmt::{Display, Formatter};

/// Severity of a store event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

/// Outcome class of a store event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    /// Operation applied.
    Ok,
    /// Caller input rejected (validation, lookup, state conflict).
    Rejected,
    /// Serialization layer failed.
    Failed,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Rejected => "rejected",
            Self::Failed => "error",
        }
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured event emitted by a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub level: EventLevel,
    /// Stable event name, e.g. `record_create`.
    pub event: &'static str,
    pub status: EventStatus,
    /// Target record, when the operation addresses one.
    pub id: Option<RecordId>,
    /// Human-readable detail (error message or summary).
    pub detail: String,
}

impl StoreEvent {
    pub(crate) fn ok(event: &'static str, id: Option<RecordId>, detail: impl Into<String>) -> Self {
        Self {
            level: EventLevel::Info,
            event,
            status: EventStatus::Ok,
            id,
            detail: detail.into(),
        }
    }

    pub(crate) fn rejected(
        level: EventLevel,
        event: &'static str,
        id: Option<RecordId>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            level,
            event,
            status: EventStatus::Rejected,
            id,
            detail: detail.into(),
        }
    }

    pub(crate) fn failed(event: &'static str, detail: impl Into<String>) -> Self {
        Self {
            level: EventLevel::Error,
            event,
            status: EventStatus::Failed,
            id: None,
            detail: detail.into(),
        }
    }
}
