//! Core logic for recordbook.
//! This crate is the single source of truth for record invariants.

pub mod command;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;

pub use command::dispatch::{format_record, format_summary, CommandDispatcher, Reply};
pub use command::parse::{parse_command, parse_int_lenient, Command, CommandError};
pub use logging::{default_log_level, emit_store_events, init_logging, LogLevel, LoggingError};
pub use model::record::{Record, RecordId, RecordValidationError, MAX_AGE, MIN_AGE};
pub use storage::{LoadOutcome, SnapshotFile, StorageError, StorageResult};
pub use store::event::{EventLevel, EventStatus, StoreEvent};
pub use store::record_store::{RecordStore, StoreError, StoreResult};
pub use store::shared::SharedRecordStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
