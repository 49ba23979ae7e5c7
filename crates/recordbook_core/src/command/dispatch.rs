//! Command dispatcher over a `RecordStore`.
//!
//! # Responsibility
//! - Map each parsed command to exactly one store (or snapshot) operation.
//! - Render human-readable reply lines.
//! - Forward buffered store events to the logging collaborator.
//!
//! # Invariants
//! - Store and storage errors become reply lines; dispatch never panics or
//!   aborts the caller.

use crate::command::parse::{parse_command, Command};
use crate::logging::emit_store_events;
use crate::model::record::Record;
use crate::storage::SnapshotFile;
use crate::store::record_store::{RecordStore, StoreResult};
use chrono::Local;
use log::debug;

const CREATED_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const HELP_LINES: &[&str] = &[
    "commands:",
    "  add <name> <email> <age>          create a record",
    "  get <id>                          show one record",
    "  update <id> <name> <email> <age>  update a record (age <= 0 keeps the current age)",
    "  delete <id>                       delete a record",
    "  list                              list all records",
    "  search <name>                     case-insensitive name search",
    "  activate <id>                     mark a record active",
    "  deactivate <id>                   mark a record inactive",
    "  count                             number of records",
    "  active                            list active records",
    "  save                              write the snapshot file",
    "  help                              show this list",
    "  quit | exit                       leave",
];

/// Rendered result of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    /// `false` when the command was rejected.
    pub ok: bool,
    /// Caller should stop reading commands.
    pub quit: bool,
}

impl Reply {
    fn ok(lines: Vec<String>) -> Self {
        Self {
            lines,
            ok: true,
            quit: false,
        }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::ok(vec![line.into()])
    }

    fn failure(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            ok: false,
            quit: false,
        }
    }

    fn from_result<T>(
        result: StoreResult<T>,
        action: &str,
        on_ok: impl FnOnce(T) -> Vec<String>,
    ) -> Self {
        match result {
            Ok(value) => Self::ok(on_ok(value)),
            Err(err) => Self::failure(format!("{action} failed: {err}")),
        }
    }
}

/// Text-command front end for one store and its snapshot file.
pub struct CommandDispatcher {
    store: RecordStore,
    snapshot: SnapshotFile,
}

impl CommandDispatcher {
    pub fn new(store: RecordStore, snapshot: SnapshotFile) -> Self {
        Self { store, snapshot }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn snapshot_file(&self) -> &SnapshotFile {
        &self.snapshot
    }

    /// Parses and executes one input line.
    pub fn execute_line(&mut self, line: &str) -> Reply {
        match parse_command(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Reply::ok(Vec::new()),
            Err(err) => {
                debug!("event=command_parse module=command status=rejected error={err}");
                Reply::failure(err.to_string())
            }
        }
    }

    /// Executes one parsed command, then drains store events into the log.
    pub fn execute(&mut self, command: Command) -> Reply {
        let name = command.name();
        let reply = self.run(command);
        emit_store_events(self.store.drain_events());
        debug!(
            "event=command_dispatch module=command command={} status={} lines={}",
            name,
            if reply.ok { "ok" } else { "rejected" },
            reply.lines.len()
        );
        reply
    }

    fn run(&mut self, command: Command) -> Reply {
        match command {
            Command::Add { name, email, age } => Reply::from_result(
                self.store.create(&name, &email, age),
                "add",
                |record| vec![format!("record added: ID={}", record.id())],
            ),
            Command::Get { id } => Reply::from_result(self.store.get(id), "get", |record| {
                vec![format_record(&record)]
            }),
            Command::Update {
                id,
                name,
                email,
                age,
            } => Reply::from_result(
                self.store.update(id, &name, &email, age),
                "update",
                |record| vec![format!("record updated: {}", format_record(&record))],
            ),
            Command::Delete { id } => Reply::from_result(self.store.delete(id), "delete", |()| {
                vec![format!("record deleted: ID={id}")]
            }),
            Command::List => {
                let records = self.store.list();
                if records.is_empty() {
                    return Reply::line("no records");
                }
                Reply::ok(records.iter().map(format_record).collect())
            }
            Command::Search { name } => {
                let records = self.store.search_by_name(&name);
                if records.is_empty() {
                    return Reply::line(format!("no records match `{name}`"));
                }
                Reply::ok(records.iter().map(format_summary).collect())
            }
            Command::Activate { id } => {
                Reply::from_result(self.store.activate(id), "activate", |()| {
                    vec![format!("record activated: ID={id}")]
                })
            }
            Command::Deactivate { id } => {
                Reply::from_result(self.store.deactivate(id), "deactivate", |()| {
                    vec![format!("record deactivated: ID={id}")]
                })
            }
            Command::Count => Reply::line(format!("total records: {}", self.store.count())),
            Command::Active => {
                let records = self.store.active_records();
                if records.is_empty() {
                    return Reply::line("no active records");
                }
                Reply::ok(records.iter().map(format_summary).collect())
            }
            Command::Save => match self.snapshot.save_from(&self.store) {
                Ok(records) => Reply::line(format!(
                    "saved {records} records to {}",
                    self.snapshot.path().display()
                )),
                Err(err) => Reply::failure(format!("save failed: {err}")),
            },
            Command::Help => Reply::ok(HELP_LINES.iter().map(|line| line.to_string()).collect()),
            Command::Quit => Reply {
                lines: vec!["bye".to_string()],
                ok: true,
                quit: true,
            },
        }
    }
}

/// Full one-line rendering used by `get`, `list` and `update`.
pub fn format_record(record: &Record) -> String {
    format!(
        "ID: {}, name: {}, email: {}, age: {}, created: {}, status: {}",
        record.id(),
        record.name(),
        record.email(),
        record.age(),
        record
            .created()
            .with_timezone(&Local)
            .format(CREATED_DISPLAY_FORMAT),
        if record.is_active() { "active" } else { "inactive" }
    )
}

/// Short rendering used by `search` and `active`.
pub fn format_summary(record: &Record) -> String {
    format!("ID: {}, name: {}", record.id(), record.name())
}
