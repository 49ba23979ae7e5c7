//! Logging bootstrap and store-event sink.
//!
//! # Responsibility
//! - Start one rolling file logger per process.
//! - Translate buffered `StoreEvent`s into `key=value` log lines.
//!
//! # Invariants
//! - The first successful `init_logging` fixes level and directory; later
//!   calls succeed only when they ask for the same pair.
//! - Initialization reports failures as `LoggingError`, never panics.

use crate::store::event::{EventLevel, StoreEvent};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, Level};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "recordbook";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;
const MAX_EVENT_DETAIL_CHARS: usize = 240;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

/// Verbosity accepted by `init_logging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parses a case-insensitive level name; `warning` is accepted for `warn`.
    pub fn parse(value: &str) -> Result<Self, LoggingError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(LoggingError::UnsupportedLevel(value.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// `Debug` in debug builds, `Info` in release builds.
pub fn default_log_level() -> LogLevel {
    if cfg!(debug_assertions) {
        LogLevel::Debug
    } else {
        LogLevel::Info
    }
}

#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    RelativeDir(PathBuf),
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Backend(String),
    /// A logger is already running with a different level or directory.
    Conflict {
        active_level: LogLevel,
        active_dir: PathBuf,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeDir(path) => {
                write!(f, "log directory must be absolute, got `{}`", path.display())
            }
            Self::CreateDir { path, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                path.display()
            ),
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
            Self::Conflict {
                active_level,
                active_dir,
            } => write!(
                f,
                "logging already running at level `{}` in `{}`",
                active_level.as_str(),
                active_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

struct ActiveLogger {
    level: LogLevel,
    dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn ensure_matches(&self, level: LogLevel, dir: &Path) -> Result<(), LoggingError> {
        if self.level == level && self.dir == dir {
            return Ok(());
        }
        Err(LoggingError::Conflict {
            active_level: self.level,
            active_dir: self.dir.clone(),
        })
    }
}

/// Starts rolling file logs under `log_dir`.
///
/// Files are named `recordbook*.log`, rotated at 10 MiB, five kept.
/// A panic hook is installed with the logger so panics land in the log.
pub fn init_logging(level: LogLevel, log_dir: &Path) -> Result<(), LoggingError> {
    if !log_dir.is_absolute() {
        return Err(LoggingError::RelativeDir(log_dir.to_path_buf()));
    }
    ACTIVE_LOGGER
        .get_or_try_init(|| start_logger(level, log_dir))?
        .ensure_matches(level, log_dir)
}

fn start_logger(level: LogLevel, dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let handle = Logger::try_with_str(level.as_str())
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        // [YYYY-MM-DD HH:MM:SS.ffffff TZ] LEVEL [module] file:line: message
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=logging_start module=recordbook status=ok level={} log_dir={} version={}",
        level.as_str(),
        dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

/// Writes drained store events to the active logger, oldest first.
pub fn emit_store_events(events: Vec<StoreEvent>) {
    for event in &events {
        let level = match event.level {
            EventLevel::Info => Level::Info,
            EventLevel::Warn => Level::Warn,
            EventLevel::Error => Level::Error,
        };
        log::log!(level, "{}", store_event_line(event));
    }
}

fn store_event_line(event: &StoreEvent) -> String {
    let mut line = format!("event={} module=store status={}", event.event, event.status);
    if let Some(id) = event.id {
        line.push_str(&format!(" id={id}"));
    }
    if !event.detail.is_empty() {
        line.push_str(" detail=");
        line.push_str(&one_line(&event.detail, MAX_EVENT_DETAIL_CHARS));
    }
    line
}

// Runs once: only reachable from `start_logger`, which the OnceCell guards.
fn install_panic_hook() {
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| message.to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        // Payload may echo record fields; keep it on one line and bounded.
        error!(
            "event=panic module=recordbook status=error location={} payload={}",
            location,
            one_line(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

fn one_line(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let mut truncated: String = flattened.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::{init_logging, one_line, store_event_line, LogLevel, LoggingError};
    use crate::store::event::{EventLevel, EventStatus, StoreEvent};
    use std::path::Path;

    #[test]
    fn level_parsing_is_case_insensitive() {
        assert_eq!(LogLevel::parse("INFO").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::parse(" warning ").unwrap(), LogLevel::Warn);
        assert!(matches!(
            LogLevel::parse("loud"),
            Err(LoggingError::UnsupportedLevel(value)) if value == "loud"
        ));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = init_logging(LogLevel::Info, Path::new("logs/dev")).unwrap_err();
        assert!(matches!(err, LoggingError::RelativeDir(_)));
    }

    #[test]
    fn one_line_flattens_and_truncates() {
        assert_eq!(one_line("a\nb\rc", 10), "a b c");
        assert_eq!(one_line("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn store_event_line_uses_key_value_layout() {
        let event = StoreEvent {
            level: EventLevel::Warn,
            event: "record_update",
            status: EventStatus::Rejected,
            id: Some(3),
            detail: "invalid email address: `x`\nnext".to_string(),
        };
        assert_eq!(
            store_event_line(&event),
            "event=record_update module=store status=rejected id=3 detail=invalid email address: `x` next"
        );
    }

    #[test]
    fn store_event_line_omits_empty_fields() {
        let event = StoreEvent {
            level: EventLevel::Info,
            event: "record_delete",
            status: EventStatus::Ok,
            id: None,
            detail: String::new(),
        };
        assert_eq!(
            store_event_line(&event),
            "event=record_delete module=store status=ok"
        );
    }

    #[test]
    fn init_logging_accepts_same_config_and_rejects_changes() {
        // The logger outlives the test, so its directory is not cleaned up.
        let root = std::env::temp_dir().join(format!(
            "recordbook-logging-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let log_dir = root.join("logs");
        let other_dir = root.join("other");

        init_logging(LogLevel::Info, &log_dir).unwrap();
        init_logging(LogLevel::Info, &log_dir).unwrap();
        assert!(log_dir.is_dir());

        for (level, dir) in [(LogLevel::Debug, &log_dir), (LogLevel::Info, &other_dir)] {
            match init_logging(level, dir) {
                Err(LoggingError::Conflict {
                    active_level,
                    active_dir,
                }) => {
                    assert_eq!(active_level, LogLevel::Info);
                    assert_eq!(active_dir, log_dir);
                }
                other => panic!("expected conflict, got {other:?}"),
            }
        }
    }
}
