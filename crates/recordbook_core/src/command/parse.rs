//! Text command parsing.
//!
//! # Invariants
//! - Tokens are split on whitespace; arguments therefore never contain spaces.
//! - Argument-count mismatches are usage errors, never store errors.
//! - Numeric arguments use `parse_int_lenient`: unparseable input becomes `0`.

use crate::model::record::RecordId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const USAGE_ADD: &str = "add <name> <email> <age>";
pub const USAGE_GET: &str = "get <id>";
pub const USAGE_UPDATE: &str = "update <id> <name> <email> <age>";
pub const USAGE_DELETE: &str = "delete <id>";
pub const USAGE_SEARCH: &str = "search <name>";
pub const USAGE_ACTIVATE: &str = "activate <id>";
pub const USAGE_DEACTIVATE: &str = "deactivate <id>";

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        name: String,
        email: String,
        age: i64,
    },
    Get {
        id: RecordId,
    },
    Update {
        id: RecordId,
        name: String,
        email: String,
        age: i64,
    },
    Delete {
        id: RecordId,
    },
    List,
    Search {
        name: String,
    },
    Activate {
        id: RecordId,
    },
    Deactivate {
        id: RecordId,
    },
    Count,
    Active,
    Save,
    Help,
    Quit,
}

impl Command {
    /// Stable lowercase name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Get { .. } => "get",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::List => "list",
            Self::Search { .. } => "search",
            Self::Activate { .. } => "activate",
            Self::Deactivate { .. } => "deactivate",
            Self::Count => "count",
            Self::Active => "active",
            Self::Save => "save",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Wrong number of arguments; carries the expected form.
    Usage(&'static str),
    /// First word is not a known command.
    Unknown(String),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(usage) => write!(f, "usage: {usage}"),
            Self::Unknown(word) => {
                write!(f, "unknown command `{word}`; type `help` for the command list")
            }
        }
    }
}

impl Error for CommandError {}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((word, args)) = parts.split_first() else {
        return Ok(None);
    };

    let command = match word.to_lowercase().as_str() {
        "quit" | "exit" => Command::Quit,
        "help" => Command::Help,
        "list" => Command::List,
        "count" => Command::Count,
        "active" => Command::Active,
        "save" => Command::Save,
        "add" => match args {
            [name, email, age] => Command::Add {
                name: name.to_string(),
                email: email.to_string(),
                age: parse_int_lenient(age),
            },
            _ => return Err(CommandError::Usage(USAGE_ADD)),
        },
        "get" => Command::Get {
            id: single_id(args, USAGE_GET)?,
        },
        "update" => match args {
            [id, name, email, age] => Command::Update {
                id: parse_id_lenient(id),
                name: name.to_string(),
                email: email.to_string(),
                age: parse_int_lenient(age),
            },
            _ => return Err(CommandError::Usage(USAGE_UPDATE)),
        },
        "delete" => Command::Delete {
            id: single_id(args, USAGE_DELETE)?,
        },
        "search" => match args {
            [name] => Command::Search {
                name: name.to_string(),
            },
            _ => return Err(CommandError::Usage(USAGE_SEARCH)),
        },
        "activate" => Command::Activate {
            id: single_id(args, USAGE_ACTIVATE)?,
        },
        "deactivate" => Command::Deactivate {
            id: single_id(args, USAGE_DEACTIVATE)?,
        },
        _ => return Err(CommandError::Unknown(word.to_string())),
    };

    Ok(Some(command))
}

fn single_id(args: &[&str], usage: &'static str) -> Result<RecordId, CommandError> {
    match args {
        [id] => Ok(parse_id_lenient(id)),
        _ => Err(CommandError::Usage(usage)),
    }
}

/// Scans an optional sign followed by leading decimal digits.
///
/// Known quirk kept for compatibility with the legacy tool: anything that
/// does not start with a number (or overflows) reads as `0`, and trailing
/// garbage after the digits is ignored (`"12abc"` is `12`).
pub fn parse_int_lenient(input: &str) -> i64 {
    let (sign, rest) = match input.as_bytes().first() {
        Some(b'-') => ("-", &input[1..]),
        Some(b'+') => ("", &input[1..]),
        _ => ("", input),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return 0;
    }
    format!("{sign}{}", &rest[..digits_len])
        .parse()
        .unwrap_or(0)
}

/// Identifier variant of `parse_int_lenient`; negatives read as `0`, which
/// is never issued and so reports as not found.
pub fn parse_id_lenient(input: &str) -> RecordId {
    RecordId::try_from(parse_int_lenient(input)).unwrap_or(0)
}
