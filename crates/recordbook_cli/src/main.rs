//! Interactive CLI entry point.
//!
//! # Responsibility
//! - Resolve process configuration (snapshot path, logging).
//! - Load the snapshot, then run the command loop over stdin.
//!
//! Store and storage failures are printed and the loop continues; only
//! logging bootstrap or stdin/stdout failures end the process.

use clap::Parser;
use log::info;
use recordbook_core::{
    core_version, default_log_level, init_logging, Command, CommandDispatcher, LoadOutcome,
    LogLevel, RecordStore, SnapshotFile,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_LOG_SUBDIR: &str = "logs";

/// Fixture records seeded by `--demo`.
const DEMO_RECORDS: &[(&str, &str, i64)] = &[
    ("张三", "zhangsan@example.com", 25),
    ("李四", "lisi@example.com", 30),
    ("王五", "wangwu@example.com", 22),
    ("赵六", "zhaoliu@example.com", 28),
    ("钱七", "qianqi@example.com", 35),
];

/// In-memory record manager with JSON snapshot persistence
#[derive(Parser, Debug)]
#[command(name = "recordbook")]
#[command(version, about, long_about = None)]
struct Args {
    /// Snapshot file loaded at startup and written by `save`
    #[arg(long, env = "RECORDBOOK_DATA_FILE", default_value = "users.json")]
    data_file: PathBuf,

    /// Log level (trace|debug|info|warn|error); defaults by build mode
    #[arg(long)]
    log_level: Option<String>,

    /// Directory for rolling log files [default: ./logs]
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Seed five demo records after loading the snapshot
    #[arg(long)]
    demo: bool,

    /// Skip the command list banner
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("recordbook: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let log_dir = resolve_log_dir(args.log_dir)?;
    let level = match args.log_level.as_deref() {
        Some(value) => LogLevel::parse(value).map_err(|err| err.to_string())?,
        None => default_log_level(),
    };
    init_logging(level, &log_dir).map_err(|err| err.to_string())?;
    info!(
        "event=cli_start module=cli status=ok version={} data_file={}",
        core_version(),
        args.data_file.display()
    );

    let snapshot = SnapshotFile::new(args.data_file);
    let mut store = RecordStore::new();
    match snapshot.load_into(&mut store) {
        Ok(LoadOutcome::Loaded { records }) => {
            println!("loaded {records} records from {}", snapshot.path().display());
        }
        Ok(LoadOutcome::Missing) => {
            println!("{} not found; starting empty", snapshot.path().display());
        }
        Err(err) => println!("load failed: {err}; starting empty"),
    }

    let mut dispatcher = CommandDispatcher::new(store, snapshot);

    if args.demo {
        for (name, email, age) in DEMO_RECORDS {
            let reply = dispatcher.execute(Command::Add {
                name: name.to_string(),
                email: email.to_string(),
                age: *age,
            });
            print_lines(&reply.lines)?;
        }
    }

    if !args.quiet {
        print_lines(&dispatcher.execute(Command::Help).lines)?;
    }

    let stdin = io::stdin();
    let mut input = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout()
            .flush()
            .map_err(|err| format!("failed to write prompt: {err}"))?;

        let Some(line) = input.next() else {
            break;
        };
        let line = line.map_err(|err| format!("failed to read stdin: {err}"))?;

        let reply = dispatcher.execute_line(&line);
        print_lines(&reply.lines)?;
        if reply.quit {
            break;
        }
    }

    info!(
        "event=cli_exit module=cli status=ok records={}",
        dispatcher.store().count()
    );
    Ok(())
}

fn resolve_log_dir(configured: Option<PathBuf>) -> Result<PathBuf, String> {
    let cwd = || {
        std::env::current_dir()
            .map_err(|err| format!("failed to resolve current directory: {err}"))
    };
    match configured {
        Some(dir) if dir.is_absolute() => Ok(dir),
        Some(dir) => Ok(cwd()?.join(dir)),
        None => Ok(cwd()?.join(DEFAULT_LOG_SUBDIR)),
    }
}

fn print_lines(lines: &[String]) -> Result<(), String> {
    let mut stdout = io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{line}").map_err(|err| format!("failed to write output: {err}"))?;
    }
    Ok(())
}
