//! Console entry point for taskdoc.
//!
//! # Responsibility
//! - Resolve configuration, start optional file logging, load the store.
//! - Hand the loaded store to the interactive menu.

mod console;
mod input;
mod view;

use clap::Parser;
use console::Console;
use log::info;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use taskdoc_core::{core_version, default_log_level, init_logging, StoreConfig, TaskStore};

/// Console task list persisted to an XML document.
#[derive(Parser, Debug)]
#[command(name = "taskdoc", version, about, long_about = None)]
struct Cli {
    /// Task document path (falls back to TASKDOC_FILE, then ./tasks.xml).
    /// A `.json` extension stores the list as JSON instead of XML.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, env = "TASKDOC_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "TASKDOC_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("taskdoc: {err}");
            return ExitCode::FAILURE;
        }
    }

    let config = StoreConfig::resolve(cli.file);
    info!(
        "event=cli_start module=cli status=ok version={} path={}",
        core_version(),
        config.document_path().display()
    );

    let store = TaskStore::new(&config);
    match store.load() {
        Ok(report) => {
            if report.file_missing {
                println!(
                    "No task document at {}; starting with an empty list.",
                    config.document_path().display()
                );
            }
            if report.skipped > 0 {
                println!(
                    "Skipped {} task entries without a valid id; they will be dropped on the next save.",
                    report.skipped
                );
            }
        }
        Err(err) => {
            eprintln!("taskdoc: {err}");
            return ExitCode::FAILURE;
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock(), &store);
    match console.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("taskdoc: {err}");
            ExitCode::FAILURE
        }
    }
}
