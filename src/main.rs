// MicroPython Sync
// Command line front-end for pushing projects to a MicroPython board

// MODULES ------------------>>

mod cli;
mod config;
mod config_validation;

//--------------------------------------------------------<<
// IMPORTS ------------------>>

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cli::{Cli, Command};
use config_validation::load_and_validate_settings;
use micropy_sync::operations::{detect_project_root, DeviceSession, ProcessExecutor, PushOptions, SyncOptions};
use micropy_sync::ui::{ConsolePrompter, ConsoleReporter, ConsoleTerminal, Prompter};
use micropy_sync::utilities::resolve_path;
use micropy_sync::DEVICE_DIR;

//--------------------------------------------------------<<

// ┌──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                                 MAIN ENTRY POINT                                                 │
// └──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┘

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Warn by default, -v debug, -vv trace; RUST_LOG wins when set
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Run the selected workflow; `Ok(false)` when it reported a failure
async fn run(cli: Cli) -> Result<bool> {
    let settings = load_and_validate_settings(cli.settings.clone())?;

    let reporter = ConsoleReporter::new(cli.plain);
    let prompter = ConsolePrompter::new(cli.plain);
    let executor = ProcessExecutor;
    let terminal = ConsoleTerminal;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let root = match &cli.root {
        Some(root) => resolve_path(&cwd, root),
        None => detect_project_root(&cwd),
    };
    log::debug!("project root: {}", root.display());

    let session = DeviceSession::new(&settings, &executor, &terminal, &reporter);

    let ok = match cli.command {
        Command::Init { dir } => {
            let dir = match dir {
                Some(dir) => resolve_path(&cwd, &dir),
                None => project_folder(
                    &cwd,
                    prompter.input("Project folder", &cwd.display().to_string())?,
                ),
            };
            let result = session.init_project(&dir, &prompter, Path::new(DEVICE_DIR));
            session.conclude(result).is_some()
        }

        Command::Push { file, monitor } => {
            let file = file.map(|f| resolve_path(&cwd, &f));
            let result = session.push_file(Some(&root), file.as_deref(), monitor).await;
            session.conclude(result).is_some()
        }

        Command::PushAll {
            keep_device_files,
            stop_on_error,
        } => {
            let options = PushOptions {
                format_first: !keep_device_files,
                sync: SyncOptions {
                    continue_on_error: !stop_on_error,
                },
            };
            let result = session.push_project(&root, &options).await;
            session
                .conclude(result)
                .map(|report| report.is_success())
                .unwrap_or(false)
        }

        Command::Format => {
            let result = session.format(&root).await;
            session.conclude(result).is_some()
        }

        Command::Console => {
            let result = session.open_console(&root).await;
            session.conclude(result).is_some()
        }

        Command::Plan => {
            let result = session.preview(&root);
            session.conclude(result).is_some()
        }
    };

    Ok(ok)
}

/// Folder answer for `init`; an empty answer takes the offered cwd
fn project_folder(cwd: &Path, answer: Option<String>) -> PathBuf {
    match answer {
        Some(answer) => resolve_path(cwd, Path::new(&answer)),
        None => cwd.to_path_buf(),
    }
}
