// Command line definition

use clap::{ArgAction, Parser, Subcommand};
use micropy_sync::constants::SETTINGS_ENV_VAR;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "micropy-sync", version, about = "Push MicroPython projects to a board over serial")]
pub struct Cli {
    /// Project root (default: nearest directory holding micropy-config.json)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// YAML file overriding built-in tool settings
    #[arg(long, global = true, env = SETTINGS_ENV_VAR)]
    pub settings: Option<PathBuf>,

    /// No colors and no interactive menus
    #[arg(long, global = true)]
    pub plain: bool,

    /// More diagnostics (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new project: pick port and baud, write the config, scaffold main.py and boot.py
    Init {
        /// Existing folder to initialize (prompted when omitted)
        dir: Option<PathBuf>,
    },

    /// Push a single source file
    Push {
        file: Option<PathBuf>,

        /// Open the serial console afterwards
        #[arg(long)]
        monitor: bool,
    },

    /// Push every file in the project
    PushAll {
        /// Do not erase the device first
        #[arg(long)]
        keep_device_files: bool,

        /// Stop at the first failed upload
        #[arg(long)]
        stop_on_error: bool,
    },

    /// Erase all files on the device
    Format,

    /// Open an interactive REPL on the device
    Console,

    /// Show what push-all would do without touching the device
    Plan,
}
