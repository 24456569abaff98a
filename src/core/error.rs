// Error Types
// Error taxonomy shared by the config store, scanner, executor and workflows

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures reading or writing the project config document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config document found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("config document {} is malformed: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize config for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} already contains a config document, is this an existing project?", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures walking the project tree
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("project root {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{} is outside of project root {}", .path.display(), .root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("{} is not a valid UTF-8 path", .0.display())]
    NonUtf8Path(PathBuf),
}

/// Failures running an external tool
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

impl ExecutionError {
    /// The command line that failed
    pub fn command(&self) -> &str {
        match self {
            Self::Spawn { command, .. } | Self::Failed { command, .. } => command,
        }
    }
}

/// Preconditions a workflow checks before touching the device
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("nothing to push, no file was given")]
    NoActiveFile,

    #[error("only .{expected} files can be pushed, got {}", .path.display())]
    UnsupportedFileType { path: PathBuf, expected: String },

    #[error("unknown project root")]
    UnknownProjectRoot,

    #[error("{} is not inside project root {}", .path.display(), .root.display())]
    FileOutsideProject { path: PathBuf, root: PathBuf },

    #[error("upload port is not configured")]
    MissingPort,

    #[error("port {0} not found")]
    PortNotFound(String),

    #[error("{0} was not provided, task stopped")]
    Cancelled(&'static str),
}

/// Any failure a device workflow can end with
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to prepare project files: {0}")]
    Scaffold(#[source] io::Error),

    #[error("failed to read answer: {0}")]
    Prompt(#[source] io::Error),
}
