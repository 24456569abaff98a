// Command Executor
// Runs external tool invocations and classifies their outcome

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use super::commands::DeviceCommand;
use crate::core::ExecutionError;

/// Runs one external command to completion
///
/// There is no timeout: a hung tool hangs the caller.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor {
    /// Run `command` in `cwd` and return its captured stdout
    async fn execute(&self, command: &DeviceCommand, cwd: &Path) -> Result<String, ExecutionError>;
}

/// Executor that spawns real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, command: &DeviceCommand, cwd: &Path) -> Result<String, ExecutionError> {
        log::debug!("exec in {}: {}", cwd.display(), command);

        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ExecutionError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExecutionError::Failed {
                command: command.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ProcessExecutor {
    /// Run an interactive command with the terminal's stdio attached
    pub async fn run_interactive(command: &DeviceCommand, cwd: &Path) -> Result<(), ExecutionError> {
        log::debug!("interactive in {}: {}", cwd.display(), command);

        let status = Command::new(&command.program)
            .args(&command.args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| ExecutionError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(ExecutionError::Failed {
                command: command.to_string(),
                status,
                stderr: String::new(),
            });
        }
        Ok(())
    }
}

/// Outcome of one device operation
#[derive(Debug)]
pub enum CommandOutcome {
    /// Command succeeded with this stdout
    Ok(String),
    /// Command failed in a way that is expected in context
    BenignFailure(ExecutionError),
    /// Command failed and the operation did not happen
    FatalFailure(ExecutionError),
}

impl CommandOutcome {
    /// Classify a result; failures become benign when `benign` is set
    pub fn classify(result: Result<String, ExecutionError>, benign: bool) -> Self {
        match result {
            Ok(output) => Self::Ok(output),
            Err(e) if benign => Self::BenignFailure(e),
            Err(e) => Self::FatalFailure(e),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalFailure(_))
    }

    pub fn error(&self) -> Option<&ExecutionError> {
        match self {
            Self::Ok(_) => None,
            Self::BenignFailure(e) | Self::FatalFailure(e) => Some(e),
        }
    }
}


#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_captures_stdout_in_cwd() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();

        let out = ProcessExecutor
            .execute(&DeviceCommand::new("ls", vec![]), dir.path())
            .await
            .unwrap();

        assert!(out.contains("marker.txt"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_error() {
        let dir = TempDir::new().unwrap();
        let err = ProcessExecutor
            .execute(&DeviceCommand::new("false", vec![]), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::Failed { .. }));
        assert_eq!(err.command(), "false");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let err = ProcessExecutor
            .execute(&DeviceCommand::new("micropy-sync-no-such-tool", vec![]), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::Spawn { .. }));
    }

    #[test]
    fn test_classify() {
        assert!(CommandOutcome::classify(Ok("x".into()), false).is_ok());

        let err = || ExecutionError::Spawn {
            command: "ampy".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(matches!(CommandOutcome::classify(Err(err()), true), CommandOutcome::BenignFailure(_)));
        assert!(CommandOutcome::classify(Err(err()), false).is_fatal());
    }
}
