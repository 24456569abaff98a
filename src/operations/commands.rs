// Device Commands
// Typed invocations of the file transfer and remote shell tools

use std::fmt;

use crate::core::app_config::ToolSettings;
use crate::core::SyncConfig;

/// A single external tool invocation, kept as an argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl DeviceCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// Characters that never need quoting in a POSIX shell word
fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | ',' | ':' | '=' | '@' | '%')
}

/// Shell-style quoting for display only; commands never go through a shell
fn quote(word: &str) -> String {
    if !word.is_empty() && word.chars().all(is_shell_safe) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Join commands so the chain stops at the first failure
///
/// Returns `None` for an empty list.
pub fn compound(commands: &[DeviceCommand]) -> Option<String> {
    if commands.is_empty() {
        return None;
    }
    Some(
        commands
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" && "),
    )
}

/// Builds commands for one device connection
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    transfer_tool: String,
    shell_tool: String,
    port: String,
    baud: u32,
}

impl CommandBuilder {
    pub fn new(tools: &ToolSettings, config: &SyncConfig) -> Self {
        Self {
            transfer_tool: tools.transfer_tool.clone(),
            shell_tool: tools.shell_tool.clone(),
            port: config.upload_port.clone(),
            baud: config.upload_baud,
        }
    }

    fn transfer(&self, subcommand: &str, args: &[&str]) -> DeviceCommand {
        let mut argv = vec![
            "--port".to_string(),
            self.port.clone(),
            "--baud".to_string(),
            self.baud.to_string(),
            subcommand.to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        DeviceCommand::new(&self.transfer_tool, argv)
    }

    /// `put <src> <dst>`
    pub fn put(&self, source: &str, destination: &str) -> DeviceCommand {
        self.transfer("put", &[source, destination])
    }

    /// `mkdir <path>`
    pub fn mkdir(&self, path: &str) -> DeviceCommand {
        self.transfer("mkdir", &[path])
    }

    /// `rmdir <path>`
    pub fn rmdir(&self, path: &str) -> DeviceCommand {
        self.transfer("rmdir", &[path])
    }

    /// Erase everything on the device
    pub fn format(&self) -> DeviceCommand {
        self.rmdir("/")
    }

    /// Interactive session: `<shell> --port <PORT> repl`
    pub fn repl(&self) -> DeviceCommand {
        DeviceCommand::new(
            &self.shell_tool,
            vec!["--port".to_string(), self.port.clone(), "repl".to_string()],
        )
    }
}
