// Console Host
// Terminal implementations of the reporter, prompter and terminal launcher

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use crossterm::style::Stylize;

use super::{run_picker, Level, Prompter, Reporter, Styles, TerminalLauncher};
use crate::constants::LOG_PREFIX;
use crate::core::ExecutionError;
use crate::operations::commands::DeviceCommand;
use crate::operations::executor::ProcessExecutor;

/// Prints prefixed, colored lines; errors go to stderr
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    pub fn new(plain: bool) -> Self {
        Self {
            color: !plain && io::stdout().is_terminal(),
        }
    }

    fn format(&self, level: Level, text: &str) -> String {
        if self.color {
            format!("{}: {}", LOG_PREFIX.with(Styles::level_color(level)).bold(), text)
        } else {
            format!("{}: {}", LOG_PREFIX, text)
        }
    }
}

impl Reporter for ConsoleReporter {
    fn line(&self, level: Level, text: &str) {
        let line = self.format(level, text);
        match level {
            Level::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

/// Prompts on the terminal
///
/// Uses the inline quick-pick when attached to a terminal, numbered
/// choices read from stdin otherwise.
#[derive(Debug, Clone, Copy)]
pub struct ConsolePrompter {
    interactive: bool,
}

impl ConsolePrompter {
    pub fn new(plain: bool) -> Self {
        Self {
            interactive: !plain && io::stdin().is_terminal() && io::stdout().is_terminal(),
        }
    }

    fn read_line() -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        Ok((!line.is_empty()).then(|| line.to_string()))
    }
}

impl Prompter for ConsolePrompter {
    fn pick(&self, title: &str, items: &[String]) -> io::Result<Option<usize>> {
        if self.interactive {
            return run_picker(title, items);
        }

        println!("{}", title);
        for (i, item) in items.iter().enumerate() {
            println!("  {:>2}) {}", i + 1, item);
        }
        print!("Choice [1-{}]: ", items.len());
        io::stdout().flush()?;

        Ok(Self::read_line()?
            .and_then(|answer| answer.parse::<usize>().ok())
            .filter(|n| (1..=items.len()).contains(n))
            .map(|n| n - 1))
    }

    fn input(&self, prompt: &str, placeholder: &str) -> io::Result<Option<String>> {
        if placeholder.is_empty() {
            print!("{}: ", prompt);
        } else {
            print!("{} ({}): ", prompt, placeholder);
        }
        io::stdout().flush()?;
        Self::read_line()
    }
}

/// Runs interactive commands in the current terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTerminal;

impl TerminalLauncher for ConsoleTerminal {
    async fn launch(&self, command: &DeviceCommand, cwd: &Path) -> Result<(), ExecutionError> {
        ProcessExecutor::run_interactive(command, cwd).await
    }
}
