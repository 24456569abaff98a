// UI module
// Host capabilities handed to workflows: reporting, prompting and terminals

pub mod console;
pub mod picker;
pub mod styles;

use std::io;
use std::path::Path;

use crate::core::ExecutionError;
use crate::operations::commands::DeviceCommand;

pub use console::{ConsolePrompter, ConsoleReporter, ConsoleTerminal};
pub use picker::{run_picker, PickerState, PickerStep};
pub use styles::Styles;

/// Severity of a user-facing line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

/// Receives progress lines from workflows
pub trait Reporter {
    fn line(&self, level: Level, text: &str);

    fn info(&self, text: &str) {
        self.line(Level::Info, text);
    }

    fn success(&self, text: &str) {
        self.line(Level::Success, text);
    }

    fn warn(&self, text: &str) {
        self.line(Level::Warn, text);
    }

    fn error(&self, text: &str) {
        self.line(Level::Error, text);
    }
}

/// Asks the user for choices and text
pub trait Prompter {
    /// Quick-pick one of `items`; `None` when dismissed
    fn pick(&self, title: &str, items: &[String]) -> io::Result<Option<usize>>;

    /// Free text input; `None` when left empty
    fn input(&self, prompt: &str, placeholder: &str) -> io::Result<Option<String>>;
}

/// Hands the terminal over to an interactive command
#[allow(async_fn_in_trait)]
pub trait TerminalLauncher {
    async fn launch(&self, command: &DeviceCommand, cwd: &Path) -> Result<(), ExecutionError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Keeps every reported line
    #[derive(Default)]
    pub struct RecordingReporter {
        pub lines: RefCell<Vec<(Level, String)>>,
    }

    impl RecordingReporter {
        pub fn errors(&self) -> Vec<String> {
            self.at(Level::Error)
        }

        pub fn at(&self, level: Level) -> Vec<String> {
            self.lines
                .borrow()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, t)| t.clone())
                .collect()
        }

        pub fn contains(&self, needle: &str) -> bool {
            self.lines.borrow().iter().any(|(_, t)| t.contains(needle))
        }
    }

    impl Reporter for RecordingReporter {
        fn line(&self, level: Level, text: &str) {
            self.lines.borrow_mut().push((level, text.to_string()));
        }
    }

    /// Answers prompts from queued replies
    #[derive(Default)]
    pub struct ScriptedPrompter {
        pub picks: RefCell<VecDeque<Option<usize>>>,
        pub inputs: RefCell<VecDeque<Option<String>>>,
        pub offered: RefCell<Vec<Vec<String>>>,
    }

    impl ScriptedPrompter {
        pub fn new(picks: Vec<Option<usize>>, inputs: Vec<Option<&str>>) -> Self {
            Self {
                picks: RefCell::new(picks.into()),
                inputs: RefCell::new(inputs.into_iter().map(|i| i.map(str::to_string)).collect()),
                offered: RefCell::default(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn pick(&self, _title: &str, items: &[String]) -> io::Result<Option<usize>> {
            self.offered.borrow_mut().push(items.to_vec());
            Ok(self.picks.borrow_mut().pop_front().flatten())
        }

        fn input(&self, _prompt: &str, _placeholder: &str) -> io::Result<Option<String>> {
            Ok(self.inputs.borrow_mut().pop_front().flatten())
        }
    }

    /// Records launched commands instead of running them
    #[derive(Default)]
    pub struct RecordingTerminal {
        pub launched: RefCell<Vec<String>>,
    }

    impl TerminalLauncher for RecordingTerminal {
        async fn launch(&self, command: &DeviceCommand, _cwd: &Path) -> Result<(), ExecutionError> {
            self.launched.borrow_mut().push(command.to_string());
            Ok(())
        }
    }
}
