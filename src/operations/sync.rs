// Sync Engine
// Executes a sync plan one operation at a time and records each outcome

use std::path::{Path, PathBuf};

use super::commands::CommandBuilder;
use super::executor::{CommandExecutor, CommandOutcome};
use super::plan::SyncPlan;
use crate::ui::Reporter;

/// Options for sync operations
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Continue uploading after a file fails
    pub continue_on_error: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            continue_on_error: true,
        }
    }
}

/// What a recorded operation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationKind {
    Mkdir,
    Upload,
}

/// One executed device operation
#[derive(Debug)]
pub struct OperationRecord {
    pub kind: OperationKind,
    /// Directory path or upload source
    pub target: String,
    pub outcome: CommandOutcome,
}

/// Result of executing a plan
#[derive(Debug, Default)]
pub struct PushReport {
    pub records: Vec<OperationRecord>,
    /// Uploads never attempted because an earlier one failed
    pub not_attempted: usize,
}

impl PushReport {
    fn uploads(&self) -> impl Iterator<Item = &OperationRecord> {
        self.records.iter().filter(|r| r.kind == OperationKind::Upload)
    }

    fn mkdirs(&self) -> impl Iterator<Item = &OperationRecord> {
        self.records.iter().filter(|r| r.kind == OperationKind::Mkdir)
    }

    pub fn files_attempted(&self) -> usize {
        self.uploads().count()
    }

    pub fn files_succeeded(&self) -> usize {
        self.uploads().filter(|r| r.outcome.is_ok()).count()
    }

    pub fn files_failed(&self) -> usize {
        self.uploads().filter(|r| !r.outcome.is_ok()).count()
    }

    pub fn dirs_created(&self) -> usize {
        self.mkdirs().filter(|r| r.outcome.is_ok()).count()
    }

    /// Directory creations that failed, typically because they already exist
    pub fn dirs_skipped(&self) -> usize {
        self.mkdirs().filter(|r| !r.outcome.is_ok()).count()
    }

    /// Sources of the uploads that failed
    pub fn failed_files(&self) -> Vec<&str> {
        self.uploads()
            .filter(|r| r.outcome.is_fatal())
            .map(|r| r.target.as_str())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.files_failed() == 0 && self.not_attempted == 0
    }
}

/// Engine that pushes a plan to the device
pub struct SyncEngine<'a, E: CommandExecutor> {
    executor: &'a E,
    builder: CommandBuilder,
    root: PathBuf,
    options: SyncOptions,
}

impl<'a, E: CommandExecutor> SyncEngine<'a, E> {
    /// Create an engine running commands from `root`
    pub fn new(executor: &'a E, builder: CommandBuilder, root: &Path, options: SyncOptions) -> Self {
        Self {
            executor,
            builder,
            root: root.to_path_buf(),
            options,
        }
    }

    /// Run every mkdir, then every upload
    ///
    /// Mkdir failures are benign. Upload failures are recorded per file and,
    /// with `continue_on_error`, the remaining uploads still run.
    pub async fn run(&self, plan: &SyncPlan, reporter: &dyn Reporter) -> PushReport {
        let mut report = PushReport::default();

        if !plan.dirs.is_empty() {
            reporter.info("Creating directories...");
        }
        for (dir, command) in plan.dirs.iter().zip(plan.directory_commands(&self.builder)) {
            let result = self.executor.execute(&command, &self.root).await;
            let outcome = CommandOutcome::classify(result, true);

            match &outcome {
                CommandOutcome::Ok(_) => reporter.info(&format!("   - Created: {}", dir.path)),
                CommandOutcome::BenignFailure(e) => {
                    log::warn!("mkdir {} failed: {}", dir.path, e);
                    reporter.info(&format!("   - Exists or skipped: {}", dir.path));
                }
                CommandOutcome::FatalFailure(_) => {}
            }

            report.records.push(OperationRecord {
                kind: OperationKind::Mkdir,
                target: dir.path.clone(),
                outcome,
            });
        }

        if !plan.uploads.is_empty() {
            reporter.info("Pushing files...");
        }
        let commands = plan.upload_commands(&self.builder);
        for (index, (upload, command)) in plan.uploads.iter().zip(commands).enumerate() {
            let result = self.executor.execute(&command, &self.root).await;
            let outcome = CommandOutcome::classify(result, false);

            match outcome.error() {
                None => reporter.info(&format!("   - Pushed: {}", upload.source)),
                Some(e) => reporter.error(&format!("   - Failed: {} ({})", upload.source, e)),
            }

            let failed = outcome.is_fatal();
            report.records.push(OperationRecord {
                kind: OperationKind::Upload,
                target: upload.source.clone(),
                outcome,
            });

            if failed && !self.options.continue_on_error {
                report.not_attempted = plan.uploads.len() - index - 1;
                break;
            }
        }

        report
    }
}
