// Device Session Controller
// Workflows that drive the config store, scanner, planner and executor

use std::fs;
use std::path::{Path, PathBuf};

use super::commands::CommandBuilder;
use super::executor::{CommandExecutor, CommandOutcome};
use super::plan::{plan, SyncPlan};
use super::scan::scan;
use super::sync::{PushReport, SyncEngine, SyncOptions};
use crate::constants::{CONFIG_FILE_NAME, PORT_NOT_LISTED, SCAFFOLD_FILES};
use crate::core::{AppConfig, ConfigError, ScanError, SessionError, SyncConfig, ValidationError};
use crate::ui::{Prompter, Reporter, TerminalLauncher};
use crate::utilities::list_candidate_ports;
use crate::utilities::paths::{device_path, extension_str, is_inside, normalize_path, relative_file_path};

/// Options for pushing a whole project
#[derive(Debug, Clone)]
pub struct PushOptions {
    /// Erase the device before uploading
    pub format_first: bool,
    pub sync: SyncOptions,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            format_first: true,
            sync: SyncOptions::default(),
        }
    }
}

/// Runs device workflows against one set of host capabilities
///
/// Workflows keep no state between calls and can be re-run freely.
pub struct DeviceSession<'a, E: CommandExecutor, T: TerminalLauncher> {
    settings: &'a AppConfig,
    executor: &'a E,
    terminal: &'a T,
    reporter: &'a dyn Reporter,
}

impl<'a, E: CommandExecutor, T: TerminalLauncher> DeviceSession<'a, E, T> {
    pub fn new(settings: &'a AppConfig, executor: &'a E, terminal: &'a T, reporter: &'a dyn Reporter) -> Self {
        Self {
            settings,
            executor,
            terminal,
            reporter,
        }
    }

    /// Report a workflow error as a single line and drop it
    pub fn conclude<R>(&self, result: Result<R, SessionError>) -> Option<R> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::debug!("workflow failed: {:?}", e);
                self.reporter.error(&e.to_string());
                None
            }
        }
    }

    /// Load and check the project config
    fn load_config(&self, root: &Path) -> Result<SyncConfig, SessionError> {
        self.reporter
            .info(&format!("Reading settings from {}...", CONFIG_FILE_NAME));
        let config = SyncConfig::load(root)?;
        config.validate_for_device()?;

        if !self.settings.device.baud_rates.contains(&config.upload_baud) {
            self.reporter
                .warn(&format!("Baud rate {} is not a standard rate", config.upload_baud));
        }
        Ok(config)
    }

    fn builder(&self, config: &SyncConfig) -> CommandBuilder {
        CommandBuilder::new(&self.settings.tools, config)
    }

    /// Erase the device; failure is benign
    async fn erase(&self, root: &Path, config: &SyncConfig) -> CommandOutcome {
        self.reporter.info(&format!("Using PORT: {}", config.upload_port));
        self.reporter.info(&format!("Using Baud: {}", config.upload_baud));

        let result = self
            .executor
            .execute(&self.builder(config).format(), root)
            .await;
        let outcome = CommandOutcome::classify(result, true);

        if let Some(e) = outcome.error() {
            log::warn!("format ignored failure: {}", e);
        }
        self.reporter.info("All data formatted!");
        outcome
    }

    // ┌────────────────────────────────────────────────────────────────────────────────────┐
    // │                                     WORKFLOWS                                      │
    // └────────────────────────────────────────────────────────────────────────────────────┘

    /// Create a new project in `dir`: pick port and baud, write the config,
    /// scaffold the entry files
    pub fn init_project(
        &self,
        dir: &Path,
        prompter: &dyn Prompter,
        dev_dir: &Path,
    ) -> Result<SyncConfig, SessionError> {
        self.reporter.info(&format!("Checking {}...", dir.display()));
        if !dir.is_dir() {
            return Err(ValidationError::UnknownProjectRoot.into());
        }
        if SyncConfig::exists_in(dir) {
            return Err(ConfigError::AlreadyInitialized(dir.to_path_buf()).into());
        }

        self.reporter.info("Getting ports...");
        let mut ports = vec![PORT_NOT_LISTED.to_string()];
        ports.extend(
            list_candidate_ports(dev_dir, &self.settings.ports)
                .into_iter()
                .map(|p| p.display().to_string()),
        );

        let port = match prompter
            .pick("Select the device port", &ports)
            .map_err(SessionError::Prompt)?
        {
            None => None,
            Some(0) => prompter
                .input(
                    "Please enter your device port",
                    "ex. /dev/tty.SLAB_USBtoUART",
                )
                .map_err(SessionError::Prompt)?,
            Some(i) => ports.get(i).cloned(),
        }
        .ok_or(ValidationError::Cancelled("port"))?;

        if !Path::new(&port).exists() {
            return Err(ValidationError::PortNotFound(port).into());
        }

        let rates: Vec<String> = self
            .settings
            .device
            .baud_rates
            .iter()
            .map(|r| r.to_string())
            .collect();
        let title = format!(
            "Please select baudrate (recommended {})",
            self.settings.device.default_baud
        );
        let baud = prompter
            .pick(&title, &rates)
            .map_err(SessionError::Prompt)?
            .and_then(|i| self.settings.device.baud_rates.get(i).copied())
            .ok_or(ValidationError::Cancelled("baud rate"))?;

        self.reporter.info("Generating config file...");
        let config = SyncConfig::new_project(port, baud);
        config.create(dir)?;

        self.reporter.info("Generating project files...");
        for (name, content) in SCAFFOLD_FILES {
            let path = dir.join(name);
            if path.exists() {
                log::debug!("keeping existing {}", path.display());
                continue;
            }
            fs::write(&path, content).map_err(SessionError::Scaffold)?;
        }

        self.reporter.success("Done!");
        Ok(config)
    }

    /// Erase everything on the device
    ///
    /// Only a config problem fails this workflow; an erase failure is
    /// returned as a benign outcome.
    pub async fn format(&self, root: &Path) -> Result<CommandOutcome, SessionError> {
        self.reporter.info("Checking settings file...");
        let config = self.load_config(root)?;
        Ok(self.erase(root, &config).await)
    }

    /// Upload one source file; optionally open the console afterwards
    pub async fn push_file(
        &self,
        root: Option<&Path>,
        file: Option<&Path>,
        monitor: bool,
    ) -> Result<(), SessionError> {
        self.reporter.info("Checking file to push...");
        let file = file.ok_or(ValidationError::NoActiveFile)?;

        self.reporter.info("Checking file type...");
        let expected = &self.settings.device.source_extension;
        if extension_str(file) != Some(expected.as_str()) {
            return Err(ValidationError::UnsupportedFileType {
                path: file.to_path_buf(),
                expected: expected.clone(),
            }
            .into());
        }

        self.reporter.info("Checking project root...");
        let root = root.ok_or(ValidationError::UnknownProjectRoot)?;
        let root = normalize_path(root);
        let absolute = normalize_path(&root.join(file));
        if !is_inside(&absolute, &root) {
            return Err(ValidationError::FileOutsideProject {
                path: file.to_path_buf(),
                root,
            }
            .into());
        }
        let source = relative_file_path(&root, &absolute)
            .ok_or_else(|| ScanError::NonUtf8Path(absolute.clone()))?;

        let config = self.load_config(&root)?;

        self.reporter.info(&format!("Pushing {}...", source));
        let command = self.builder(&config).put(&source, device_path(&source));
        let result = self.executor.execute(&command, &root).await;

        if result.is_ok() {
            self.reporter
                .success(&format!("{} has been pushed successfully!", device_path(&source)));
        }

        if monitor {
            if let Err(e) = self.launch_console(&root, &config).await {
                self.reporter.error(&e.to_string());
            }
        }

        result.map(|_| ()).map_err(SessionError::from)
    }

    /// Scan, plan and push the whole project
    pub async fn push_project(&self, root: &Path, options: &PushOptions) -> Result<PushReport, SessionError> {
        self.reporter.info("Checking project root directory...");
        let scanned = scan(root)?;
        let config = self.load_config(root)?;

        if options.format_first {
            self.erase(root, &config).await;
        }

        self.reporter.info("Scanning files and directories...");
        let plan = self.plan_with(&scanned.dirs, &scanned.files, &config);

        let engine = SyncEngine::new(self.executor, self.builder(&config), root, options.sync.clone());
        let report = engine.run(&plan, self.reporter).await;

        let attempted = report.files_attempted();
        let summary = format!(
            "{} of {} file{} pushed successfully",
            report.files_succeeded(),
            attempted,
            if attempted == 1 { "" } else { "s" }
        );
        if report.is_success() {
            self.reporter.success(&summary);
        } else {
            self.reporter.warn(&format!(
                "{} ({} failed, {} not attempted)",
                summary,
                report.files_failed(),
                report.not_attempted
            ));
        }
        self.reporter.info("All done!");

        Ok(report)
    }

    /// Build and report the plan without touching the device
    pub fn preview(&self, root: &Path) -> Result<SyncPlan, SessionError> {
        let scanned = scan(root)?;
        let config = self.load_config(root)?;
        let plan = self.plan_with(&scanned.dirs, &scanned.files, &config);

        let lines = plan.compound_commands(&self.builder(&config));
        if let Some(line) = lines.directories {
            self.reporter.info(&format!("Directory phase: {}", line));
        }
        if let Some(line) = lines.uploads {
            self.reporter.info(&format!("Upload phase: {}", line));
        }
        self.reporter.info(&format!(
            "{} directories, {} files planned",
            plan.dirs.len(),
            plan.uploads.len()
        ));

        Ok(plan)
    }

    /// Open the device's interactive shell in this terminal
    pub async fn open_console(&self, root: &Path) -> Result<(), SessionError> {
        let config = self.load_config(root)?;
        self.launch_console(root, &config).await
    }

    async fn launch_console(&self, root: &Path, config: &SyncConfig) -> Result<(), SessionError> {
        let command = self.builder(config).repl();
        self.reporter.info(&format!("Opening console: {}", command));
        self.terminal.launch(&command, root).await?;
        Ok(())
    }

    fn plan_with(&self, dirs: &[String], files: &[String], config: &SyncConfig) -> SyncPlan {
        let plan = plan(dirs, files, config);
        for dir in &plan.dirs {
            self.reporter.info(&format!("   - Added: {}", dir.path));
        }
        for upload in &plan.uploads {
            self.reporter.info(&format!("   - Added: {}", upload.source));
        }
        plan
    }
}

/// Nearest ancestor of `start` holding a config document, else `start`
pub fn detect_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| SyncConfig::exists_in(dir))
        .unwrap_or(start)
        .to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::executor::fake::RecordingExecutor;
    use crate::ui::testing::{RecordingReporter, RecordingTerminal, ScriptedPrompter};
    use tempfile::TempDir;

    struct Fixture {
        settings: AppConfig,
        executor: RecordingExecutor,
        terminal: RecordingTerminal,
        reporter: RecordingReporter,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_executor(RecordingExecutor::default())
        }

        fn with_executor(executor: RecordingExecutor) -> Self {
            Self {
                settings: AppConfig::default(),
                executor,
                terminal: RecordingTerminal::default(),
                reporter: RecordingReporter::default(),
            }
        }

        fn session(&self) -> DeviceSession<'_, RecordingExecutor, RecordingTerminal> {
            DeviceSession::new(&self.settings, &self.executor, &self.terminal, &self.reporter)
        }
    }

    fn project(config: &SyncConfig) -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("lib")).unwrap();
        fs::create_dir_all(root.join(".vscode")).unwrap();
        fs::write(root.join("main.py"), "").unwrap();
        fs::write(root.join("lib/util.py"), "").unwrap();
        fs::write(root.join("lib/data.json"), "").unwrap();
        fs::write(root.join("README.md"), "").unwrap();
        config.save(root).unwrap();
        dir
    }

    fn device_config() -> SyncConfig {
        SyncConfig::new_project("/dev/ttyUSB0", 115200)
    }

    #[tokio::test]
    async fn test_push_project_formats_then_pushes_filtered_plan() {
        let dir = project(&device_config());
        let fx = Fixture::new();

        let report = fx
            .session()
            .push_project(dir.path(), &PushOptions::default())
            .await
            .unwrap();

        let issued = fx.executor.issued();
        assert!(issued[0].ends_with("rmdir /"));
        assert!(issued.iter().any(|c| c.ends_with("mkdir /lib")));
        assert!(!issued.iter().any(|c| c.contains(".vscode")));
        assert!(!issued.iter().any(|c| c.contains("data.json")));
        assert!(!issued.iter().any(|c| c.contains(CONFIG_FILE_NAME)));
        assert!(issued.iter().any(|c| c.ends_with("put ./lib/util.py lib/util.py")));

        let last_mkdir = issued.iter().rposition(|c| c.contains(" mkdir ")).unwrap();
        let first_put = issued.iter().position(|c| c.contains(" put ")).unwrap();
        assert!(last_mkdir < first_put);

        assert_eq!(report.files_attempted(), 3);
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_push_project_without_format() {
        let dir = project(&device_config());
        let fx = Fixture::new();
        let options = PushOptions {
            format_first: false,
            ..Default::default()
        };

        fx.session().push_project(dir.path(), &options).await.unwrap();

        assert!(!fx.executor.issued().iter().any(|c| c.contains("rmdir")));
    }

    #[tokio::test]
    async fn test_push_project_survives_format_and_mkdir_failures() {
        let dir = project(&device_config());
        let fx = Fixture::with_executor(RecordingExecutor::failing_on(&["rmdir", "mkdir"]));

        let report = fx
            .session()
            .push_project(dir.path(), &PushOptions::default())
            .await
            .unwrap();

        assert!(report.is_success());
        assert!(fx.reporter.contains("All data formatted!"));
    }

    #[tokio::test]
    async fn test_push_project_reports_failed_upload() {
        let dir = project(&device_config());
        let fx = Fixture::with_executor(RecordingExecutor::failing_on(&["put ./main.py"]));

        let report = fx
            .session()
            .push_project(dir.path(), &PushOptions::default())
            .await
            .unwrap();

        assert_eq!(report.files_failed(), 1);
        assert_eq!(report.files_succeeded(), 2);
        assert!(fx.reporter.contains("2 of 3 files pushed successfully"));
    }

    #[tokio::test]
    async fn test_push_project_without_config() {
        let dir = TempDir::new().unwrap();
        let fx = Fixture::new();

        let err = fx
            .session()
            .push_project(dir.path(), &PushOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Config(ConfigError::NotFound(_))));
        assert!(fx.executor.issued().is_empty());
    }

    #[tokio::test]
    async fn test_push_project_rejects_empty_port() {
        let dir = project(&SyncConfig::default());
        let fx = Fixture::new();

        let err = fx
            .session()
            .push_project(dir.path(), &PushOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Validation(ValidationError::MissingPort)));
        assert!(fx.executor.issued().is_empty());
    }

    #[tokio::test]
    async fn test_push_file_uploads_relative_path() {
        let dir = project(&device_config());
        let fx = Fixture::new();
        let file = dir.path().join("lib/util.py");

        fx.session()
            .push_file(Some(dir.path()), Some(file.as_path()), false)
            .await
            .unwrap();

        assert_eq!(
            fx.executor.issued(),
            vec!["ampy --port /dev/ttyUSB0 --baud 115200 put ./lib/util.py lib/util.py"]
        );
        assert!(fx.terminal.launched.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_push_file_rejects_non_source_file() {
        let dir = project(&device_config());
        let fx = Fixture::new();

        let err = fx
            .session()
            .push_file(Some(dir.path()), Some(Path::new("README.md")), false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::UnsupportedFileType { .. })
        ));
        assert!(fx.executor.issued().is_empty());
    }

    #[tokio::test]
    async fn test_push_file_validation_order() {
        let fx = Fixture::new();
        let session = fx.session();

        let err = session.push_file(None, None, false).await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::NoActiveFile)));

        let err = session
            .push_file(None, Some(Path::new("main.py")), false)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::UnknownProjectRoot)));

        let dir = project(&device_config());
        let err = session
            .push_file(Some(dir.path()), Some(Path::new("../outside.py")), false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::FileOutsideProject { .. })
        ));
        assert!(fx.executor.issued().is_empty());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_push_file_rejects_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = project(&device_config());
        let name = OsStr::from_bytes(b"bad\xff.py");
        fs::write(dir.path().join(name), "").unwrap();
        let fx = Fixture::new();

        let err = fx
            .session()
            .push_file(Some(dir.path()), Some(Path::new(name)), false)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Scan(ScanError::NonUtf8Path(_))));
        assert!(fx.executor.issued().is_empty());
    }

    #[tokio::test]
    async fn test_push_file_with_monitor_opens_console_even_on_failure() {
        let dir = project(&device_config());
        let fx = Fixture::with_executor(RecordingExecutor::failing_on(&["put"]));

        let result = fx
            .session()
            .push_file(Some(dir.path()), Some(Path::new("main.py")), true)
            .await;

        assert!(matches!(result, Err(SessionError::Execution(_))));
        assert_eq!(
            *fx.terminal.launched.borrow(),
            vec!["rshell --port /dev/ttyUSB0 repl".to_string()]
        );
    }

    #[tokio::test]
    async fn test_format_swallows_erase_failure() {
        let dir = project(&device_config());
        let fx = Fixture::with_executor(RecordingExecutor::failing_on(&["rmdir"]));

        let outcome = fx.session().format(dir.path()).await.unwrap();

        assert!(matches!(outcome, CommandOutcome::BenignFailure(_)));
        assert!(fx.reporter.contains("All data formatted!"));
        assert!(fx.reporter.errors().is_empty());
    }

    #[tokio::test]
    async fn test_open_console() {
        let dir = project(&device_config());
        let fx = Fixture::new();

        fx.session().open_console(dir.path()).await.unwrap();

        assert_eq!(fx.terminal.launched.borrow().len(), 1);
        assert!(fx.executor.issued().is_empty());
    }

    #[test]
    fn test_preview_runs_nothing() {
        let dir = project(&device_config());
        let fx = Fixture::new();

        let plan = fx.session().preview(dir.path()).unwrap();

        assert_eq!(plan.dirs.len(), 1);
        assert_eq!(plan.uploads.len(), 3);
        assert!(fx.executor.issued().is_empty());
        assert!(fx.reporter.contains("Upload phase: ampy"));
    }

    #[test]
    fn test_init_writes_config_and_scaffold() {
        let dir = TempDir::new().unwrap();
        let dev = TempDir::new().unwrap();
        fs::write(dev.path().join("COM7"), "").unwrap();
        let fx = Fixture::new();
        let rate_index = fx
            .settings
            .device
            .baud_rates
            .iter()
            .position(|r| *r == 9600)
            .unwrap();
        let prompter = ScriptedPrompter::new(vec![Some(1), Some(rate_index)], vec![]);

        let config = fx
            .session()
            .init_project(dir.path(), &prompter, dev.path())
            .unwrap();

        assert_eq!(config.upload_port, dev.path().join("COM7").display().to_string());
        assert_eq!(config.upload_baud, 9600);
        assert_eq!(SyncConfig::load(dir.path()).unwrap(), config);
        assert!(dir.path().join("main.py").is_file());
        assert!(dir.path().join("boot.py").is_file());
        assert_eq!(prompter.offered.borrow()[0][0], PORT_NOT_LISTED);
    }

    #[test]
    fn test_init_manual_port_entry() {
        let dir = TempDir::new().unwrap();
        let port_file = dir.path().join("fake-port");
        fs::write(&port_file, "").unwrap();
        let fx = Fixture::new();
        let prompter = ScriptedPrompter::new(
            vec![Some(0), Some(0)],
            vec![Some(port_file.to_str().unwrap())],
        );

        let config = fx
            .session()
            .init_project(dir.path(), &prompter, &dir.path().join("no-dev"))
            .unwrap();

        assert_eq!(config.upload_port, port_file.display().to_string());
    }

    #[test]
    fn test_init_existing_project_writes_nothing() {
        let dir = project(&device_config());
        let before = fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        let fx = Fixture::new();
        let prompter = ScriptedPrompter::default();

        let err = fx
            .session()
            .init_project(dir.path(), &prompter, dir.path())
            .unwrap_err();

        assert!(matches!(err, SessionError::Config(ConfigError::AlreadyInitialized(_))));
        assert!(prompter.offered.borrow().is_empty());
        assert!(!dir.path().join("boot.py").exists());
        assert_eq!(fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap(), before);
    }

    #[test]
    fn test_init_unknown_port() {
        let dir = TempDir::new().unwrap();
        let fx = Fixture::new();
        let prompter = ScriptedPrompter::new(vec![Some(0)], vec![Some("/dev/definitely-missing")]);

        let err = fx
            .session()
            .init_project(dir.path(), &prompter, dir.path())
            .unwrap_err();

        assert!(matches!(err, SessionError::Validation(ValidationError::PortNotFound(_))));
        assert!(!SyncConfig::exists_in(dir.path()));
    }

    #[test]
    fn test_init_cancelled_baud() {
        let dir = TempDir::new().unwrap();
        let port_file = dir.path().join("port");
        fs::write(&port_file, "").unwrap();
        let fx = Fixture::new();
        let prompter = ScriptedPrompter::new(vec![Some(0), None], vec![Some(port_file.to_str().unwrap())]);

        let err = fx
            .session()
            .init_project(dir.path(), &prompter, dir.path())
            .unwrap_err();

        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::Cancelled("baud rate"))
        ));
        assert!(!SyncConfig::exists_in(dir.path()));
    }

    #[test]
    fn test_conclude_reports_single_line() {
        let fx = Fixture::new();
        let result: Result<(), SessionError> = Err(ValidationError::MissingPort.into());

        assert!(fx.session().conclude(result).is_none());
        assert_eq!(fx.reporter.errors(), vec!["upload port is not configured".to_string()]);
    }

    #[test]
    fn test_detect_project_root() {
        let dir = project(&device_config());
        let nested = dir.path().join("lib");
        assert_eq!(detect_project_root(&nested), dir.path());

        let bare = TempDir::new().unwrap();
        assert_eq!(detect_project_root(bare.path()), bare.path());
    }
}
