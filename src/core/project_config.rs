// Project Configuration
// The micropy-config.json document describing the device connection and sync filters

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::app_config::compiled;
use super::error::{ConfigError, ValidationError};
use crate::constants::CONFIG_FILE_NAME;

/// Per-project sync configuration
///
/// Defaults are applied when reading: a missing baud becomes
/// [`compiled::DEFAULT_BAUD`], missing filter lists become empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Serial port of the device, e.g. `/dev/tty.SLAB_USBtoUART`
    #[serde(rename = "upload-port", default)]
    pub upload_port: String,

    /// Serial baud rate
    #[serde(rename = "upload-baud", default = "default_baud")]
    pub upload_baud: u32,

    /// Path suffixes of files that are never uploaded
    #[serde(rename = "upload-excludes-extensions", default)]
    pub excluded_extensions: Vec<String>,

    /// Directory base names that are never created on the device
    #[serde(rename = "upload-excludes-directories", default)]
    pub excluded_directories: Vec<String>,
}

fn default_baud() -> u32 {
    compiled::DEFAULT_BAUD
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            upload_port: String::new(),
            upload_baud: default_baud(),
            excluded_extensions: Vec::new(),
            excluded_directories: Vec::new(),
        }
    }
}

impl SyncConfig {
    /// Config for a freshly initialized project, with the default filters
    pub fn new_project(port: impl Into<String>, baud: u32) -> Self {
        Self {
            upload_port: port.into(),
            upload_baud: baud,
            excluded_extensions: compiled::DEFAULT_EXCLUDED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_directories: compiled::DEFAULT_EXCLUDED_DIRECTORIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Location of the config document inside a project root
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    /// Whether a project root already holds a config document
    pub fn exists_in(root: &Path) -> bool {
        Self::path_in(root).is_file()
    }

    /// Load the config document from a project root
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(root);

        let content = fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.clone()),
            _ => ConfigError::Read {
                path: path.clone(),
                source,
            },
        })?;

        let config: SyncConfig = serde_json::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

        log::debug!(
            "loaded {} (port {:?}, baud {})",
            path.display(),
            config.upload_port,
            config.upload_baud
        );

        Ok(config)
    }

    /// Write the whole config document, replacing any existing one
    pub fn save(&self, root: &Path) -> Result<(), ConfigError> {
        let path = Self::path_in(root);

        let mut content = serde_json::to_string_pretty(self)
            .map_err(|source| ConfigError::Serialize { path: path.clone(), source })?;
        content.push('\n');

        fs::write(&path, content).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;

        log::debug!("wrote {}", path.display());
        Ok(())
    }

    /// Write the config document for a new project
    ///
    /// Refuses to touch a directory that already has one.
    pub fn create(&self, root: &Path) -> Result<(), ConfigError> {
        if Self::exists_in(root) {
            return Err(ConfigError::AlreadyInitialized(root.to_path_buf()));
        }
        self.save(root)
    }

    /// Check the invariants a device operation relies on
    pub fn validate_for_device(&self) -> Result<(), ValidationError> {
        if self.upload_port.trim().is_empty() {
            return Err(ValidationError::MissingPort);
        }
        Ok(())
    }
}
