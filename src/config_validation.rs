// Settings validation module

use anyhow::{bail, Result};
use micropy_sync::core::AppConfig;
use std::path::PathBuf;

use crate::config::load_settings;

/// Compiled defaults plus the optional override file, checked for usability
pub fn load_and_validate_settings(settings_path: Option<PathBuf>) -> Result<AppConfig> {
    let config = match settings_path {
        Some(path) => {
            log::debug!("loading settings overrides from {}", path.display());
            AppConfig::with_overrides(load_settings(&path)?)
        }
        None => AppConfig::default(),
    };

    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.tools.transfer_tool.trim().is_empty() {
        bail!("transfer_tool must not be empty");
    }
    if config.tools.shell_tool.trim().is_empty() {
        bail!("shell_tool must not be empty");
    }
    if config.device.baud_rates.is_empty() {
        bail!("baud_rates must list at least one rate");
    }
    if !config.device.baud_rates.contains(&config.device.default_baud) {
        bail!(
            "default_baud {} is not one of baud_rates {:?}",
            config.device.default_baud,
            config.device.baud_rates
        );
    }
    if config.device.source_extension.is_empty() {
        bail!("source_extension must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        assert_eq!(load_and_validate_settings(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_rejects_empty_rate_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "baud_rates: []\n").unwrap();

        assert!(load_and_validate_settings(Some(path)).is_err());
    }

    #[test]
    fn test_rejects_default_outside_rate_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "default_baud: 9600\nbaud_rates: [115200]\n").unwrap();

        let err = load_and_validate_settings(Some(path)).unwrap_err();
        assert!(err.to_string().contains("default_baud 9600"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_and_validate_settings(Some(dir.path().join("nope.yaml"))).is_err());
    }
}
