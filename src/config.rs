// Settings loading module
// Reads an optional YAML file overriding the compiled tool defaults

use anyhow::{Context, Result};
use micropy_sync::core::SettingsOverride;
use std::fs;
use std::path::Path;

pub fn load_settings(path: &Path) -> Result<SettingsOverride> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    // An empty file means "no overrides"
    if contents.trim().is_empty() {
        return Ok(SettingsOverride::default());
    }

    let settings: SettingsOverride = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse settings YAML: {}", path.display()))?;
    Ok(settings)
}
