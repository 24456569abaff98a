// Application Configuration
// Defaults compiled from config.yaml at build time
// Modify config.yaml and rebuild to change these values

use serde::Deserialize;

// Include the auto-generated config from build.rs
pub mod compiled {
    include!(concat!(env!("OUT_DIR"), "/compiled_config.rs"));
}

/// Application-level configuration for micropy-sync
/// Values are compiled in from config.yaml and may be overridden at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// External tool binaries
    pub tools: ToolSettings,

    /// Device defaults
    pub device: DeviceSettings,

    /// Serial port discovery heuristics
    pub ports: PortSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    /// File transfer tool (put / mkdir / rmdir)
    pub transfer_tool: String,

    /// Remote shell tool (repl)
    pub shell_tool: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSettings {
    /// Baud rate preselected at init
    pub default_baud: u32,

    /// Baud rates offered at init
    pub baud_rates: Vec<u32>,

    /// Extension (without dot) of files accepted by single-file push
    pub source_extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSettings {
    /// Device names accepted at any length
    pub prefixes: Vec<String>,

    /// Device names accepted only when at least `long_min_length` long
    pub long_prefixes: Vec<String>,

    pub long_min_length: usize,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            transfer_tool: compiled::TRANSFER_TOOL.to_string(),
            shell_tool: compiled::SHELL_TOOL.to_string(),
        }
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            default_baud: compiled::DEFAULT_BAUD,
            baud_rates: compiled::BAUD_RATES.to_vec(),
            source_extension: compiled::SOURCE_EXTENSION.to_string(),
        }
    }
}

impl Default for PortSettings {
    fn default() -> Self {
        Self {
            prefixes: to_strings(compiled::PORT_PREFIXES),
            long_prefixes: to_strings(compiled::LONG_PORT_PREFIXES),
            long_min_length: compiled::LONG_PORT_MIN_LENGTH,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tools: ToolSettings::default(),
            device: DeviceSettings::default(),
            ports: PortSettings::default(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Runtime overrides read from a settings file
///
/// Every field is optional; unset fields keep the compiled default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsOverride {
    pub transfer_tool: Option<String>,
    pub shell_tool: Option<String>,
    pub default_baud: Option<u32>,
    pub baud_rates: Option<Vec<u32>>,
    pub source_extension: Option<String>,
    pub port_prefixes: Option<Vec<String>>,
    pub long_port_prefixes: Option<Vec<String>>,
    pub long_port_min_length: Option<usize>,
}

impl AppConfig {
    /// Compiled defaults with the given overrides applied
    pub fn with_overrides(overrides: SettingsOverride) -> Self {
        let mut config = Self::default();
        config.apply(overrides);
        config
    }

    /// Apply overrides on top of the current values
    pub fn apply(&mut self, overrides: SettingsOverride) {
        if let Some(tool) = overrides.transfer_tool {
            self.tools.transfer_tool = tool;
        }
        if let Some(tool) = overrides.shell_tool {
            self.tools.shell_tool = tool;
        }
        if let Some(baud) = overrides.default_baud {
            self.device.default_baud = baud;
        }
        if let Some(rates) = overrides.baud_rates {
            self.device.baud_rates = rates;
        }
        if let Some(ext) = overrides.source_extension {
            self.device.source_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(prefixes) = overrides.port_prefixes {
            self.ports.prefixes = prefixes;
        }
        if let Some(prefixes) = overrides.long_port_prefixes {
            self.ports.long_prefixes = prefixes;
        }
        if let Some(len) = overrides.long_port_min_length {
            self.ports.long_min_length = len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_come_from_config_yaml() {
        let config = AppConfig::default();
        assert_eq!(config.tools.transfer_tool, "ampy");
        assert_eq!(config.tools.shell_tool, "rshell");
        assert_eq!(config.device.default_baud, 115200);
        assert_eq!(config.device.source_extension, "py");
        assert!(config.device.baud_rates.contains(&115200));
    }

    #[test]
    fn test_overrides_replace_only_set_fields() {
        let config = AppConfig::with_overrides(SettingsOverride {
            transfer_tool: Some("/opt/bin/ampy".to_string()),
            source_extension: Some(".mpy".to_string()),
            ..Default::default()
        });

        assert_eq!(config.tools.transfer_tool, "/opt/bin/ampy");
        assert_eq!(config.tools.shell_tool, "rshell");
        assert_eq!(config.device.source_extension, "mpy");
        assert_eq!(config.ports, PortSettings::default());
    }
}
