// Port Discovery
// Lists serial device nodes that look like a board connection

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::app_config::PortSettings;

/// Check if a device node name looks like a serial port
pub fn is_candidate_port(name: &str, settings: &PortSettings) -> bool {
    settings.prefixes.iter().any(|p| name.starts_with(p.as_str()))
        || (name.len() >= settings.long_min_length
            && settings.long_prefixes.iter().any(|p| name.starts_with(p.as_str())))
}

/// List candidate serial ports under `dev_dir`, sorted, as full paths
///
/// An unreadable directory yields an empty list.
pub fn list_candidate_ports(dev_dir: &Path, settings: &PortSettings) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dev_dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("cannot list {}: {}", dev_dir.display(), e);
            return Vec::new();
        }
    };

    let mut ports: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_str()
                .map(|name| is_candidate_port(name, settings))
                .unwrap_or(false)
        })
        .map(|e| e.path())
        .collect();

    ports.sort();
    ports
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings() -> PortSettings {
        PortSettings {
            prefixes: vec!["COM".to_string()],
            long_prefixes: vec!["tty.".to_string()],
            long_min_length: 16,
        }
    }

    #[test]
    fn test_candidate_names() {
        let s = settings();
        assert!(is_candidate_port("COM3", &s));
        assert!(is_candidate_port("tty.SLAB_USBtoUART", &s));
        assert!(!is_candidate_port("tty.Bluetooth", &s));
        assert!(!is_candidate_port("null", &s));
    }

    #[test]
    fn test_lists_sorted_matches() {
        let dir = TempDir::new().unwrap();
        for name in ["tty.usbserial-0001", "COM4", "random", "tty.short"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let ports = list_candidate_ports(dir.path(), &settings());

        assert_eq!(
            ports,
            vec![dir.path().join("COM4"), dir.path().join("tty.usbserial-0001")]
        );
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(list_candidate_ports(&dir.path().join("nope"), &settings()).is_empty());
    }
}
