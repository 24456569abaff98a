// Build script - reads config.yaml at compile time and generates defaults
// This allows changing tool names and filters without editing source code

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Tell Cargo to rerun if config.yaml changes
    println!("cargo:rerun-if-changed=src/config.yaml");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("compiled_config.rs");

    // Try to read config.yaml from src/, fall back to hardcoded defaults if not found
    let config = if Path::new("src/config.yaml").exists() {
        let content = fs::read_to_string("src/config.yaml")
            .expect("Failed to read src/config.yaml");
        parse_config(&content)
    } else {
        CompiledConfig::default()
    };

    let generated = format!(
        r#"// Auto-generated from config.yaml at compile time
// Do not edit - modify config.yaml and rebuild instead

pub const TRANSFER_TOOL: &str = {transfer_tool:?};
pub const SHELL_TOOL: &str = {shell_tool:?};

pub const DEFAULT_BAUD: u32 = {default_baud};
pub const SOURCE_EXTENSION: &str = {source_extension:?};

pub const BAUD_RATES: &[u32] = &[{baud_rates}];

pub const PORT_PREFIXES: &[&str] = &[
{port_prefixes}
];
pub const LONG_PORT_PREFIXES: &[&str] = &[
{long_port_prefixes}
];
pub const LONG_PORT_MIN_LENGTH: usize = {long_min_length};

pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[
{excluded_extensions}
];
pub const DEFAULT_EXCLUDED_DIRECTORIES: &[&str] = &[
{excluded_directories}
];
"#,
        transfer_tool = config.transfer_tool,
        shell_tool = config.shell_tool,
        default_baud = config.default_baud,
        source_extension = config.source_extension,
        baud_rates = config.baud_rates
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        port_prefixes = string_list(&config.port_prefixes),
        long_port_prefixes = string_list(&config.long_port_prefixes),
        long_min_length = config.long_min_length,
        excluded_extensions = string_list(&config.excluded_extensions),
        excluded_directories = string_list(&config.excluded_directories),
    );

    fs::write(&dest_path, generated).expect("Failed to write compiled config");
}

struct CompiledConfig {
    transfer_tool: String,
    shell_tool: String,
    default_baud: u32,
    source_extension: String,
    baud_rates: Vec<u32>,
    port_prefixes: Vec<String>,
    long_port_prefixes: Vec<String>,
    long_min_length: usize,
    excluded_extensions: Vec<String>,
    excluded_directories: Vec<String>,
}

impl Default for CompiledConfig {
    fn default() -> Self {
        Self {
            transfer_tool: "ampy".to_string(),
            shell_tool: "rshell".to_string(),
            default_baud: 115200,
            source_extension: "py".to_string(),
            baud_rates: vec![
                300, 600, 1200, 2400, 4800, 9600, 14400, 19200, 28800, 38400, 57600, 115200,
                128000, 256000,
            ],
            port_prefixes: vec!["COM".to_string()],
            long_port_prefixes: vec!["tty.".to_string()],
            long_min_length: 16,
            excluded_extensions: vec!["json".to_string()],
            excluded_directories: vec![".vscode".to_string()],
        }
    }
}

/// Which top-level block the parser is currently inside
#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Tools,
    Device,
    Ports,
    BaudRates,
    PortPrefixes,
    LongPortPrefixes,
    ExcludedExtensions,
    ExcludedDirectories,
}

fn parse_config(content: &str) -> CompiledConfig {
    let mut config = CompiledConfig::default();
    let mut section = Section::None;

    // Simple YAML parsing (avoiding external dependencies in build script)
    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Unindented "key:" lines open a new section
        if !line.starts_with(' ') && !line.starts_with('\t') && trimmed.ends_with(':') {
            section = match trimmed.trim_end_matches(':') {
                "tools" => Section::Tools,
                "device" => Section::Device,
                "ports" => Section::Ports,
                "baud_rates" => {
                    config.baud_rates.clear();
                    Section::BaudRates
                }
                "port_prefixes" => {
                    config.port_prefixes.clear();
                    Section::PortPrefixes
                }
                "long_port_prefixes" => {
                    config.long_port_prefixes.clear();
                    Section::LongPortPrefixes
                }
                "default_excluded_extensions" => {
                    config.excluded_extensions.clear();
                    Section::ExcludedExtensions
                }
                "default_excluded_directories" => {
                    config.excluded_directories.clear();
                    Section::ExcludedDirectories
                }
                _ => Section::None,
            };
            continue;
        }

        // List items
        if let Some(item) = trimmed.strip_prefix("- ") {
            let value = strip_comment(item).trim_matches('"').trim_matches('\'').to_string();
            match section {
                Section::BaudRates => {
                    if let Ok(rate) = value.parse() {
                        config.baud_rates.push(rate);
                    }
                }
                Section::PortPrefixes => config.port_prefixes.push(value),
                Section::LongPortPrefixes => config.long_port_prefixes.push(value),
                Section::ExcludedExtensions => config.excluded_extensions.push(value),
                Section::ExcludedDirectories => config.excluded_directories.push(value),
                _ => {}
            }
            continue;
        }

        if let Some((key, value)) = parse_kv(trimmed) {
            match (section, key) {
                (Section::Tools, "transfer_tool") => config.transfer_tool = value.to_string(),
                (Section::Tools, "shell_tool") => config.shell_tool = value.to_string(),
                (Section::Device, "default_baud") => {
                    config.default_baud = value.parse().unwrap_or(115200)
                }
                (Section::Device, "source_extension") => {
                    config.source_extension = value.trim_start_matches('.').to_string()
                }
                (Section::Ports, "long_min_length") => {
                    config.long_min_length = value.parse().unwrap_or(16)
                }
                _ => {}
            }
        }
    }

    config
}

fn parse_kv(line: &str) -> Option<(&str, &str)> {
    let colon_pos = line.find(':')?;
    let key = line[..colon_pos].trim();
    let value = strip_comment(line[colon_pos + 1..].trim());
    let value = value.trim_matches('"').trim_matches('\'');

    // Skip if value is empty (section header)
    if value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Remove an inline " # comment" from a value
fn strip_comment(value: &str) -> &str {
    match value.find(" #") {
        Some(pos) => value[..pos].trim(),
        None => value.trim(),
    }
}

fn string_list(items: &[String]) -> String {
    items
        .iter()
        .map(|e| format!("    {:?},", e))
        .collect::<Vec<_>>()
        .join("\n")
}
