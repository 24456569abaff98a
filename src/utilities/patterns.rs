// Pattern Matching Utilities
// Exclusion filters applied to scanned files and directories

use super::paths::base_name;

/// Check if a root-relative file path ends with the given suffix
///
/// This is a literal suffix match on the whole path, so `"json"` also
/// matches `./data/notjson`. Case-sensitive.
pub fn matches_suffix(path: &str, suffix: &str) -> bool {
    path.ends_with(suffix)
}

/// Check if the final segment of a directory path equals the given name
pub fn matches_base_name(path: &str, name: &str) -> bool {
    base_name(path) == name
}

/// Exclusion rules taken from the project config
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    extensions: Vec<String>,
    directories: Vec<String>,
}

impl ExclusionFilter {
    /// Create a filter from extension suffixes and directory names
    pub fn new(extensions: Vec<String>, directories: Vec<String>) -> Self {
        Self {
            extensions,
            directories,
        }
    }

    /// Check if a file should be left off the device
    pub fn excludes_file(&self, path: &str) -> bool {
        self.extensions.iter().any(|ext| matches_suffix(path, ext))
    }

    /// Check if a directory should not be created on the device
    pub fn excludes_directory(&self, path: &str) -> bool {
        self.directories.iter().any(|name| matches_base_name(path, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_is_literal() {
        assert!(matches_suffix("./lib/util.json", "json"));
        assert!(matches_suffix("./lib/notjson", "json"));
        assert!(!matches_suffix("./jsonify.py", "json"));
        assert!(!matches_suffix("./data.JSON", "json"));
    }

    #[test]
    fn test_base_name_is_exact() {
        assert!(matches_base_name("/.vscode", ".vscode"));
        assert!(matches_base_name("/lib/.vscode", ".vscode"));
        assert!(!matches_base_name("/.vscode/sub", ".vscode"));
        assert!(!matches_base_name("/Lib", "lib"));
        assert!(!matches_base_name("/libs", "lib"));
    }

    #[test]
    fn test_exclusion_filter() {
        let filter = ExclusionFilter::new(
            vec!["json".to_string(), ".md".to_string()],
            vec!["__pycache__".to_string()],
        );

        assert!(filter.excludes_file("./config.json"));
        assert!(filter.excludes_file("./README.md"));
        assert!(!filter.excludes_file("./main.py"));
        assert!(filter.excludes_directory("/lib/__pycache__"));
        assert!(!filter.excludes_directory("/lib"));
    }

    #[test]
    fn test_empty_filter_excludes_nothing() {
        let filter = ExclusionFilter::default();
        assert!(!filter.excludes_file("./anything.json"));
        assert!(!filter.excludes_directory("/.vscode"));
    }
}
