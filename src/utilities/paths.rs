// Path Utilities
// Conversions between host paths, root-relative paths and device paths

use std::path::{Component, Path, PathBuf};

/// Marker that prefixes root-relative file paths
pub const RELATIVE_MARKER: &str = "./";

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                components.pop();
            }
            Component::CurDir => {}
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Resolve a path relative to a base directory
pub fn resolve_path(base: &Path, relative: &Path) -> PathBuf {
    if relative.is_absolute() {
        normalize_path(relative)
    } else {
        normalize_path(&base.join(relative))
    }
}

/// Check if a path is inside a directory
pub fn is_inside(path: &Path, directory: &Path) -> bool {
    normalize_path(path).starts_with(normalize_path(directory))
}

/// Join the components of a relative path with `/` regardless of host separator
///
/// `None` when a component is not valid UTF-8.
fn slash_joined(relative: &Path) -> Option<String> {
    let parts = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Root-relative form of a file path: `./sub/main.py`
///
/// `None` when `path` is outside `root` or is not valid UTF-8.
pub fn relative_file_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    Some(format!("{}{}", RELATIVE_MARKER, slash_joined(relative)?))
}

/// Root-relative form of a directory path: `/sub/lib`
pub fn relative_dir_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    Some(format!("/{}", slash_joined(relative)?))
}

/// Device-side destination of a root-relative file path
///
/// Strips the leading `./` marker; other paths are returned unchanged.
pub fn device_path(relative: &str) -> &str {
    relative.strip_prefix(RELATIVE_MARKER).unwrap_or(relative)
}

/// Final segment of a `/`-separated path
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Get the file extension as a string
pub fn extension_str(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}
