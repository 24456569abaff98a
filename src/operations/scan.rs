// Filesystem Scanner
// Walks a project root and lists directories and files relative to it

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::constants::CONFIG_FILE_NAME;
use crate::core::ScanError;
use crate::utilities::paths::{relative_dir_path, relative_file_path};

/// Raw result of walking a project root
///
/// Entries are in traversal order: a directory always precedes its
/// children, but siblings are not sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Directories in `/sub/dir` form
    pub dirs: Vec<String>,
    /// Files in `./sub/file.py` form, config document already removed
    pub files: Vec<String>,
}

/// Walk `root` recursively
///
/// No user filters are applied here; only the config document is dropped.
pub fn scan(root: &Path) -> Result<ScanResult, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut result = ScanResult::default();

    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(|source| ScanError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            let dir = relative(root, path, relative_dir_path)?;
            log::trace!("dir  {}", dir);
            result.dirs.push(dir);
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            if entry.file_name() == CONFIG_FILE_NAME {
                continue;
            }
            let file = relative(root, path, relative_file_path)?;
            log::trace!("file {}", file);
            result.files.push(file);
        } else {
            log::debug!("skipping {}, not a directory or regular file", path.display());
        }
    }

    log::debug!(
        "scanned {}: {} directories, {} files",
        root.display(),
        result.dirs.len(),
        result.files.len()
    );

    Ok(result)
}

fn relative(
    root: &Path,
    path: &Path,
    form: fn(&Path, &Path) -> Option<String>,
) -> Result<String, ScanError> {
    form(root, path).ok_or_else(|| {
        if path.starts_with(root) {
            ScanError::NonUtf8Path(path.to_path_buf())
        } else {
            ScanError::OutsideRoot {
                path: path.to_path_buf(),
                root: PathBuf::from(root),
            }
        }
    })
}
