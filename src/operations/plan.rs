// Sync Planner
// Decides what gets pushed to the device and in which order

use super::commands::{compound, CommandBuilder, DeviceCommand};
use crate::core::SyncConfig;
use crate::utilities::paths::device_path;
use crate::utilities::ExclusionFilter;

/// Create one directory on the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MkdirOp {
    /// Directory in `/sub/dir` form
    pub path: String,
}

/// Upload one file to the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOp {
    /// Root-relative source, `./sub/main.py`
    pub source: String,
    /// Device destination, `sub/main.py`
    pub destination: String,
}

/// Ordered operations for one push: every mkdir, then every upload
///
/// Both lists keep scan order. Nothing is re-sorted, so a parent directory
/// is created first only because the scanner emits parents first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub dirs: Vec<MkdirOp>,
    pub uploads: Vec<UploadOp>,
}

/// The plan rendered as two `&&`-chained command lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundCommands {
    pub directories: Option<String>,
    pub uploads: Option<String>,
}

/// Build the plan for scanned `dirs` and `files` under `config`'s filters
pub fn plan(dirs: &[String], files: &[String], config: &SyncConfig) -> SyncPlan {
    let filter = ExclusionFilter::new(
        config.excluded_extensions.clone(),
        config.excluded_directories.clone(),
    );

    let dirs = dirs
        .iter()
        .filter(|d| {
            let excluded = filter.excludes_directory(d);
            if excluded {
                log::debug!("skip dir  {}", d);
            }
            !excluded
        })
        .map(|d| MkdirOp { path: d.clone() })
        .collect();

    let uploads = files
        .iter()
        .filter(|f| {
            let excluded = filter.excludes_file(f);
            if excluded {
                log::debug!("skip file {}", f);
            }
            !excluded
        })
        .map(|f| UploadOp {
            source: f.clone(),
            destination: device_path(f).to_string(),
        })
        .collect();

    SyncPlan { dirs, uploads }
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.uploads.is_empty()
    }

    /// One `mkdir` command per directory, in plan order
    pub fn directory_commands(&self, builder: &CommandBuilder) -> Vec<DeviceCommand> {
        self.dirs.iter().map(|d| builder.mkdir(&d.path)).collect()
    }

    /// One `put` command per file, in plan order
    pub fn upload_commands(&self, builder: &CommandBuilder) -> Vec<DeviceCommand> {
        self.uploads
            .iter()
            .map(|u| builder.put(&u.source, &u.destination))
            .collect()
    }

    /// Directory phase and upload phase as chained command lines
    pub fn compound_commands(&self, builder: &CommandBuilder) -> CompoundCommands {
        CompoundCommands {
            directories: compound(&self.directory_commands(builder)),
            uploads: compound(&self.upload_commands(builder)),
        }
    }
}
