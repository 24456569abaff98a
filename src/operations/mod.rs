// Operations module
// Business logic for scanning, planning and pushing to the device

pub mod commands;
pub mod executor;
pub mod plan;
pub mod scan;
pub mod session;
pub mod sync;

pub use commands::{CommandBuilder, DeviceCommand};
pub use executor::{CommandExecutor, CommandOutcome, ProcessExecutor};
pub use plan::{plan, SyncPlan};
pub use scan::{scan, ScanResult};
pub use session::{detect_project_root, DeviceSession, PushOptions};
pub use sync::{PushReport, SyncEngine, SyncOptions};
