// Core infrastructure module
// Provides foundational systems that other modules depend on

pub mod app_config;
pub mod error;
pub mod events;
pub mod project_config;

pub use app_config::{AppConfig, SettingsOverride};
pub use error::{ConfigError, ExecutionError, ScanError, SessionError, ValidationError};
pub use events::{EventHandler, PickerEvent};
pub use project_config::SyncConfig;
