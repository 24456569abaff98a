// MicroPython Sync Library
// Plans and pushes MicroPython projects to a serial-attached board

// Core infrastructure - config, errors, events
pub mod core;

// Operations - scanning, planning and device workflows
pub mod operations;

// UI - host capabilities and their terminal implementations
pub mod ui;

// Utilities - helper functions and tools
pub mod utilities;

// Application constants
pub mod constants;

// Re-export commonly used items for convenience
pub use self::core::{AppConfig, SessionError, SyncConfig};
pub use operations::{DeviceSession, ProcessExecutor, PushOptions, SyncPlan};
pub use constants::*;
