// Utilities module
// Helper functions and tools

pub mod paths;
pub mod patterns;
pub mod ports;

pub use paths::{device_path, normalize_path, resolve_path};
pub use patterns::{matches_base_name, matches_suffix, ExclusionFilter};
pub use ports::list_candidate_ports;
