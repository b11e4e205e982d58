//! Pipeline orchestration for hierarchy requests.
//!
//! This module holds the resolve → paginate → build → render workflow shared
//! by the CLI commands, plus output-target handling and exit codes.

mod hierarchy;
mod output;

pub use hierarchy::{
    get_component_hierarchy, resolve_hierarchy, ComponentHierarchy, HierarchyOptions,
    HierarchyOutcome, ResolutionPolicy,
};
pub use output::{auto_detect_format, write_output, OutputTarget};

use crate::error::HierarchyError;

/// Exit codes for scripting
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// The component did not resolve and the placeholder tree was returned
    pub const FALLBACK_USED: i32 = 1;
    /// The request itself was invalid (malformed id, leaf expansion)
    pub const CLIENT_ERROR: i32 = 2;
    /// Any other error
    pub const ERROR: i32 = 3;
}

/// Exit code for an error surfaced at the binary boundary.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<HierarchyError>() {
        Some(e) if e.is_client_error() => exit_codes::CLIENT_ERROR,
        _ => exit_codes::ERROR,
    }
}
