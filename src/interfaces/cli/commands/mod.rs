//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod admin_keys;
mod config_management;
mod password;
mod stats;

pub use admin_keys::*;
pub use config_management::*;
pub use password::*;
pub use stats::*;
