//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, parse helpers)
//! - `predict` - Forecast generation command
//! - `validate` - Model validation and metrics commands
//! - `recurring` - Recurring catalogue management commands
//! - `predictions` - Stored prediction inspection and pruning commands

pub mod core;
pub mod predict;
pub mod predictions;
pub mod recurring;
pub mod validate;

// Re-export command functions for main.rs
pub use core::*;
pub use predict::*;
pub use predictions::*;
pub use recurring::*;
pub use validate::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}
