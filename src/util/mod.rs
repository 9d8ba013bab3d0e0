//! Utility functions module
//!
//! Contains the process timer, the deferred-action guard, units formatting
//! and logging setup.

pub mod guard;
pub mod logging;
pub mod timer;
pub mod units;

// Re-export commonly used functions
pub use guard::Defer;
pub use units::{calculate_throughput_mbps, format_bytes, format_throughput};
