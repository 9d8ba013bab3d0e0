//! Data models module
//!
//! Contains per-phase metrics and the report of a whole run.

pub mod result;

// Re-export commonly used types
pub use result::{CacheDropOutcome, PhaseMetrics, ReadReport, RunReport, WriteReport};
