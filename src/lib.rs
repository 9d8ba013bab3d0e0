//! SBENCH - Simple sequential disk benchmark
//!
//! Writes a large file of random data, evicts it from the OS page cache and
//! reads it back with caching disabled, reporting elapsed time and MB/sec for
//! both passes. The benchmark file is always removed on the way out, including
//! when the run is interrupted by a signal.

use std::fmt;
use std::path::PathBuf;

pub mod bench;
pub mod cli;
pub mod config;
pub mod io;
pub mod models;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum SBenchError {
    /// Bad or missing command-line arguments
    Usage(String),
    /// Configuration validation error (detected before any I/O)
    Config(String),
    /// Opening, writing, syncing or closing the output file failed
    Write {
        path: PathBuf,
        opened: bool,
        source: std::io::Error,
    },
    /// External cache eviction command failed or is unavailable
    CacheDrop(String),
    /// The benchmark file could not be reopened for reading
    ReadOpen { path: PathBuf, source: std::io::Error },
    /// Read caching could not be disabled on the descriptor
    CacheDisable { path: PathBuf, source: std::io::Error },
    /// Reading back produced no data or failed mid-stream
    ReadData {
        path: PathBuf,
        bytes_read: u64,
        source: Option<std::io::Error>,
    },
    /// Cooperative early termination requested by a signal
    Interrupted,
}

impl fmt::Display for SBenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SBenchError::Usage(msg) => write!(f, "Usage error: {}", msg),
            SBenchError::Config(msg) => write!(f, "Configuration error: {}", msg),
            SBenchError::Write {
                path,
                opened,
                source,
            } => {
                let verb = if *opened { "writing to" } else { "opening" };
                write!(f, "Error {} {} ({})", verb, path.display(), source)
            }
            SBenchError::CacheDrop(msg) => write!(f, "Cache drop failed: {}", msg),
            SBenchError::ReadOpen { path, source } => {
                write!(f, "Error opening {} for reading ({})", path.display(), source)
            }
            SBenchError::CacheDisable { path, source } => write!(
                f,
                "Unable to disable read caching for {} ({})",
                path.display(),
                source
            ),
            SBenchError::ReadData {
                path,
                bytes_read,
                source: Some(source),
            } => write!(
                f,
                "Error reading {} after {} bytes ({})",
                path.display(),
                bytes_read,
                source
            ),
            SBenchError::ReadData { path, .. } => {
                write!(f, "Error reading {}: no data was read back", path.display())
            }
            SBenchError::Interrupted => write!(f, "Interrupted by signal"),
        }
    }
}

impl std::error::Error for SBenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SBenchError::Write { source, .. }
            | SBenchError::ReadOpen { source, .. }
            | SBenchError::CacheDisable { source, .. } => Some(source),
            SBenchError::ReadData {
                source: Some(source),
                ..
            } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias for SBENCH operations
pub type Result<T> = std::result::Result<T, SBenchError>;

/// Error handling utilities
pub mod error {
    use super::SBenchError;

    pub const EXIT_SUCCESS: i32 = 0;
    pub const EXIT_USAGE: i32 = 1;
    pub const EXIT_CONFIG: i32 = 2;
    pub const EXIT_WRITE: i32 = 3;
    pub const EXIT_CACHE_DROP: i32 = 4;
    pub const EXIT_READ_OPEN: i32 = 10;
    pub const EXIT_CACHE_DISABLE: i32 = 11;
    pub const EXIT_READ_DATA: i32 = 20;
    pub const EXIT_INTERRUPTED: i32 = 99;
    /// The benchmark worker panicked
    pub const EXIT_INTERNAL: i32 = 101;

    impl SBenchError {
        /// Process exit code for this failure kind
        pub fn exit_code(&self) -> i32 {
            match self {
                SBenchError::Usage(_) => EXIT_USAGE,
                SBenchError::Config(_) => EXIT_CONFIG,
                SBenchError::Write { .. } => EXIT_WRITE,
                SBenchError::CacheDrop(_) => EXIT_CACHE_DROP,
                SBenchError::ReadOpen { .. } => EXIT_READ_OPEN,
                SBenchError::CacheDisable { .. } => EXIT_CACHE_DISABLE,
                SBenchError::ReadData { .. } => EXIT_READ_DATA,
                SBenchError::Interrupted => EXIT_INTERRUPTED,
            }
        }

        /// Short name of the failure kind, used in logs and stage tracking
        pub fn kind(&self) -> &'static str {
            match self {
                SBenchError::Usage(_) => "usage",
                SBenchError::Config(_) => "config",
                SBenchError::Write { .. } => "write",
                SBenchError::CacheDrop(_) => "cache-drop",
                SBenchError::ReadOpen { .. } => "read-open",
                SBenchError::CacheDisable { .. } => "cache-disable",
                SBenchError::ReadData { .. } => "read-data",
                SBenchError::Interrupted => "interrupted",
            }
        }

        /// Interruption is an early exit, everything else is a fault
        pub fn is_failure(&self) -> bool {
            !matches!(self, SBenchError::Interrupted)
        }
    }

    /// Remediation hint for the failure kinds where one is useful
    pub fn hint(error: &SBenchError) -> Option<&'static str> {
        match error {
            SBenchError::Config(_) => {
                Some("Request a larger SIZE_MB or a smaller --buffer-kib.")
            }
            SBenchError::CacheDrop(_) => Some(
                "Dropping the page cache needs administrator rights (sudo). \
                 Use --cache-drop-command to supply another command, or \
                 --skip-cache-drop to measure anyway.",
            ),
            SBenchError::Write { opened: false, .. } => {
                Some("Check that the target directory exists and is writable.")
            }
            SBenchError::Write { opened: true, .. } => {
                Some("Check free space on the target volume.")
            }
            _ => None,
        }
    }

    /// Convert error to a user-facing message, with a hint if one exists
    pub fn user_friendly_message(error: &SBenchError) -> String {
        match hint(error) {
            Some(hint) => format!("{}\n{}", error, hint),
            None => error.to_string(),
        }
    }
}

// Common types and constants
pub const APP_NAME: &str = "sbench";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIB: u64 = 1024 * 1024;
pub const BUFFER_SIZE: usize = 1024 * 1024;
pub const DEFAULT_SIZE_MB: u64 = 2 * 1024;
