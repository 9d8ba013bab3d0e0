//! Configuration management module
//!
//! Holds the immutable benchmark configuration built once from the command
//! line, and its validation rules.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{SBenchError, Result, BUFFER_SIZE, DEFAULT_SIZE_MB, MIB};

/// Benchmark configuration structure containing all test parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// File to create (or overwrite), benchmark and remove
    pub output_path: PathBuf,
    /// Requested file size in megabytes (MiB)
    pub size_mb: u64,
    /// Size of the single I/O buffer used by each phase (in bytes)
    pub buffer_size: usize,
    /// How the page cache is evicted between the write and read phases
    pub cache_drop: CacheDrop,
    /// Whether to fsync the file before closing it in the write phase
    pub sync: bool,
    /// Whether to keep the benchmark file after the run
    pub keep_file: bool,
    /// Whether to draw progress bars
    pub progress: bool,
}

/// Cache eviction strategy run between the write and read phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheDrop {
    /// The platform's privileged eviction command
    System,
    /// A user supplied command line (program followed by its arguments)
    Command(Vec<String>),
    /// Do not evict; the read figure may be served from cache
    Skip,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::new(),
            size_mb: DEFAULT_SIZE_MB,
            buffer_size: BUFFER_SIZE,
            cache_drop: CacheDrop::System,
            sync: true,
            keep_file: false,
            progress: true,
        }
    }
}

impl BenchmarkConfig {
    /// Create a configuration for `output_path` with default values
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        let path = self.output_path.as_os_str().to_string_lossy();
        if path.is_empty() {
            return Err(SBenchError::Usage("Output path must not be empty".to_string()));
        }
        if path.starts_with('-') {
            return Err(SBenchError::Usage(format!(
                "Output path must not begin with '-': {}",
                path
            )));
        }

        if self.size_mb == 0 {
            return Err(SBenchError::Usage("SIZE_MB must be > 0".to_string()));
        }

        if self.buffer_size == 0 {
            return Err(SBenchError::Config(
                "Buffer size must be greater than 0".to_string(),
            ));
        }

        // At least one full buffer has to fit in the requested size
        match self.total_bytes() {
            Some(total) if total >= self.buffer_size as u64 => {}
            Some(total) => {
                return Err(SBenchError::Config(format!(
                    "Invalid output size specified: {} bytes is smaller than one {} byte buffer",
                    total, self.buffer_size
                )));
            }
            None => {
                return Err(SBenchError::Config(format!(
                    "Output size too large: {} MB",
                    self.size_mb
                )));
            }
        }

        if let CacheDrop::Command(argv) = &self.cache_drop {
            if argv.is_empty() || argv[0].is_empty() {
                return Err(SBenchError::Config(
                    "Cache drop command must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Requested size in bytes, `None` on overflow
    pub fn total_bytes(&self) -> Option<u64> {
        self.size_mb.checked_mul(MIB)
    }

    /// Number of full buffers the write phase emits
    pub fn buffer_count(&self) -> u64 {
        match (self.total_bytes(), self.buffer_size as u64) {
            (Some(total), buffer) if buffer > 0 => total / buffer,
            _ => 0,
        }
    }

    /// Largest multiple of the buffer size not exceeding the requested size
    pub fn aligned_bytes(&self) -> u64 {
        self.buffer_count() * self.buffer_size as u64
    }

    /// Set the requested size in megabytes
    pub fn with_size_mb(mut self, size_mb: u64) -> Self {
        self.size_mb = size_mb;
        self
    }

    /// Set the I/O buffer size in bytes
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Set the cache eviction strategy
    pub fn with_cache_drop(mut self, cache_drop: CacheDrop) -> Self {
        self.cache_drop = cache_drop;
        self
    }

    /// Set whether to fsync before closing
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Set whether to keep the benchmark file
    pub fn with_keep_file(mut self, keep: bool) -> Self {
        self.keep_file = keep;
        self
    }

    /// Set whether to draw progress bars
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}

impl CacheDrop {
    /// Build a custom command from a whitespace separated command line
    pub fn from_command_line(line: &str) -> Self {
        CacheDrop::Command(line.split_whitespace().map(str::to_string).collect())
    }

    /// Get a human-readable description of the strategy
    pub fn description(&self) -> String {
        match self {
            CacheDrop::System => "system default".to_string(),
            CacheDrop::Command(argv) => argv.join(" "),
            CacheDrop::Skip => "skipped".to_string(),
        }
    }
}
