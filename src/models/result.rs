//! Benchmark result data models
//!
//! Contains structures for storing and serializing the outcome of each phase
//! and of a complete write/read run.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::BenchmarkConfig;
use crate::util::units::{calculate_throughput_mbps, format_throughput};

/// Bytes moved by one phase and how long it took
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseMetrics {
    /// Total bytes transferred
    pub bytes: u64,
    /// Wall time of the transfer loop
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
    /// Throughput in megabytes (MiB) per second
    pub throughput_mbps: f64,
}

/// Outcome of the write phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteReport {
    /// Time spent generating the random buffer, excluded from `metrics`
    #[serde(with = "duration_serde")]
    pub fill_elapsed: Duration,
    /// Number of full buffers written
    pub buffers_written: u64,
    /// Transfer metrics
    pub metrics: PhaseMetrics,
}

/// Outcome of the read phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadReport {
    /// Transfer metrics
    pub metrics: PhaseMetrics,
}

/// What happened between the two phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheDropOutcome {
    /// The eviction command ran and exited successfully
    Performed { command: String },
    /// Eviction was explicitly skipped
    Skipped,
}

/// Complete report for one successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run finished
    pub timestamp: DateTime<Utc>,
    /// Benchmark file
    pub output_path: PathBuf,
    /// Requested size in megabytes
    pub size_mb: u64,
    /// I/O buffer size in bytes
    pub buffer_size: usize,
    pub write: WriteReport,
    pub cache_drop: CacheDropOutcome,
    pub read: ReadReport,
}

impl PhaseMetrics {
    /// Create new phase metrics, deriving the throughput
    pub fn new(bytes: u64, elapsed: Duration) -> Self {
        Self {
            bytes,
            elapsed,
            throughput_mbps: calculate_throughput_mbps(bytes, elapsed),
        }
    }

    /// "took 1.234 secs (567.89 MB/sec)", as printed after each phase
    pub fn describe(&self) -> String {
        format!(
            "took {:.3} secs ({})",
            self.elapsed.as_secs_f64(),
            format_throughput(self.throughput_mbps)
        )
    }
}

impl RunReport {
    /// Assemble the report of a finished run
    pub fn new(
        config: &BenchmarkConfig,
        write: WriteReport,
        cache_drop: CacheDropOutcome,
        read: ReadReport,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            output_path: config.output_path.clone(),
            size_mb: config.size_mb,
            buffer_size: config.buffer_size,
            write,
            cache_drop,
            read,
        }
    }

    /// Get a one-line human-readable summary of the run
    pub fn summary(&self) -> String {
        let cache = match &self.cache_drop {
            CacheDropOutcome::Performed { .. } => "",
            CacheDropOutcome::Skipped => " [cache not dropped]",
        };
        format!(
            "{} - {} - write {:.2} MB/s - read {:.2} MB/s{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.output_path.display(),
            self.write.metrics.throughput_mbps,
            self.read.metrics.throughput_mbps,
            cache
        )
    }

    /// Multi-line report printed on stdout at the end of a run
    pub fn render(&self) -> String {
        let cache = match &self.cache_drop {
            CacheDropOutcome::Performed { command } => format!("dropped via `{}`", command),
            CacheDropOutcome::Skipped => "skipped (read may be served from cache)".to_string(),
        };
        format!(
            "Generating random data... took {:.3} seconds\n\
             Writing {} MB to {}... {}\n\
             Read cache: {}\n\
             Reading back {}... {}",
            self.write.fill_elapsed.as_secs_f64(),
            self.size_mb,
            self.output_path.display(),
            self.write.metrics.describe(),
            cache,
            self.output_path.display(),
            self.read.metrics.describe(),
        )
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // u64 nanoseconds cover ~584 years; serde_json rejects u128 by default
        (duration.as_nanos() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos))
    }
}
