//! Units formatting and conversion utilities
//!
//! Throughput maths plus human-readable sizes for progress and result lines.

use std::time::Duration;

use byte_unit::{Byte, UnitType};

/// Format bytes into a human-readable binary size
///
/// # Examples
/// ```
/// use sbench::util::units::format_bytes;
///
/// assert!(format_bytes(1048576).contains("MiB"));
/// ```
pub fn format_bytes(bytes: u64) -> String {
    let adjusted = Byte::from_u64(bytes).get_appropriate_unit(UnitType::Binary);
    format!("{adjusted:.2}")
}

/// Calculate throughput in MB/s (1 MB = 1 MiB) from bytes and duration
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use sbench::util::units::calculate_throughput_mbps;
///
/// let throughput = calculate_throughput_mbps(1048576, Duration::from_secs(1));
/// assert!((throughput - 1.0).abs() < 0.01);
/// ```
pub fn calculate_throughput_mbps(bytes: u64, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }

    let duration_secs = duration.as_secs_f64();
    let megabytes = bytes as f64 / crate::MIB as f64;
    megabytes / duration_secs
}

/// Format throughput the way the result lines print it
///
/// # Examples
/// ```
/// use sbench::util::units::format_throughput;
///
/// assert_eq!(format_throughput(1234.5678), "1234.57 MB/sec");
/// ```
pub fn format_throughput(mbps: f64) -> String {
    format!("{:.2} MB/sec", mbps)
}
