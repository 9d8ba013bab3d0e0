//! Monotonic process timer
//!
//! Elapsed seconds since an epoch fixed on the first call in the process.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Seconds elapsed since the first call to `now()` in this process.
///
/// Backed by [`Instant`], so it never goes backwards and ignores wall-clock
/// adjustments.
pub fn now() -> f64 {
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Duration between a timestamp previously returned by [`now`] and the present.
pub fn since(start: f64) -> Duration {
    Duration::from_secs_f64((now() - start).max(0.0))
}
