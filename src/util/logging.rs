//! Logging setup
//!
//! Diagnostics go through `tracing` to stderr so stdout only carries results.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted before `RUST_LOG`
pub const LOG_ENV: &str = "SBENCH_LOG";

/// Map `-v`/`-q` counts onto a level, `info` being the default
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber.
///
/// `SBENCH_LOG` wins over `RUST_LOG`, which wins over `default_level`.
/// Calling this twice is harmless; the second call is ignored.
pub fn init(default_level: LevelFilter) {
    let directives = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .unwrap_or_default();

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(directives);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
