//! Cache-drop phase
//!
//! Evicts cached pages between the write and read phases by running an
//! external, usually privileged, command. Without it the read phase would
//! mostly measure memory.

use std::process::Command;

use crate::bench::state::RunState;
use crate::config::CacheDrop;
use crate::models::CacheDropOutcome;
use crate::{SBenchError, Result};

/// Platform default eviction command, if this OS has one
pub fn system_command() -> Option<Vec<String>> {
    let argv: &[&str] = if cfg!(target_os = "macos") {
        &["/usr/bin/sudo", "/usr/sbin/purge"]
    } else if cfg!(target_os = "linux") {
        &[
            "/usr/bin/sudo",
            "/bin/sh",
            "-c",
            "sync && echo 3 > /proc/sys/vm/drop_caches",
        ]
    } else {
        return None;
    };
    Some(argv.iter().map(|s| s.to_string()).collect())
}

/// Run the cache-drop phase. Any non-zero exit is a hard failure; no retry.
///
/// A terminal Ctrl-C reaches the whole process group, so the child usually
/// dies from the same signal; once the interrupt flag is set the outcome is
/// `Interrupted` whatever the child reported.
pub fn run_cache_drop(cache_drop: &CacheDrop, state: &RunState) -> Result<CacheDropOutcome> {
    let argv = match cache_drop {
        CacheDrop::Skip => {
            tracing::warn!(
                "Skipping cache drop; read throughput may be served from the page cache"
            );
            return Ok(CacheDropOutcome::Skipped);
        }
        CacheDrop::System => system_command().ok_or_else(|| {
            SBenchError::CacheDrop(format!(
                "no cache eviction facility known for {}",
                std::env::consts::OS
            ))
        })?,
        CacheDrop::Command(argv) => argv.clone(),
    };

    let command = argv.join(" ");
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| SBenchError::CacheDrop("empty cache drop command".to_string()))?;

    tracing::info!("Running {} (clearing read cache)...", command);
    tracing::debug!(strategy = %cache_drop.description(), "cache drop");

    // stdin stays inherited so sudo can prompt for a password
    let status = Command::new(program).args(args).status();
    state.check_interrupt()?;

    let status = status
        .map_err(|e| SBenchError::CacheDrop(format!("unable to execute `{}`: {}", command, e)))?;
    if !status.success() {
        return Err(SBenchError::CacheDrop(format!(
            "`{}` failed with {}",
            command, status
        )));
    }

    Ok(CacheDropOutcome::Performed { command })
}
