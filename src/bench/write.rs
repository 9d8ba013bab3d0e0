//! Write phase
//!
//! Fills one buffer with random data and writes it to the output file over
//! and over until the buffer-aligned target size is reached.

use std::fs::{File, OpenOptions};
use std::io::Write;

use crate::bench::state::RunState;
use crate::bench::transfer_progress;
use crate::config::BenchmarkConfig;
use crate::io::IoBuffer;
use crate::models::{PhaseMetrics, WriteReport};
use crate::util::{format_bytes, timer};
use crate::{SBenchError, Result};

/// Run the write phase.
///
/// The output file is truncated (or created) and `state` is marked as soon as
/// the open succeeds, so the cleanup guard removes it on every later exit
/// path. Returns `Err(Interrupted)` if a termination signal was observed.
pub fn run_write_phase(config: &BenchmarkConfig, state: &RunState) -> Result<WriteReport> {
    config.validate()?;

    let path = &config.output_path;
    let write_error = |opened: bool| {
        move |source: std::io::Error| SBenchError::Write {
            path: path.clone(),
            opened,
            source,
        }
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(write_error(false))?;
    state.mark_file_created();

    let fill_start = timer::now();
    let buffer = IoBuffer::random(config.buffer_size)?;
    let fill_elapsed = timer::since(fill_start);
    tracing::info!(
        "Generating random data...took {:.3} seconds",
        fill_elapsed.as_secs_f64()
    );

    let total = config.aligned_bytes();
    let chunk = buffer.len() as u64;
    tracing::info!("Writing {} MB to {}...", config.size_mb, path.display());
    tracing::debug!(
        "{} in {} buffers of {}",
        format_bytes(total),
        config.buffer_count(),
        format_bytes(chunk)
    );

    let progress = transfer_progress(config.progress, total, "write");
    let start = timer::now();
    let mut written = 0u64;
    let mut buffers_written = 0u64;

    for _ in 0..config.buffer_count() {
        if state.interrupted() {
            break;
        }
        file.write_all(buffer.as_slice()).map_err(write_error(true))?;
        written += chunk;
        buffers_written += 1;
        progress.inc(chunk);
    }

    if state.interrupted() {
        progress.abandon();
        tracing::debug!(buffers_written, "write loop stopped by interrupt");
        return Err(SBenchError::Interrupted);
    }

    finish(file, config.sync).map_err(write_error(true))?;
    let elapsed = timer::since(start);
    progress.finish_and_clear();

    let metrics = PhaseMetrics::new(written, elapsed);
    tracing::info!("Write {}", metrics.describe());

    Ok(WriteReport {
        fill_elapsed,
        buffers_written,
        metrics,
    })
}

/// Flush, optionally fsync, then close the file
fn finish(mut file: File, sync: bool) -> std::io::Result<()> {
    file.flush()?;
    if sync {
        file.sync_all()?;
    }
    drop(file);
    Ok(())
}
