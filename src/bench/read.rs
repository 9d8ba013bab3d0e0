//! Read phase
//!
//! Reopens the benchmark file with read caching disabled and reads it
//! sequentially to the end, one buffer at a time.

use std::fs::File;
use std::io::{ErrorKind, Read};

use crate::bench::state::RunState;
use crate::bench::transfer_progress;
use crate::config::BenchmarkConfig;
use crate::io::{disable_read_cache, IoBuffer};
use crate::models::{PhaseMetrics, ReadReport};
use crate::util::timer;
use crate::{SBenchError, Result};

/// Run the read phase.
///
/// The file handle lives only inside this function and is closed on every
/// exit path. Zero bytes read back is an error, since the file was just
/// written with a non-zero size.
pub fn run_read_phase(config: &BenchmarkConfig, state: &RunState) -> Result<ReadReport> {
    let path = &config.output_path;
    tracing::info!("Reading back {}...", path.display());

    let mut file = File::open(path).map_err(|source| SBenchError::ReadOpen {
        path: path.clone(),
        source,
    })?;

    disable_read_cache(&file).map_err(|source| SBenchError::CacheDisable {
        path: path.clone(),
        source,
    })?;

    let mut buffer = IoBuffer::new(config.buffer_size)?;
    let expected = file
        .metadata()
        .map(|m| m.len())
        .unwrap_or_else(|_| config.aligned_bytes());
    let progress = transfer_progress(config.progress, expected, "read");

    let start = timer::now();
    let mut bytes_read = 0u64;

    loop {
        if state.interrupted() {
            break;
        }
        match file.read(buffer.as_mut_slice()) {
            Ok(0) => break,
            Ok(n) => {
                bytes_read += n as u64;
                progress.inc(n as u64);
            }
            // Re-check the interrupt flag before issuing the next read
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                progress.abandon();
                return Err(SBenchError::ReadData {
                    path: path.clone(),
                    bytes_read,
                    source: Some(source),
                });
            }
        }
    }
    let elapsed = timer::since(start);
    drop(file);

    if state.interrupted() {
        progress.abandon();
        tracing::debug!(bytes_read, "read loop stopped by interrupt");
        return Err(SBenchError::Interrupted);
    }
    progress.finish_and_clear();

    if bytes_read == 0 {
        return Err(SBenchError::ReadData {
            path: path.clone(),
            bytes_read,
            source: None,
        });
    }

    let metrics = PhaseMetrics::new(bytes_read, elapsed);
    tracing::info!("Read {}", metrics.describe());

    Ok(ReadReport { metrics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::interrupt::InterruptSignal;
    use tempfile::tempdir;

    fn config_for(path: std::path::PathBuf) -> BenchmarkConfig {
        BenchmarkConfig::new(path)
            .with_size_mb(1)
            .with_buffer_size(64 * 1024)
            .with_progress(false)
    }

    #[cfg(any(target_os = "macos", target_os = "linux"))]
    #[test]
    fn test_reads_whole_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("read.dat");
        // Not a multiple of the buffer size: the last read is short
        std::fs::write(&path, vec![0xA5u8; 300 * 1024 + 17]).unwrap();
        let state = RunState::new(InterruptSignal::new());

        let report = run_read_phase(&config_for(path), &state).unwrap();
        assert_eq!(report.metrics.bytes, 300 * 1024 + 17);
    }

    #[test]
    fn test_missing_file_is_read_open_error() {
        let temp_dir = tempdir().unwrap();
        let state = RunState::new(InterruptSignal::new());

        let result = run_read_phase(&config_for(temp_dir.path().join("absent.dat")), &state);
        assert!(matches!(result, Err(SBenchError::ReadOpen { .. })));
    }

    #[cfg(any(target_os = "macos", target_os = "linux"))]
    #[test]
    fn test_empty_file_is_read_data_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("empty.dat");
        std::fs::write(&path, b"").unwrap();
        let state = RunState::new(InterruptSignal::new());

        match run_read_phase(&config_for(path), &state) {
            Err(SBenchError::ReadData {
                bytes_read, source, ..
            }) => {
                assert_eq!(bytes_read, 0);
                assert!(source.is_none());
            }
            other => panic!("Expected read data error, got {:?}", other),
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_directory_read_fails_mid_stream() {
        // Opening a directory works on Linux, reading it fails with EISDIR
        let temp_dir = tempdir().unwrap();
        let state = RunState::new(InterruptSignal::new());

        let result = run_read_phase(&config_for(temp_dir.path().to_path_buf()), &state);
        assert!(matches!(
            result,
            Err(SBenchError::ReadData { source: Some(_), .. }) | Err(SBenchError::CacheDisable { .. })
        ));
    }

    #[cfg(any(target_os = "macos", target_os = "linux"))]
    #[test]
    fn test_interrupt_stops_read() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("read.dat");
        std::fs::write(&path, vec![1u8; 128 * 1024]).unwrap();
        let interrupt = InterruptSignal::new();
        interrupt.trigger();
        let state = RunState::new(interrupt);

        assert!(matches!(
            run_read_phase(&config_for(path), &state),
            Err(SBenchError::Interrupted)
        ));
    }
}
