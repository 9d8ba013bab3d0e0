//! Pipeline orchestrator
//!
//! Validate, arm the cleanup guard, then write → drop cache → read. The first
//! error or interruption ends the run; the guard removes the benchmark file
//! whichever way the run ends.

use std::cell::Cell;
use std::fs;
use std::path::Path;

use crate::bench::cache::run_cache_drop;
use crate::bench::interrupt::InterruptSignal;
use crate::bench::read::run_read_phase;
use crate::bench::state::RunState;
use crate::bench::write::run_write_phase;
use crate::config::BenchmarkConfig;
use crate::models::RunReport;
use crate::util::Defer;
use crate::{SBenchError, Result};

/// Where a run currently is. Runs only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Writing,
    CacheDropping,
    Reading,
    Success,
    /// Ended with the named failure kind
    Failed(&'static str),
    Interrupted,
}

impl Stage {
    /// Whether the run is over
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Success | Stage::Failed(_) | Stage::Interrupted)
    }
}

/// One write/read benchmark run
#[derive(Debug)]
pub struct Pipeline {
    config: BenchmarkConfig,
    interrupt: InterruptSignal,
    stage: Cell<Stage>,
}

impl Pipeline {
    pub fn new(config: BenchmarkConfig, interrupt: InterruptSignal) -> Self {
        Self {
            config,
            interrupt,
            stage: Cell::new(Stage::Init),
        }
    }

    /// Current stage; terminal once `run` has returned
    pub fn stage(&self) -> Stage {
        self.stage.get()
    }

    /// Execute the run once
    pub fn run(&self) -> Result<RunReport> {
        let result = self.run_guarded();
        if let Ok(report) = &result {
            tracing::info!("{}", report.summary());
        }

        self.enter(match &result {
            Ok(_) => Stage::Success,
            Err(SBenchError::Interrupted) => Stage::Interrupted,
            Err(e) => Stage::Failed(e.kind()),
        });
        result
    }

    fn run_guarded(&self) -> Result<RunReport> {
        // Argument and size problems are reported before any file exists
        self.config.validate()?;

        let state = RunState::new(self.interrupt.clone());
        let cleanup = Defer::new(|| remove_output(&self.config.output_path, &state));

        let result = self.run_stages(&state);

        if self.config.keep_file && state.file_created() {
            cleanup.cancel();
            tracing::info!("(Kept {})", self.config.output_path.display());
        }
        result
    }

    fn run_stages(&self, state: &RunState) -> Result<RunReport> {
        self.enter(Stage::Writing);
        let write = run_write_phase(&self.config, state)?;
        state.check_interrupt()?;

        self.enter(Stage::CacheDropping);
        let cache_drop = run_cache_drop(&self.config.cache_drop, state)?;
        state.check_interrupt()?;

        self.enter(Stage::Reading);
        let read = run_read_phase(&self.config, state)?;

        Ok(RunReport::new(&self.config, write, cache_drop, read))
    }

    fn enter(&self, stage: Stage) {
        let from = self.stage.get();
        // Runs only move forward; nothing leaves a terminal stage
        if from.is_terminal() {
            tracing::warn!(?from, to = ?stage, "ignoring transition out of a terminal stage");
            return;
        }
        tracing::debug!(?from, to = ?stage, "stage transition");
        self.stage.set(stage);
    }
}

/// Cleanup action: delete the benchmark file if this run created it.
///
/// Never fails; a failed removal is reported and the run's own outcome stands.
fn remove_output(path: &Path, state: &RunState) {
    if !state.file_created() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => {
            state.clear_file_created();
            tracing::info!("(Removed {})", path.display());
        }
        Err(e) => tracing::error!("Failed to remove file {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheDrop;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> BenchmarkConfig {
        BenchmarkConfig::new(dir.join("bench.dat"))
            .with_size_mb(2)
            .with_buffer_size(256 * 1024)
            .with_cache_drop(CacheDrop::Skip)
            .with_sync(false)
            .with_progress(false)
    }

    #[test]
    fn test_stage_terminality() {
        assert!(!Stage::Init.is_terminal());
        assert!(!Stage::Reading.is_terminal());
        assert!(Stage::Success.is_terminal());
        assert!(Stage::Failed("write").is_terminal());
        assert!(Stage::Interrupted.is_terminal());
    }

    #[cfg(any(target_os = "macos", target_os = "linux"))]
    #[test]
    fn test_successful_run_removes_file() {
        let temp_dir = tempdir().unwrap();
        let config = config_in(temp_dir.path());
        let pipeline = Pipeline::new(config.clone(), InterruptSignal::new());
        assert_eq!(pipeline.stage(), Stage::Init);

        let report = pipeline.run().unwrap();

        assert_eq!(pipeline.stage(), Stage::Success);
        assert_eq!(report.write.metrics.bytes, 2 * 1024 * 1024);
        assert_eq!(report.read.metrics.bytes, report.write.metrics.bytes);
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_config_error_creates_no_file() {
        let temp_dir = tempdir().unwrap();
        let config = config_in(temp_dir.path()).with_buffer_size(4 * 1024 * 1024);
        let pipeline = Pipeline::new(config.clone(), InterruptSignal::new());

        assert!(matches!(pipeline.run(), Err(SBenchError::Config(_))));
        assert_eq!(pipeline.stage(), Stage::Failed("config"));
        assert!(!config.output_path.exists());

        // A finished pipeline stays in its terminal stage
        let _ = pipeline.run();
        assert_eq!(pipeline.stage(), Stage::Failed("config"));
    }

    #[test]
    fn test_interrupted_run_skips_later_stages_and_cleans_up() {
        let temp_dir = tempdir().unwrap();
        let marker = temp_dir.path().join("cache-dropped");
        let config = config_in(temp_dir.path()).with_cache_drop(CacheDrop::Command(vec![
            "touch".to_string(),
            marker.to_string_lossy().into_owned(),
        ]));
        let interrupt = InterruptSignal::new();
        interrupt.trigger();
        let pipeline = Pipeline::new(config.clone(), interrupt);

        assert!(matches!(pipeline.run(), Err(SBenchError::Interrupted)));
        assert_eq!(pipeline.stage(), Stage::Interrupted);
        assert!(!marker.exists());
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_cache_drop_failure_stops_before_read() {
        let temp_dir = tempdir().unwrap();
        let config = config_in(temp_dir.path()).with_cache_drop(CacheDrop::Command(vec![
            "/nonexistent/sbench-purge".to_string(),
        ]));
        let pipeline = Pipeline::new(config.clone(), InterruptSignal::new());

        assert!(matches!(pipeline.run(), Err(SBenchError::CacheDrop(_))));
        assert_eq!(pipeline.stage(), Stage::Failed("cache-drop"));
        assert!(!config.output_path.exists());
    }

    #[cfg(any(target_os = "macos", target_os = "linux"))]
    #[test]
    fn test_keep_file_disarms_cleanup() {
        let temp_dir = tempdir().unwrap();
        let config = config_in(temp_dir.path()).with_keep_file(true);
        let pipeline = Pipeline::new(config.clone(), InterruptSignal::new());

        pipeline.run().unwrap();

        assert_eq!(
            std::fs::metadata(&config.output_path).unwrap().len(),
            2 * 1024 * 1024
        );
    }

    #[test]
    fn test_remove_output_reports_but_does_not_fail() {
        let temp_dir = tempdir().unwrap();
        let state = RunState::new(InterruptSignal::new());
        state.mark_file_created();

        // Nothing to delete: the error is only logged
        remove_output(&temp_dir.path().join("gone.dat"), &state);
        assert!(state.file_created());

        let path = temp_dir.path().join("present.dat");
        std::fs::write(&path, b"x").unwrap();
        remove_output(&path, &state);
        assert!(!path.exists());
        assert!(!state.file_created());
    }
}
