//! Benchmark engine module
//!
//! Contains the write, cache-drop and read phases, the interrupt flag they
//! poll, and the pipeline that sequences them.

pub mod cache;
pub mod interrupt;
pub mod pipeline;
pub mod read;
pub mod state;
pub mod write;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

// Re-export commonly used types
pub use cache::run_cache_drop;
pub use interrupt::{install_signal_handlers, InterruptSignal};
pub use pipeline::{Pipeline, Stage};
pub use read::run_read_phase;
pub use state::RunState;
pub use write::run_write_phase;

/// Byte progress bar on stderr for one transfer loop, or a hidden one
pub(crate) fn transfer_progress(enabled: bool, total_bytes: u64, label: &'static str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::with_draw_target(Some(total_bytes), ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner} {msg} {bytes}/{total_bytes} ({binary_bytes_per_sec}, {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message(label);
    pb
}
