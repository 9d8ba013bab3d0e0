//! Per-run mutable state shared by the phases

use std::cell::Cell;

use crate::bench::interrupt::InterruptSignal;
use crate::Result;

/// State owned by the orchestrator for one invocation
#[derive(Debug)]
pub struct RunState {
    interrupt: InterruptSignal,
    file_created: Cell<bool>,
}

impl RunState {
    pub fn new(interrupt: InterruptSignal) -> Self {
        Self {
            interrupt,
            file_created: Cell::new(false),
        }
    }

    /// Record that the output file exists and must be cleaned up
    pub fn mark_file_created(&self) {
        self.file_created.set(true);
    }

    /// Record that the output file has been removed
    pub fn clear_file_created(&self) {
        self.file_created.set(false);
    }

    pub fn file_created(&self) -> bool {
        self.file_created.get()
    }

    pub fn interrupted(&self) -> bool {
        self.interrupt.is_triggered()
    }

    /// `Err(Interrupted)` once a termination signal has arrived
    pub fn check_interrupt(&self) -> Result<()> {
        self.interrupt.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_created_flag() {
        let state = RunState::new(InterruptSignal::new());
        assert!(!state.file_created());
        state.mark_file_created();
        assert!(state.file_created());
        state.clear_file_created();
        assert!(!state.file_created());
    }

    #[test]
    fn test_observes_interrupt() {
        let interrupt = InterruptSignal::new();
        let state = RunState::new(interrupt.clone());
        assert!(state.check_interrupt().is_ok());
        interrupt.trigger();
        assert!(state.interrupted());
        assert!(state.check_interrupt().is_err());
    }
}
