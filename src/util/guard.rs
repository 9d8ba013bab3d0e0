//! Deferred cleanup actions
//!
//! [`Defer`] runs a closure exactly once when it goes out of scope, whichever
//! way the scope is left: normal return, `?` propagation or unwinding.

/// Scope guard running a no-argument action on drop
#[must_use = "the action runs as soon as the guard is dropped"]
pub struct Defer<F: FnOnce()> {
    action: Option<F>,
}

impl<F: FnOnce()> Defer<F> {
    /// Arm a guard that will run `action` at the end of its lifetime
    pub fn new(action: F) -> Self {
        Self {
            action: Some(action),
        }
    }

    /// Disarm the guard; the action will never run
    pub fn cancel(mut self) {
        self.action = None;
    }
}

impl<F: FnOnce()> Drop for Defer<F> {
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}
