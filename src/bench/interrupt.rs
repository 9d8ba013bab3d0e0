//! Cooperative interruption
//!
//! Termination signals never kill the process outright. They flip an atomic
//! flag that the transfer loops poll once per buffer, so the benchmark file
//! is still removed on the way out.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{SBenchError, Result};

/// Process-wide "please stop" flag, set once and never cleared
#[derive(Debug, Clone, Default)]
pub struct InterruptSignal {
    flag: Arc<AtomicBool>,
}

impl InterruptSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request termination. Returns `true` for the call that set the flag.
    pub fn trigger(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    /// Whether termination has been requested
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// `Err(Interrupted)` once termination has been requested
    pub fn check(&self) -> Result<()> {
        if self.is_triggered() {
            return Err(SBenchError::Interrupted);
        }
        Ok(())
    }
}

/// Route interrupt, terminate, hang-up and quit to `interrupt`.
///
/// Each signal class gets a listener task that sets the flag and prints a
/// notice; the OS-level handler itself only records the delivery. Must be
/// called from within a tokio runtime.
#[cfg(unix)]
pub fn install_signal_handlers(interrupt: &InterruptSignal) -> io::Result<Vec<JoinHandle<()>>> {
    use tokio::signal::unix::{signal, SignalKind};

    let kinds = [
        (SignalKind::interrupt(), "SIGINT"),
        (SignalKind::terminate(), "SIGTERM"),
        (SignalKind::hangup(), "SIGHUP"),
        (SignalKind::quit(), "SIGQUIT"),
    ];

    let mut handles = Vec::with_capacity(kinds.len());
    for (kind, name) in kinds {
        let mut stream = signal(kind)?;
        let interrupt = interrupt.clone();
        handles.push(tokio::spawn(async move {
            while stream.recv().await.is_some() {
                interrupt.trigger();
                tracing::warn!("(Caught signal {}, will exit)", name);
            }
        }));
    }

    Ok(handles)
}

/// Route Ctrl-C to `interrupt`. Must be called from within a tokio runtime.
#[cfg(not(unix))]
pub fn install_signal_handlers(interrupt: &InterruptSignal) -> io::Result<Vec<JoinHandle<()>>> {
    let interrupt = interrupt.clone();
    let handle = tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            interrupt.trigger();
            tracing::warn!("(Caught Ctrl-C, will exit)");
        }
    });
    Ok(vec![handle])
}
