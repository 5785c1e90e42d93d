//! Process-wide verbosity threshold
//!
//! Verbosity is a cross-cutting runtime knob, so the threshold lives in one
//! process-global gate rather than in individual loggers. It starts at 0
//! (only V(0) info lines are written). Writers are serialized by a mutex;
//! readers load the value without locking since it is only ever compared
//! against, never combined with other state.

use parking_lot::{const_mutex, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A verbosity threshold. Higher values let more lines through.
#[derive(Debug)]
pub struct VerbosityGate {
    write_lock: Mutex<()>,
    threshold: AtomicUsize,
}

impl VerbosityGate {
    pub const fn new(threshold: usize) -> Self {
        Self {
            write_lock: const_mutex(()),
            threshold: AtomicUsize::new(threshold),
        }
    }

    /// Replace the threshold, returning the previous one.
    pub fn set(&self, threshold: usize) -> usize {
        let _guard = self.write_lock.lock();
        let old = self.threshold.load(Ordering::Relaxed);
        self.threshold.store(threshold, Ordering::Relaxed);
        old
    }

    #[inline]
    pub fn get(&self) -> usize {
        self.threshold.load(Ordering::Relaxed)
    }

    /// Whether a logger operating at `level` may write info lines.
    #[inline]
    pub fn enabled(&self, level: usize) -> bool {
        self.get() >= level
    }
}

impl Default for VerbosityGate {
    fn default() -> Self {
        Self::new(0)
    }
}

static GLOBAL_VERBOSITY: VerbosityGate = VerbosityGate::new(0);

/// The gate every [`Logger`](super::logger::Logger) consults.
pub fn global() -> &'static VerbosityGate {
    &GLOBAL_VERBOSITY
}

/// Set the global level against which all info lines are compared.
///
/// A line is written when this is greater than or equal to the logger's
/// `v` level. Returns the previous threshold so callers can restore it.
/// Safe to call from any number of threads.
pub fn set_verbosity(threshold: usize) -> usize {
    GLOBAL_VERBOSITY.set(threshold)
}

/// Current global threshold.
pub fn verbosity() -> usize {
    GLOBAL_VERBOSITY.get()
}

/// Whether info lines at `level` pass the global threshold.
#[inline]
pub fn enabled(level: usize) -> bool {
    GLOBAL_VERBOSITY.enabled(level)
}
