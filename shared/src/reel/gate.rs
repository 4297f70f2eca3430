use std::cell::Cell;

use crate::reel::error::ReelError;

/// Remaining attempts plus the in-flight flag. Lives on the UI thread, so
/// plain `Cell`s are enough.
#[derive(Debug, Default)]
pub struct AttemptGate {
    remaining: Cell<u32>,
    in_progress: Cell<bool>,
}

impl AttemptGate {
    pub fn new(remaining: u32) -> Self {
        Self {
            remaining: Cell::new(remaining),
            in_progress: Cell::new(false),
        }
    }

    pub fn authorize(&self) -> bool {
        self.remaining.get() > 0 && !self.in_progress.get()
    }

    /// Opens a spin. The returned guard closes it again when dropped.
    pub fn try_begin(&self) -> Result<SpinGuard<'_>, ReelError> {
        if self.in_progress.get() {
            return Err(ReelError::SpinInProgress);
        }
        if self.remaining.get() == 0 {
            return Err(ReelError::NoAttemptsLeft);
        }
        self.in_progress.set(true);
        Ok(SpinGuard { gate: self })
    }

    /// Local decrement after a successful spin.
    pub fn consume(&self) {
        self.remaining.set(self.remaining.get().saturating_sub(1));
    }

    /// The outcome source's count always wins over the local one.
    pub fn refresh(&self, remaining: u32) {
        if remaining != self.remaining.get() {
            log::debug!(
                "attempt counter refreshed from {} to {}",
                self.remaining.get(),
                remaining
            );
        }
        self.remaining.set(remaining);
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.get()
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress.get()
    }
}

#[derive(Debug)]
pub struct SpinGuard<'a> {
    gate: &'a AttemptGate,
}

impl Drop for SpinGuard<'_> {
    fn drop(&mut self) {
        self.gate.in_progress.set(false);
    }
}
