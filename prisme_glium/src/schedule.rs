use super::*;

use std::time::Instant;

/// Coalesces bursts of redraw requests into a single one, fired once
/// `delay` has passed since the latest request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedrawScheduler {
    delay: Duration,
    pending: Option<Instant>,
}

impl RedrawScheduler {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(25);

    #[inline]
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Request a redraw, superseding any pending one.
    #[inline]
    pub fn schedule(&mut self, now: Instant) {
        self.pending = Some(now + self.delay);
    }

    #[inline]
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// When the pending redraw is due, if there is one.
    #[inline]
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// Returns `true`, at most once per request, when the pending redraw is due.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if deadline <= now => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}
