//! Coalescing of rapid viewport changes
//!
//! The debouncer holds at most one pending viewport. Each new request replaces
//! the pending one and restarts its delay; discrete events bypass the delay.
//! Time is passed in by the caller, so the state machine never sleeps.

use std::time::{Duration, Instant};

use crate::layout::BoundingBox;

#[derive(Debug, Clone, Copy)]
struct Pending {
    viewport: BoundingBox,
    deadline: Instant,
}

/// Single-slot debounce timer for viewport queries
#[derive(Debug, Clone)]
pub struct ViewportDebouncer {
    delay: Duration,
    pending: Option<Pending>,
}

impl ViewportDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Queue a viewport, cancelling any request still waiting
    pub fn request(&mut self, viewport: BoundingBox, now: Instant) {
        self.pending = Some(Pending {
            viewport,
            deadline: now + self.delay,
        });
    }

    /// Drop any pending request and hand the viewport straight back
    pub fn request_immediate(&mut self, viewport: BoundingBox) -> BoundingBox {
        self.pending = None;
        viewport
    }

    /// Release the pending viewport once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<BoundingBox> {
        match self.pending {
            Some(pending) if now >= pending.deadline => {
                self.pending = None;
                Some(pending.viewport)
            }
            _ => None,
        }
    }

    /// Cancel the pending request; returns whether there was one
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending request becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }
}
