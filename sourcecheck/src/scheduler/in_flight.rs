//! In-flight probe accounting.
//!
//! - Counts probes between dispatch and terminal resolution.
//! - Records the peak so runs can be checked against the concurrency bound.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Tracker shared by every probe task of one run.
#[derive(Clone, Debug, Default)]
pub struct InFlightTracker {
    inner: Arc<InFlightInner>,
}

#[derive(Debug, Default)]
struct InFlightInner {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlightTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return current in-flight probe count.
    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Return the highest in-flight count observed so far.
    pub fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }

    /// Mark one probe as dispatched. The slot is released when the guard drops.
    pub fn begin(&self) -> InFlightGuard {
        let now = self.inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard {
            tracker: self.clone(),
        }
    }

    fn finish(&self) {
        self.inner.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Releases exactly one in-flight slot on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    tracker: InFlightTracker,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.tracker.finish();
    }
}
