//! Lightweight per-pool counters.
//!
//! Keep this cheap: every checkout and return touches it. Downstream can
//! export a [`StatsSnapshot`] to whatever metrics system it uses.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

#[derive(Default)]
pub(crate) struct PoolStats {
    created: AtomicUsize,
    reused: AtomicUsize,
    returned: AtomicUsize,
    discarded: AtomicUsize,
    peak_stored: AtomicUsize,
}

impl PoolStats {
    pub(crate) fn record_create(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_reuse(&self) {
        self.reused.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a value accepted back into the idle store; `stored` is the
    /// idle count right after the push.
    pub(crate) fn record_return(&self, stored: usize) {
        self.returned.fetch_add(1, Ordering::Relaxed);

        let mut cur = self.peak_stored.load(Ordering::Relaxed);
        while stored > cur {
            match self.peak_stored.compare_exchange(
                cur,
                stored,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => cur = observed,
            }
        }
    }

    pub(crate) fn record_discard(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            peak_stored: self.peak_stored.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a pool's counters (advisory; not a correctness API).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Values built by the factory because no idle value was available.
    pub created: usize,
    /// Checkouts served from the idle store.
    pub reused: usize,
    /// Releases that put the value back into the idle store.
    pub returned: usize,
    /// Releases dropped because the pool was at capacity.
    pub discarded: usize,
    /// Highest idle count observed.
    pub peak_stored: usize,
}

impl StatsSnapshot {
    /// Total checkouts, whether served from the store or freshly built.
    pub fn checkouts(&self) -> usize {
        self.created + self.reused
    }
}
