/*!
 * Lock-Free RAS Statistics
 * Uses atomic counters for zero-contention stats tracking in hot scheduling paths
 */

use super::stats::RasStats;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic policy counters
///
/// # Performance
/// - Cache-line aligned to prevent false sharing
/// - All operations use relaxed ordering; readers only need eventual values
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct AtomicRasStats {
    enqueues: AtomicU64,
    dequeues: AtomicU64,
    picks: AtomicU64,
    requeues: AtomicU64,
    rotations: AtomicU64,
    yields: AtomicU64,
    preemptions: AtomicU64,
    ticks: AtomicU64,
    rejected_slices: AtomicU64,
}

impl AtomicRasStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn inc_enqueues(&self) {
        self.enqueues.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_dequeues(&self) {
        self.dequeues.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_picks(&self) {
        self.picks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_requeues(&self) {
        self.requeues.fetch_add(1, Ordering::Relaxed);
    }

    /// Tick-driven rotation to the tail
    #[inline(always)]
    pub fn inc_rotations(&self) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_yields(&self) {
        self.yields.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_preemptions(&self) {
        self.preemptions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_ticks(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_rejected_slices(&self) {
        self.rejected_slices.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of all counters
    ///
    /// # Note
    /// Counters are loaded one by one and may be mutually inconsistent under
    /// concurrent updates. Acceptable for monitoring.
    pub fn snapshot(&self) -> RasStats {
        RasStats {
            enqueues: self.enqueues.load(Ordering::Relaxed),
            dequeues: self.dequeues.load(Ordering::Relaxed),
            picks: self.picks.load(Ordering::Relaxed),
            requeues: self.requeues.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            yields: self.yields.load(Ordering::Relaxed),
            preemptions: self.preemptions.load(Ordering::Relaxed),
            ticks: self.ticks.load(Ordering::Relaxed),
            rejected_slices: self.rejected_slices.load(Ordering::Relaxed),
        }
    }
}
