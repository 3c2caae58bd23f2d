/*!
 * RAS Statistics
 * Serializable snapshot of policy counters
 */

use super::RasScheduler;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasStats {
    pub enqueues: u64,
    pub dequeues: u64,
    pub picks: u64,
    pub requeues: u64,
    pub rotations: u64,
    pub yields: u64,
    pub preemptions: u64,
    pub ticks: u64,
    pub rejected_slices: u64,
}

impl RasScheduler {
    /// Get policy statistics (lock-free snapshot)
    pub fn stats(&self) -> RasStats {
        self.stats.snapshot()
    }
}
