/*!
 * RAS Scheduling Entity
 * Per-task queue linkage and time-slice state
 */

use crate::core::types::TaskId;

/// Neighbour handles of a linked entity; `None` marks the queue ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link {
    pub prev: Option<TaskId>,
    pub next: Option<TaskId>,
}

/// Scheduling entity embedded in every [`Task`](crate::process::Task)
#[derive(Debug, Clone, Default)]
pub struct RasEntity {
    pub(crate) link: Option<Link>,
    pub(crate) time_slice: u32,
    quantum: u32,
}

impl RasEntity {
    pub const fn new() -> Self {
        Self {
            link: None,
            time_slice: 0,
            quantum: 0,
        }
    }

    /// Whether the entity is linked into a run queue
    #[inline(always)]
    pub fn on_rq(&self) -> bool {
        self.link.is_some()
    }

    /// Ticks left before the slice is exhausted
    #[inline(always)]
    pub fn time_slice(&self) -> u32 {
        self.time_slice
    }

    /// Last slice granted after validation (0 if never granted)
    #[inline(always)]
    pub fn quantum(&self) -> u32 {
        self.quantum
    }

    /// True when at least one other entity shares the queue
    #[inline]
    pub(crate) fn has_neighbours(&self) -> bool {
        matches!(self.link, Some(link) if link.prev != link.next)
    }

    pub(crate) fn grant(&mut self, slice: u32) {
        self.time_slice = slice;
        self.quantum = slice;
    }

    /// Keep the current slice after a rejected recomputation
    ///
    /// An exhausted or never-granted slice is refilled from the last granted
    /// quantum, or from `fallback` when nothing was ever granted.
    pub(crate) fn retain(&mut self, fallback: u32) {
        if self.time_slice == 0 {
            let slice = if self.quantum > 0 { self.quantum } else { fallback };
            self.grant(slice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retain_keeps_live_slice() {
        let mut se = RasEntity::new();
        se.grant(6);
        se.time_slice = 3;
        se.retain(1);
        assert_eq!(se.time_slice(), 3);
        assert_eq!(se.quantum(), 6);
    }

    #[test]
    fn test_retain_refills_exhausted_slice() {
        let mut se = RasEntity::new();
        se.grant(6);
        se.time_slice = 0;
        se.retain(1);
        assert_eq!(se.time_slice(), 6);
    }

    #[test]
    fn test_retain_never_granted_uses_fallback() {
        let mut se = RasEntity::new();
        se.retain(2);
        assert_eq!(se.time_slice(), 2);
        assert_eq!(se.quantum(), 2);
    }

    #[test]
    fn test_unlinked_has_no_neighbours() {
        assert!(!RasEntity::new().has_neighbours());
    }
}
