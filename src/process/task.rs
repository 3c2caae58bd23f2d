/*!
 * Task Types
 * Host-owned task record carrying the per-policy scheduling entity
 */

use crate::core::types::{Nanos, Pid, Policy, Priority, Weight};
use crate::ras::RasEntity;
use serde::{Deserialize, Serialize};

/// Execution statistics maintained by the runtime accountant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecStats {
    /// Task clock at which the current run started
    pub exec_start: Nanos,
    /// Total time spent running
    pub sum_exec_runtime: Nanos,
    /// Longest single run observed
    pub exec_max: Nanos,
}

/// A schedulable task
#[derive(Debug, Clone)]
pub struct Task {
    pub pid: Pid,
    pub prio: Priority,
    pub policy: Policy,
    /// Current weight statistic, updated by the host at any time
    pub wcounts: Weight,
    /// Weight last folded into the run queue's aggregate sum
    pub prev_wcounts: Weight,
    pub se: ExecStats,
    pub ras: RasEntity,
    need_resched: bool,
}

impl Task {
    pub fn new(pid: Pid, prio: Priority, policy: Policy, wcounts: Weight) -> Self {
        Self {
            pid,
            prio,
            policy,
            wcounts,
            prev_wcounts: wcounts,
            se: ExecStats::default(),
            ras: RasEntity::new(),
            need_resched: false,
        }
    }

    /// Shorthand for a task under the RAS policy
    pub fn ras(pid: Pid, prio: Priority, wcounts: Weight) -> Self {
        Self::new(pid, prio, Policy::Ras, wcounts)
    }

    #[inline(always)]
    pub fn need_resched(&self) -> bool {
        self.need_resched
    }

    #[inline]
    pub fn set_need_resched(&mut self) {
        self.need_resched = true;
    }

    #[inline]
    pub fn clear_need_resched(&mut self) {
        self.need_resched = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_snapshots_weight() {
        let task = Task::ras(7, 120, 42);
        assert_eq!(task.prev_wcounts, 42);
        assert_eq!(task.policy, Policy::Ras);
        assert!(!task.ras.on_rq());
        assert!(!task.need_resched());
    }

    #[test]
    fn test_resched_flag() {
        let mut task = Task::ras(1, 0, 0);
        task.set_need_resched();
        assert!(task.need_resched());
        task.clear_need_resched();
        assert!(!task.need_resched());
    }
}
