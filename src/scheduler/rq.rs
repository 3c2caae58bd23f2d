/*!
 * Per-Processor Run Queue Context
 * Explicit per-CPU state handed to every scheduling class operation
 */

use crate::core::types::{CpuId, Nanos, TaskId};
use crate::process::TaskTable;
use crate::ras::RasRunQueue;
use tracing::trace;

/// Host run queue of one processor
#[derive(Debug)]
pub struct Rq {
    cpu: CpuId,
    clock_task: Nanos,
    curr: Option<TaskId>,
    idle: Option<TaskId>,
    nr_running: usize,
    ras: RasRunQueue,
}

impl Rq {
    pub fn new(cpu: CpuId) -> Self {
        Self {
            cpu,
            clock_task: 0,
            curr: None,
            idle: None,
            nr_running: 0,
            ras: RasRunQueue::new(),
        }
    }

    #[inline(always)]
    pub fn cpu(&self) -> CpuId {
        self.cpu
    }

    /// Task clock in nanoseconds
    #[inline(always)]
    pub fn clock_task(&self) -> Nanos {
        self.clock_task
    }

    /// Advance the task clock; it never moves backwards
    pub fn update_clock(&mut self, now: Nanos) {
        if now < self.clock_task {
            trace!(cpu = self.cpu, now, clock = self.clock_task, "ignoring clock regression");
            return;
        }
        self.clock_task = now;
    }

    #[inline(always)]
    pub fn curr(&self) -> Option<TaskId> {
        self.curr
    }

    pub fn set_curr(&mut self, curr: Option<TaskId>) {
        self.curr = curr;
    }

    #[inline(always)]
    pub fn idle(&self) -> Option<TaskId> {
        self.idle
    }

    pub fn set_idle(&mut self, idle: TaskId) {
        self.idle = Some(idle);
    }

    /// Runnable tasks across all classes
    #[inline(always)]
    pub fn nr_running(&self) -> usize {
        self.nr_running
    }

    pub fn inc_nr_running(&mut self) {
        self.nr_running += 1;
    }

    pub fn dec_nr_running(&mut self) {
        self.nr_running = self.nr_running.saturating_sub(1);
    }

    #[inline(always)]
    pub fn ras(&self) -> &RasRunQueue {
        &self.ras
    }

    #[inline(always)]
    pub fn ras_mut(&mut self) -> &mut RasRunQueue {
        &mut self.ras
    }

    /// Ask the host to reconsider the current task
    pub fn resched_curr(&self, tasks: &mut TaskTable) {
        if let Some(task) = self.curr.and_then(|curr| tasks.get_mut(curr).ok()) {
            task.set_need_resched();
        }
    }
}
