/*!
 * Scheduler Traits
 * Interface definitions between the host scheduler and its policies
 */

use super::rq::Rq;
use crate::core::errors::SchedResult;
use crate::core::types::{Nanos, Pid, Place, Policy, Priority, TaskId};
use crate::process::TaskTable;

/// Policy interface consumed by the host scheduler
///
/// Every method runs with the host holding the per-processor scheduling lock,
/// expressed here as exclusive borrows of the run queue and the task table.
/// Implementations must not block.
pub trait SchedClass: Send + Sync {
    /// Policy this class serves
    fn policy(&self) -> Policy;

    fn name(&self) -> &'static str {
        self.policy().as_str()
    }

    /// Make a task runnable under this class
    fn enqueue_task(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        task: TaskId,
        place: Place,
    ) -> SchedResult<()>;

    /// Remove a task from this class's run queue
    fn dequeue_task(&self, rq: &mut Rq, tasks: &mut TaskTable, task: TaskId) -> SchedResult<()>;

    /// Current task gives up the processor voluntarily
    fn yield_task(&self, rq: &mut Rq, tasks: &mut TaskTable) -> SchedResult<()>;

    /// A task of this class became runnable; decide whether the current one yields to it
    fn check_preempt_curr(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        task: TaskId,
    ) -> SchedResult<()>;

    /// Choose the next task to run, or `None` to defer to the next class
    fn pick_next_task(&self, rq: &mut Rq, tasks: &mut TaskTable) -> Option<TaskId>;

    /// The task that was running is being switched out
    fn put_prev_task(&self, rq: &mut Rq, tasks: &mut TaskTable, task: TaskId) -> SchedResult<()>;

    /// The current task changed its class or was installed directly
    fn set_curr_task(&self, rq: &mut Rq, tasks: &mut TaskTable) -> SchedResult<()>;

    /// Periodic tick for the running task
    fn task_tick(&self, rq: &mut Rq, tasks: &mut TaskTable, task: TaskId) -> SchedResult<()>;

    /// Round-robin interval of a task in ticks, or
    /// [`RR_INTERVAL_INVALID`](crate::core::limits::RR_INTERVAL_INVALID)
    fn get_rr_interval(&self, rq: Option<&Rq>, tasks: &TaskTable, task: Option<TaskId>) -> u32;

    fn switched_to(&self, _rq: &mut Rq, _tasks: &mut TaskTable, _task: TaskId) {}

    fn prio_changed(
        &self,
        _rq: &mut Rq,
        _tasks: &mut TaskTable,
        _task: TaskId,
        _old_prio: Priority,
    ) {
    }
}

/// External accounting collaborators charged with every runtime delta
#[cfg_attr(test, mockall::automock)]
pub trait RuntimeCharge: Send + Sync {
    /// Thread-group cumulative runtime
    fn charge_group(&self, pid: Pid, delta: Nanos);

    /// CPU accounting controller
    fn charge_cpuacct(&self, pid: Pid, delta: Nanos);
}

/// Accounting sink for hosts without accounting subsystems
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCharge;

impl RuntimeCharge for NoopCharge {
    #[inline(always)]
    fn charge_group(&self, _pid: Pid, _delta: Nanos) {}

    #[inline(always)]
    fn charge_cpuacct(&self, _pid: Pid, _delta: Nanos) {}
}
