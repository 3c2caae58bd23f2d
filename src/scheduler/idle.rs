/*!
 * Idle Class
 * Lowest class in the chain; always yields the per-processor idle task
 */

use super::rq::Rq;
use super::traits::SchedClass;
use crate::core::errors::SchedResult;
use crate::core::types::{Place, Policy, TaskId};
use crate::process::TaskTable;
use tracing::trace;

/// Fallback class. The idle task is never queued, it is just there.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleClass;

impl SchedClass for IdleClass {
    fn policy(&self) -> Policy {
        Policy::Idle
    }

    fn enqueue_task(
        &self,
        _rq: &mut Rq,
        tasks: &mut TaskTable,
        task: TaskId,
        _place: Place,
    ) -> SchedResult<()> {
        tasks.get(task)?;
        trace!(task = %task, "idle task enqueue ignored");
        Ok(())
    }

    fn dequeue_task(&self, _rq: &mut Rq, tasks: &mut TaskTable, task: TaskId) -> SchedResult<()> {
        tasks.get(task)?;
        Ok(())
    }

    fn yield_task(&self, _rq: &mut Rq, _tasks: &mut TaskTable) -> SchedResult<()> {
        Ok(())
    }

    fn check_preempt_curr(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        _task: TaskId,
    ) -> SchedResult<()> {
        // Anything runnable beats idle
        rq.resched_curr(tasks);
        Ok(())
    }

    fn pick_next_task(&self, rq: &mut Rq, tasks: &mut TaskTable) -> Option<TaskId> {
        let idle = rq.idle()?;
        tasks.get_mut(idle).ok()?.se.exec_start = rq.clock_task();
        Some(idle)
    }

    fn put_prev_task(&self, _rq: &mut Rq, tasks: &mut TaskTable, task: TaskId) -> SchedResult<()> {
        tasks.get(task)?;
        Ok(())
    }

    fn set_curr_task(&self, _rq: &mut Rq, _tasks: &mut TaskTable) -> SchedResult<()> {
        Ok(())
    }

    fn task_tick(&self, _rq: &mut Rq, _tasks: &mut TaskTable, _task: TaskId) -> SchedResult<()> {
        Ok(())
    }

    fn get_rr_interval(&self, _rq: Option<&Rq>, _tasks: &TaskTable, _task: Option<TaskId>) -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Task;

    #[test]
    fn test_pick_returns_idle_task() {
        let mut tasks = TaskTable::new();
        let mut rq = Rq::new(0);
        assert_eq!(IdleClass.pick_next_task(&mut rq, &mut tasks), None);

        let idle = tasks.insert(Task::new(0, i32::MAX, Policy::Idle, 0)).unwrap();
        rq.set_idle(idle);
        rq.update_clock(10);
        assert_eq!(IdleClass.pick_next_task(&mut rq, &mut tasks), Some(idle));
        assert_eq!(tasks.get(idle).unwrap().se.exec_start, 10);
    }
}
