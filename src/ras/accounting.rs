/*!
 * Runtime Accountant
 * Charges elapsed execution time to the running task and its run queue
 */

use crate::core::types::{Nanos, Policy};
use crate::process::TaskTable;
use crate::scheduler::{Rq, RuntimeCharge};
use std::sync::Arc;
use tracing::trace;

pub struct RuntimeAccountant {
    charge: Arc<dyn RuntimeCharge>,
}

impl RuntimeAccountant {
    pub fn new(charge: Arc<dyn RuntimeCharge>) -> Self {
        Self { charge }
    }

    /// Account the current task's run since its last `exec_start`
    ///
    /// Does nothing unless the processor is running a RAS task. Returns the
    /// charged delta.
    pub fn update_curr(&self, rq: &Rq, tasks: &mut TaskTable) -> Option<Nanos> {
        let curr_id = rq.curr()?;
        let curr = tasks.get_mut(curr_id).ok()?;
        if curr.policy != Policy::Ras {
            return None;
        }

        let now = rq.clock_task();
        let delta = now.saturating_sub(curr.se.exec_start);

        curr.se.exec_max = curr.se.exec_max.max(delta);
        curr.se.sum_exec_runtime += delta;
        curr.se.exec_start = now;
        let pid = curr.pid;

        self.charge.charge_group(pid, delta);
        self.charge.charge_cpuacct(pid, delta);

        rq.ras().charge_runtime(delta);
        trace!(pid, delta, "runtime charged");
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TaskId;
    use crate::process::Task;
    use crate::scheduler::traits::MockRuntimeCharge;
    use crate::scheduler::NoopCharge;
    use mockall::predicate::eq;

    fn running(tasks: &mut TaskTable, task: Task, exec_start: Nanos) -> (Rq, TaskId) {
        let id = tasks.insert(task).unwrap();
        tasks.get_mut(id).unwrap().se.exec_start = exec_start;
        let mut rq = Rq::new(0);
        rq.set_curr(Some(id));
        (rq, id)
    }

    #[test]
    fn test_charges_delta_to_task_and_queue() {
        let mut tasks = TaskTable::new();
        let (mut rq, id) = running(&mut tasks, Task::ras(5, 0, 1), 1_000);
        rq.update_clock(4_000);

        let mut charge = MockRuntimeCharge::new();
        charge
            .expect_charge_group()
            .with(eq(5), eq(3_000))
            .times(1)
            .return_const(());
        charge
            .expect_charge_cpuacct()
            .with(eq(5), eq(3_000))
            .times(1)
            .return_const(());

        let accountant = RuntimeAccountant::new(Arc::new(charge));
        assert_eq!(accountant.update_curr(&rq, &mut tasks), Some(3_000));

        let se = tasks.get(id).unwrap().se;
        assert_eq!(se.sum_exec_runtime, 3_000);
        assert_eq!(se.exec_max, 3_000);
        assert_eq!(se.exec_start, 4_000);
        assert_eq!(rq.ras().runtime(), 3_000);
    }

    #[test]
    fn test_negative_delta_clamped() {
        let mut tasks = TaskTable::new();
        let (mut rq, id) = running(&mut tasks, Task::ras(5, 0, 1), 9_000);
        rq.update_clock(2_000);

        let accountant = RuntimeAccountant::new(Arc::new(NoopCharge));
        assert_eq!(accountant.update_curr(&rq, &mut tasks), Some(0));
        assert_eq!(tasks.get(id).unwrap().se.exec_start, 2_000);
        assert_eq!(rq.ras().runtime(), 0);
    }

    #[test]
    fn test_exec_max_tracks_longest_run() {
        let mut tasks = TaskTable::new();
        let (mut rq, id) = running(&mut tasks, Task::ras(5, 0, 1), 0);
        let accountant = RuntimeAccountant::new(Arc::new(NoopCharge));

        rq.update_clock(500);
        accountant.update_curr(&rq, &mut tasks);
        rq.update_clock(600);
        accountant.update_curr(&rq, &mut tasks);

        let se = tasks.get(id).unwrap().se;
        assert_eq!(se.exec_max, 500);
        assert_eq!(se.sum_exec_runtime, 600);
    }

    #[test]
    fn test_foreign_policy_not_charged() {
        let mut tasks = TaskTable::new();
        let idle = Task::new(0, 0, Policy::Idle, 0);
        let (mut rq, _) = running(&mut tasks, idle, 0);
        rq.update_clock(1_000);

        let mut charge = MockRuntimeCharge::new();
        charge.expect_charge_group().never();
        charge.expect_charge_cpuacct().never();

        let accountant = RuntimeAccountant::new(Arc::new(charge));
        assert_eq!(accountant.update_curr(&rq, &mut tasks), None);
        assert_eq!(rq.ras().runtime(), 0);
    }
}
