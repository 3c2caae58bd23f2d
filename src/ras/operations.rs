/*!
 * RAS Dispatcher Operations
 * Enqueue, dequeue, pick, rotate, and tick handling for the RAS class
 */

use super::RasScheduler;
use crate::core::errors::{SchedResult, SchedulerError};
use crate::core::limits::RR_INTERVAL_INVALID;
use crate::core::types::{Place, Policy, Priority, TaskId};
use crate::process::TaskTable;
use crate::scheduler::{Rq, SchedClass};
use tracing::{debug, info, trace, warn};

impl RasScheduler {
    /// Move a linked task to the head or tail without touching counts or weights
    ///
    /// Unlinked tasks are left alone.
    pub fn requeue_task(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        task: TaskId,
        place: Place,
    ) -> SchedResult<()> {
        tasks.get(task)?;
        let moved = match place {
            Place::Head => rq.ras_mut().move_to_front(tasks, task)?,
            Place::Tail => rq.ras_mut().move_to_back(tasks, task)?,
        };
        if moved {
            self.stats.inc_requeues();
            trace!(task = %task, ?place, "requeued");
        }
        Ok(())
    }

    /// Recompute the slice of `task`, keeping the prior one if rejected
    fn refresh_slice(&self, rq: &Rq, tasks: &mut TaskTable, task: TaskId) -> SchedResult<()> {
        let entry = tasks.get_mut(task)?;
        match self.timeslice(rq.ras(), entry) {
            Ok(slice) => {
                entry.ras.grant(slice);
                debug!(pid = entry.pid, slice, "new time slice");
            }
            Err(err) => {
                self.stats.inc_rejected_slices();
                entry.ras.retain(self.config.min_slice);
                warn!(
                    pid = entry.pid,
                    error = %err,
                    kept = entry.ras.time_slice(),
                    "time slice rejected, keeping previous value"
                );
            }
        }
        Ok(())
    }
}

impl SchedClass for RasScheduler {
    fn policy(&self) -> Policy {
        Policy::Ras
    }

    fn enqueue_task(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        task: TaskId,
        place: Place,
    ) -> SchedResult<()> {
        let relink = rq.ras_mut().unlink(tasks, task)?;
        match place {
            Place::Head => rq.ras_mut().push_front(tasks, task)?,
            Place::Tail => rq.ras_mut().push_back(tasks, task)?,
        }

        // Counts and weight follow the unlinked -> linked transition only
        if !relink {
            let entry = tasks.get_mut(task)?;
            entry.prev_wcounts = entry.wcounts;
            let contribution = entry.prev_wcounts;
            rq.ras_mut().add_weight(contribution);
            rq.ras_mut().inc_nr_running();
            rq.inc_nr_running();
        }

        self.refresh_slice(rq, tasks, task)?;
        self.stats.inc_enqueues();
        trace!(
            task = %task,
            relink,
            nr_running = rq.ras().nr_running(),
            total_wcounts = rq.ras().total_wcounts(),
            "enqueued"
        );
        Ok(())
    }

    fn dequeue_task(&self, rq: &mut Rq, tasks: &mut TaskTable, task: TaskId) -> SchedResult<()> {
        tasks.get(task)?;
        self.accountant.update_curr(rq, tasks);

        if rq.ras_mut().unlink(tasks, task)? {
            let contribution = tasks.get(task)?.prev_wcounts;
            rq.ras_mut().sub_weight(contribution);
            rq.ras_mut().dec_nr_running();
            rq.dec_nr_running();
            self.stats.inc_dequeues();
            trace!(task = %task, nr_running = rq.ras().nr_running(), "dequeued");
        }
        Ok(())
    }

    fn yield_task(&self, rq: &mut Rq, tasks: &mut TaskTable) -> SchedResult<()> {
        let curr = rq.curr().ok_or(SchedulerError::NoCurrentTask(rq.cpu()))?;
        self.requeue_task(rq, tasks, curr, Place::Tail)?;
        self.stats.inc_yields();
        debug!(task = %curr, "yielded");
        Ok(())
    }

    fn check_preempt_curr(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        task: TaskId,
    ) -> SchedResult<()> {
        let candidate = tasks.get(task)?;
        let Some(curr) = rq.curr() else {
            return Ok(());
        };
        let current = tasks.get(curr)?;

        if candidate.prio < current.prio {
            info!(
                pid = candidate.pid,
                prio = candidate.prio,
                curr_pid = current.pid,
                curr_prio = current.prio,
                "preempting current task"
            );
            rq.resched_curr(tasks);
            self.stats.inc_preemptions();
        }
        Ok(())
    }

    fn pick_next_task(&self, rq: &mut Rq, tasks: &mut TaskTable) -> Option<TaskId> {
        if rq.ras().is_empty() {
            return None;
        }
        let next = rq.ras().first()?;
        let now = rq.clock_task();
        match tasks.get_mut(next) {
            Ok(task) => task.se.exec_start = now,
            Err(err) => {
                warn!(task = %next, error = %err, "stale handle at queue head");
                return None;
            }
        }
        self.stats.inc_picks();
        Some(next)
    }

    fn put_prev_task(&self, rq: &mut Rq, tasks: &mut TaskTable, task: TaskId) -> SchedResult<()> {
        tasks.get(task)?;
        self.accountant.update_curr(rq, tasks);
        Ok(())
    }

    fn set_curr_task(&self, rq: &mut Rq, tasks: &mut TaskTable) -> SchedResult<()> {
        if let Some(curr) = rq.curr() {
            tasks.get_mut(curr)?.se.exec_start = rq.clock_task();
        }
        Ok(())
    }

    fn task_tick(&self, rq: &mut Rq, tasks: &mut TaskTable, task: TaskId) -> SchedResult<()> {
        self.accountant.update_curr(rq, tasks);
        self.stats.inc_ticks();

        let entry = tasks.get_mut(task)?;
        entry.ras.time_slice = entry.ras.time_slice.saturating_sub(1);
        if entry.ras.time_slice > 0 {
            trace!(pid = entry.pid, remaining = entry.ras.time_slice, "tick");
            entry.clear_need_resched();
            return Ok(());
        }

        if entry.ras.on_rq() && entry.wcounts != entry.prev_wcounts {
            rq.ras_mut().reconcile_weight(entry.prev_wcounts, entry.wcounts);
            debug!(
                pid = entry.pid,
                old = entry.prev_wcounts,
                new = entry.wcounts,
                "weight reconciled"
            );
            entry.prev_wcounts = entry.wcounts;
        }

        self.refresh_slice(rq, tasks, task)?;

        let entry = tasks.get_mut(task)?;
        entry.set_need_resched();
        if entry.ras.has_neighbours() {
            rq.ras_mut().move_to_back(tasks, task)?;
            self.stats.inc_rotations();
            trace!(task = %task, "slice exhausted, rotated to tail");
        }
        Ok(())
    }

    fn switched_to(&self, _rq: &mut Rq, _tasks: &mut TaskTable, task: TaskId) {
        trace!(task = %task, "switched to");
    }

    fn prio_changed(&self, _rq: &mut Rq, tasks: &mut TaskTable, task: TaskId, old_prio: Priority) {
        if let Ok(entry) = tasks.get(task) {
            trace!(pid = entry.pid, old_prio, prio = entry.prio, "priority changed");
        }
    }

    fn get_rr_interval(&self, rq: Option<&Rq>, tasks: &TaskTable, task: Option<TaskId>) -> u32 {
        let (Some(rq), Some(task)) = (rq, task) else {
            warn!("rr interval requested without run queue or task");
            return RR_INTERVAL_INVALID;
        };
        let entry = match tasks.get(task) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "rr interval for unknown task");
                return RR_INTERVAL_INVALID;
            }
        };
        self.timeslice(rq.ras(), entry).unwrap_or_else(|err| {
            debug!(pid = entry.pid, error = %err, "rr interval out of range");
            RR_INTERVAL_INVALID
        })
    }
}
