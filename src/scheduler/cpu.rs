/*!
 * CPU Scheduler
 * Single-processor host driving the policy chain
 */

use super::chain::PolicyChain;
use super::rq::Rq;
use super::traits::SchedClass;
use crate::core::errors::{SchedResult, SchedulerError};
use crate::core::limits::{IDLE_PID, IDLE_PRIORITY, RR_INTERVAL_INVALID};
use crate::core::types::{CpuId, Nanos, Pid, Place, Policy, Priority, TaskId, Weight};
use crate::process::{Task, TaskTable};
use std::sync::Arc;
use tracing::{debug, info};

/// Owns one processor's run queue and task table
///
/// Holding `&mut CpuScheduler` stands in for the per-processor scheduling
/// lock: every class operation receives exclusive access to both.
#[derive(Debug)]
pub struct CpuScheduler {
    rq: Rq,
    tasks: TaskTable,
    chain: PolicyChain,
    context_switches: u64,
}

impl CpuScheduler {
    /// Create a processor with its idle task installed as current
    pub fn new(cpu: CpuId, chain: PolicyChain) -> SchedResult<Self> {
        chain.class_for(Policy::Idle)?;

        let mut tasks = TaskTable::new();
        let idle = tasks.insert(Task::new(IDLE_PID, IDLE_PRIORITY, Policy::Idle, 0))?;
        let mut rq = Rq::new(cpu);
        rq.set_idle(idle);
        rq.set_curr(Some(idle));

        info!(cpu, classes = ?chain, "cpu scheduler online");
        Ok(Self {
            rq,
            tasks,
            chain,
            context_switches: 0,
        })
    }

    /// Create and wake a RAS task
    pub fn spawn(&mut self, pid: Pid, prio: Priority, wcounts: Weight) -> SchedResult<TaskId> {
        self.spawn_task(Task::ras(pid, prio, wcounts))
    }

    /// Insert an arbitrary task and wake it under its own policy
    pub fn spawn_task(&mut self, task: Task) -> SchedResult<TaskId> {
        self.chain.class_for(task.policy)?;
        let pid = task.pid;
        let id = self.tasks.insert(task)?;
        self.wake_up(id)?;
        debug!(pid, task = %id, "spawned");
        Ok(id)
    }

    /// Make a task runnable and check whether it should preempt the current one
    pub fn wake_up(&mut self, id: TaskId) -> SchedResult<()> {
        let class = self.class_of(id)?;
        class.enqueue_task(&mut self.rq, &mut self.tasks, id, Place::Tail)?;

        let Some(curr) = self.rq.curr() else {
            return Ok(());
        };
        if curr == id {
            return Ok(());
        }

        let woken = class.policy();
        let running = self.tasks.get(curr)?.policy;
        if woken == running {
            class.check_preempt_curr(&mut self.rq, &mut self.tasks, id)?;
        } else if self.chain.rank(woken) < self.chain.rank(running) {
            self.rq.resched_curr(&mut self.tasks);
        }
        Ok(())
    }

    /// Block a task; it stays in the table but leaves its run queue
    ///
    /// A blocked current task gives up the processor immediately.
    pub fn sleep(&mut self, id: TaskId) -> SchedResult<()> {
        let class = self.class_of(id)?;
        class.dequeue_task(&mut self.rq, &mut self.tasks, id)?;
        if self.rq.curr() == Some(id) {
            self.schedule()?;
        }
        Ok(())
    }

    /// Remove a task for good
    pub fn exit(&mut self, id: TaskId) -> SchedResult<Task> {
        if self.rq.idle() == Some(id) {
            return Err(SchedulerError::IdleExit(self.rq.cpu()));
        }
        let class = self.class_of(id)?;
        if self.rq.curr() == Some(id) {
            class.put_prev_task(&mut self.rq, &mut self.tasks, id)?;
            self.rq.set_curr(None);
        }
        class.dequeue_task(&mut self.rq, &mut self.tasks, id)?;
        let task = self.tasks.remove(id)?;
        debug!(pid = task.pid, runtime = task.se.sum_exec_runtime, "exited");
        Ok(task)
    }

    /// Update a task's weight statistic; the run queue picks it up on slice exhaustion
    pub fn set_weight(&mut self, id: TaskId, wcounts: Weight) -> SchedResult<()> {
        self.tasks.get_mut(id)?.wcounts = wcounts;
        Ok(())
    }

    pub fn set_priority(&mut self, id: TaskId, prio: Priority) -> SchedResult<()> {
        let task = self.tasks.get_mut(id)?;
        let old_prio = std::mem::replace(&mut task.prio, prio);
        let class = self.class_of(id)?;
        class.prio_changed(&mut self.rq, &mut self.tasks, id, old_prio);
        Ok(())
    }

    /// Switch out the current task and install whatever the chain offers next
    pub fn schedule(&mut self) -> SchedResult<TaskId> {
        let prev = self.rq.curr().filter(|&id| self.tasks.contains(id));
        if let Some(prev) = prev {
            let class = self.class_of(prev)?;
            class.put_prev_task(&mut self.rq, &mut self.tasks, prev)?;
            self.tasks.get_mut(prev)?.clear_need_resched();
        }

        let next = self
            .chain
            .pick_next_task(&mut self.rq, &mut self.tasks)
            .ok_or(SchedulerError::NothingRunnable(self.rq.cpu()))?;

        if prev != Some(next) {
            self.context_switches += 1;
            let class = self.class_of(next)?;
            self.rq.set_curr(Some(next));
            class.set_curr_task(&mut self.rq, &mut self.tasks)?;
            class.switched_to(&mut self.rq, &mut self.tasks, next);
            debug!(prev = ?prev.map(|id| id.to_string()), next = %next, "context switch");
        }
        Ok(next)
    }

    /// Advance the clock to `now`, tick the current task, and reschedule if asked
    ///
    /// Returns whether a reschedule ran.
    pub fn tick(&mut self, now: Nanos) -> SchedResult<bool> {
        self.rq.update_clock(now);
        let Some(curr) = self.rq.curr() else {
            self.schedule()?;
            return Ok(true);
        };

        let class = self.class_of(curr)?;
        class.task_tick(&mut self.rq, &mut self.tasks, curr)?;

        if self.tasks.get(curr)?.need_resched() {
            self.schedule()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Current task gives up the processor
    pub fn yield_current(&mut self) -> SchedResult<TaskId> {
        let curr = self
            .rq
            .curr()
            .ok_or(SchedulerError::NoCurrentTask(self.rq.cpu()))?;
        let class = self.class_of(curr)?;
        class.yield_task(&mut self.rq, &mut self.tasks)?;
        self.schedule()
    }

    /// Round-robin interval of a task, or the invalid sentinel
    pub fn rr_interval(&self, id: TaskId) -> u32 {
        match self.class_of(id) {
            Ok(class) => class.get_rr_interval(Some(&self.rq), &self.tasks, Some(id)),
            Err(_) => RR_INTERVAL_INVALID,
        }
    }

    #[inline]
    pub fn current(&self) -> Option<TaskId> {
        self.rq.curr()
    }

    pub fn task(&self, id: TaskId) -> SchedResult<&Task> {
        self.tasks.get(id)
    }

    pub fn tasks(&self) -> &TaskTable {
        &self.tasks
    }

    pub fn rq(&self) -> &Rq {
        &self.rq
    }

    pub fn chain(&self) -> &PolicyChain {
        &self.chain
    }

    pub fn context_switches(&self) -> u64 {
        self.context_switches
    }

    fn class_of(&self, id: TaskId) -> SchedResult<Arc<dyn SchedClass>> {
        self.chain.class_for(self.tasks.get(id)?.policy)
    }
}
