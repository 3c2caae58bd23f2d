/*!
 * RAS Run Queue
 * Per-processor FIFO of runnable entities, linked intrusively through task handles
 */

use super::entity::{Link, RasEntity};
use crate::core::errors::SchedResult;
use crate::core::types::{Nanos, TaskId, Weight};
use crate::process::TaskTable;
use parking_lot::Mutex;
use std::sync::Arc;

/// Accumulated runtime guarded by its own lock
///
/// Clones share the counter, so accounting readers can hold one and sample it
/// without touching the run queue.
#[derive(Debug, Clone, Default)]
pub struct RuntimeCounter(Arc<Mutex<Nanos>>);

impl RuntimeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&self, delta: Nanos) {
        let mut runtime = self.0.lock();
        *runtime = runtime.saturating_add(delta);
    }

    #[inline]
    pub fn get(&self) -> Nanos {
        *self.0.lock()
    }
}

/// Run queue of the RAS policy
///
/// Membership changes are serialized by the caller holding `&mut` on the
/// per-processor context. Only the runtime counter has a lock of its own.
#[derive(Debug, Default)]
pub struct RasRunQueue {
    head: Option<TaskId>,
    tail: Option<TaskId>,
    nr_running: usize,
    total_wcounts: u64,
    runtime: RuntimeCounter,
}

impl RasRunQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn nr_running(&self) -> usize {
        self.nr_running
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nr_running == 0
    }

    /// Sum of the weight contributions of linked entities
    #[inline(always)]
    pub fn total_wcounts(&self) -> u64 {
        self.total_wcounts
    }

    pub fn runtime(&self) -> Nanos {
        self.runtime.get()
    }

    /// Shared handle to the runtime counter
    pub fn runtime_counter(&self) -> RuntimeCounter {
        self.runtime.clone()
    }

    /// Entity at the head of the queue
    #[inline]
    pub fn first(&self) -> Option<TaskId> {
        self.head
    }

    #[inline]
    pub fn last(&self) -> Option<TaskId> {
        self.tail
    }

    /// Walk the queue from head to tail
    pub fn iter<'a>(&self, tasks: &'a TaskTable) -> Iter<'a> {
        Iter {
            tasks,
            next: self.head,
        }
    }

    pub(crate) fn inc_nr_running(&mut self) {
        self.nr_running += 1;
    }

    pub(crate) fn dec_nr_running(&mut self) {
        assert!(
            self.nr_running > 0,
            "ras run queue bookkeeping desynchronized: dequeue with nr_running == 0"
        );
        self.nr_running -= 1;
    }

    pub(crate) fn add_weight(&mut self, wcounts: Weight) {
        self.total_wcounts += u64::from(wcounts);
    }

    pub(crate) fn sub_weight(&mut self, wcounts: Weight) {
        self.total_wcounts = self.total_wcounts.saturating_sub(u64::from(wcounts));
    }

    /// Swap a stale contribution for a fresh one
    pub(crate) fn reconcile_weight(&mut self, old: Weight, new: Weight) {
        self.sub_weight(old);
        self.add_weight(new);
    }

    pub(crate) fn charge_runtime(&self, delta: Nanos) {
        self.runtime.add(delta);
    }

    pub(crate) fn push_back(&mut self, tasks: &mut TaskTable, id: TaskId) -> SchedResult<()> {
        let tail = self.tail;
        entity_mut(tasks, id)?.link = Some(Link {
            prev: tail,
            next: None,
        });
        match tail {
            Some(tail) => set_next(tasks, tail, Some(id))?,
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        Ok(())
    }

    pub(crate) fn push_front(&mut self, tasks: &mut TaskTable, id: TaskId) -> SchedResult<()> {
        let head = self.head;
        entity_mut(tasks, id)?.link = Some(Link {
            prev: None,
            next: head,
        });
        match head {
            Some(head) => set_prev(tasks, head, Some(id))?,
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        Ok(())
    }

    /// Unlink an entity; returns whether it was linked
    pub(crate) fn unlink(&mut self, tasks: &mut TaskTable, id: TaskId) -> SchedResult<bool> {
        let Some(link) = entity_mut(tasks, id)?.link.take() else {
            return Ok(false);
        };
        match link.prev {
            Some(prev) => set_next(tasks, prev, link.next)?,
            None => self.head = link.next,
        }
        match link.next {
            Some(next) => set_prev(tasks, next, link.prev)?,
            None => self.tail = link.prev,
        }
        Ok(true)
    }

    /// Rotate a linked entity to the tail; returns whether it was linked
    pub(crate) fn move_to_back(&mut self, tasks: &mut TaskTable, id: TaskId) -> SchedResult<bool> {
        if !self.unlink(tasks, id)? {
            return Ok(false);
        }
        self.push_back(tasks, id)?;
        Ok(true)
    }

    /// Rotate a linked entity to the head; returns whether it was linked
    pub(crate) fn move_to_front(&mut self, tasks: &mut TaskTable, id: TaskId) -> SchedResult<bool> {
        if !self.unlink(tasks, id)? {
            return Ok(false);
        }
        self.push_front(tasks, id)?;
        Ok(true)
    }
}

fn entity_mut(tasks: &mut TaskTable, id: TaskId) -> SchedResult<&mut RasEntity> {
    Ok(&mut tasks.get_mut(id)?.ras)
}

fn set_next(tasks: &mut TaskTable, id: TaskId, next: Option<TaskId>) -> SchedResult<()> {
    if let Some(link) = entity_mut(tasks, id)?.link.as_mut() {
        link.next = next;
    }
    Ok(())
}

fn set_prev(tasks: &mut TaskTable, id: TaskId, prev: Option<TaskId>) -> SchedResult<()> {
    if let Some(link) = entity_mut(tasks, id)?.link.as_mut() {
        link.prev = prev;
    }
    Ok(())
}

/// Head-to-tail iterator over a [`RasRunQueue`]
pub struct Iter<'a> {
    tasks: &'a TaskTable,
    next: Option<TaskId>,
}

impl Iterator for Iter<'_> {
    type Item = TaskId;

    fn next(&mut self) -> Option<TaskId> {
        let current = self.next?;
        self.next = self
            .tasks
            .get(current)
            .ok()
            .and_then(|task| task.ras.link)
            .and_then(|link| link.next);
        Some(current)
    }
}
