/*!
 * Task Table
 * Generational arena of tasks with O(1) handle lookup and slot recycling
 */

use super::task::Task;
use crate::core::errors::{SchedResult, SchedulerError};
use crate::core::types::{Pid, TaskId};
use ahash::RandomState;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug)]
struct Slot {
    generation: u32,
    task: Option<Task>,
}

/// Owner of every task known to the host
///
/// Run queues link tasks through [`TaskId`] handles; the table refuses to drop
/// a task that is still linked so those links never dangle.
#[derive(Debug, Default)]
pub struct TaskTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_pid: HashMap<Pid, TaskId, RandomState>,
}

impl TaskTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            by_pid: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    /// Insert a task, recycling a free slot when one exists
    pub fn insert(&mut self, task: Task) -> SchedResult<TaskId> {
        if self.by_pid.contains_key(&task.pid) {
            return Err(SchedulerError::PidInUse(task.pid));
        }

        let pid = task.pid;
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.task = Some(task);
                TaskId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    task: Some(task),
                });
                TaskId::new(index, 0)
            }
        };

        self.by_pid.insert(pid, id);
        debug!(pid, task = %id, "task registered");
        Ok(id)
    }

    /// Remove a task that is no longer linked into any run queue
    pub fn remove(&mut self, id: TaskId) -> SchedResult<Task> {
        if self.get(id)?.ras.on_rq() {
            return Err(SchedulerError::StillQueued(id));
        }

        let slot = &mut self.slots[id.index()];
        let task = slot.task.take().ok_or(SchedulerError::UnknownTask(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index() as u32);
        self.by_pid.remove(&task.pid);

        debug!(pid = task.pid, task = %id, "task unregistered");
        Ok(task)
    }

    #[inline]
    pub fn get(&self, id: TaskId) -> SchedResult<&Task> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.task.as_ref())
            .ok_or(SchedulerError::UnknownTask(id))
    }

    #[inline]
    pub fn get_mut(&mut self, id: TaskId) -> SchedResult<&mut Task> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.task.as_mut())
            .ok_or(SchedulerError::UnknownTask(id))
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_ok()
    }

    /// Resolve a pid to its current handle
    pub fn lookup(&self, pid: Pid) -> Option<TaskId> {
        self.by_pid.get(&pid).copied()
    }

    pub fn len(&self) -> usize {
        self.by_pid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pid.is_empty()
    }

    /// Iterate live tasks in slot order
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &Task)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.task
                .as_ref()
                .map(|task| (TaskId::new(index as u32, slot.generation), task))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut table = TaskTable::new();
        let a = table.insert(Task::ras(10, 0, 1)).unwrap();
        let b = table.insert(Task::ras(11, 0, 2)).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(10), Some(a));
        assert_eq!(table.get(b).unwrap().wcounts, 2);
    }

    #[test]
    fn test_duplicate_pid_rejected() {
        let mut table = TaskTable::new();
        table.insert(Task::ras(10, 0, 1)).unwrap();
        assert_eq!(
            table.insert(Task::ras(10, 0, 1)),
            Err(SchedulerError::PidInUse(10))
        );
    }

    #[test]
    fn test_stale_handle_after_recycle() {
        let mut table = TaskTable::new();
        let old = table.insert(Task::ras(10, 0, 1)).unwrap();
        table.remove(old).unwrap();

        let new = table.insert(Task::ras(12, 0, 1)).unwrap();
        assert_eq!(new.index(), old.index());
        assert_ne!(new.generation(), old.generation());
        assert_eq!(table.get(old).unwrap_err(), SchedulerError::UnknownTask(old));
        assert_eq!(table.lookup(10), None);
    }

    #[test]
    fn test_iter_skips_free_slots() {
        let mut table = TaskTable::with_capacity(4);
        let a = table.insert(Task::ras(1, 0, 1)).unwrap();
        table.insert(Task::ras(2, 0, 1)).unwrap();
        table.remove(a).unwrap();

        let pids: Vec<_> = table.iter().map(|(_, task)| task.pid).collect();
        assert_eq!(pids, vec![2]);
    }
}
