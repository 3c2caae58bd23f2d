/*!
 * Core Types
 * Common types used across the scheduler
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process ID type
pub type Pid = u32;

/// Static priority (lower value is more urgent)
pub type Priority = i32;

/// Externally computed workload statistic driving the probability model
pub type Weight = u32;

/// Task clock value in nanoseconds
pub type Nanos = u64;

/// Processor identifier
pub type CpuId = u32;

/// Generational handle into a [`TaskTable`](crate::process::TaskTable)
///
/// The generation is bumped every time a slot is recycled, so a handle held
/// past its task's exit never aliases a newer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId {
    index: u32,
    generation: u32,
}

impl TaskId {
    #[inline]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the owning table
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.index as usize
    }

    #[inline(always)]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Scheduling policy a task is assigned to
///
/// Each policy is served by exactly one scheduling class in the
/// [`PolicyChain`](crate::scheduler::PolicyChain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Weight-driven round-robin with variable time slice
    Ras,
    /// Fallback policy, runs only when nothing else is runnable
    Idle,
}

impl Policy {
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ras => "ras",
            Self::Idle => "idle",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an entity lands when it is (re)inserted into a run queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Place {
    Head,
    #[default]
    Tail,
}
