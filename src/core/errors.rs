/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{CpuId, Pid, Policy, TaskId};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheduler operation result
pub type SchedResult<T> = Result<T, SchedulerError>;

/// Scheduler-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Task {0} not found")]
    #[diagnostic(
        code(scheduler::unknown_task),
        help("The handle is stale or the task was never spawned on this table.")
    )]
    UnknownTask(TaskId),

    #[error("No task is running on cpu {0}")]
    #[diagnostic(
        code(scheduler::no_current_task),
        help("Run schedule() before invoking operations on the current task.")
    )]
    NoCurrentTask(CpuId),

    #[error("Pid {0} is already registered")]
    #[diagnostic(code(scheduler::pid_in_use))]
    PidInUse(Pid),

    #[error("Task {0} is still linked into a run queue")]
    #[diagnostic(
        code(scheduler::still_queued),
        help("Dequeue the task before removing it from the task table.")
    )]
    StillQueued(TaskId),

    #[error("Time slice {slice} outside [{min}, {max}]")]
    #[diagnostic(
        code(scheduler::slice_out_of_range),
        help("Widen min_slice/max_slice or switch the overflow policy to clamp.")
    )]
    SliceOutOfRange { slice: u32, min: u32, max: u32 },

    #[error("No scheduling class registered for policy {0}")]
    #[diagnostic(code(scheduler::policy_not_registered))]
    PolicyNotRegistered(Policy),

    #[error("Nothing runnable on cpu {0}")]
    #[diagnostic(
        code(scheduler::nothing_runnable),
        help("Register an idle class at the end of the policy chain.")
    )]
    NothingRunnable(CpuId),

    #[error("The idle task of cpu {0} cannot exit")]
    #[diagnostic(code(scheduler::idle_exit))]
    IdleExit(CpuId),
}

/// Configuration errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Invalid slice bounds: min {min}, max {max}")]
    #[diagnostic(
        code(config::invalid_bounds),
        help("min_slice must be at least 1 and no larger than max_slice.")
    )]
    InvalidBounds { min: u32, max: u32 },

    #[error("Default bucket {0} is outside 0..=9")]
    #[diagnostic(code(config::invalid_bucket))]
    InvalidBucket(u32),

    #[error("Invalid value {value:?} for {var}")]
    #[diagnostic(code(config::invalid_env))]
    InvalidEnv { var: String, value: String },

    #[error("Malformed configuration: {0}")]
    #[diagnostic(code(config::parse))]
    Parse(String),
}
