/*!
 * Scheduler Limits and Constants
 *
 * Centralized location for time-slice bounds, probability buckets, and
 * sentinel values used by the RAS policy and its host harness.
 */

use super::types::{CpuId, Nanos, Pid, Priority};

// =============================================================================
// TIME SLICE MODEL
// =============================================================================

/// Time slice granted for probability bucket `b` is `SLICE_BASE - b`
pub const SLICE_BASE: u32 = 10;

/// Highest probability bucket the model produces
pub const MAX_BUCKET: u32 = 9;

/// Bucket for a slice computed against an empty run queue
///
/// Only rr interval queries and ticks of unqueued tasks see an empty queue.
pub const DEFAULT_BUCKET: u32 = 5;

/// Default lower bound for a granted time slice (ticks)
/// A zero slice would be exhausted before the task ever ran
pub const DEFAULT_MIN_SLICE: u32 = 1;

/// Default upper bound for a granted time slice (ticks)
pub const DEFAULT_MAX_SLICE: u32 = SLICE_BASE;

/// Returned by `get_rr_interval` when no valid interval exists
pub const RR_INTERVAL_INVALID: u32 = u32::MAX;

// =============================================================================
// HOST HARNESS
// =============================================================================

/// Processor used by single-CPU hosts
pub const DEFAULT_CPU: CpuId = 0;

/// Pid reserved for the per-processor idle task
pub const IDLE_PID: Pid = 0;

/// Priority of the idle task, below every real task
pub const IDLE_PRIORITY: Priority = Priority::MAX;

/// Tick period used by the simulator (1ms)
pub const DEFAULT_TICK_NANOS: Nanos = 1_000_000;
