/*!
 * RAS Scheduler Library
 * Weight-driven round-robin scheduling class with a single-processor host harness
 */

pub mod core;
pub mod monitoring;
pub mod process;
pub mod ras;
pub mod scheduler;

// Re-exports
pub use crate::core::errors::{ConfigError, SchedResult, SchedulerError};
pub use crate::core::limits::RR_INTERVAL_INVALID;
pub use crate::core::types::{CpuId, Nanos, Pid, Place, Policy, Priority, TaskId, Weight};
pub use monitoring::init_tracing;
pub use process::{ExecStats, Task, TaskTable};
pub use ras::{RasConfig, RasScheduler, RasStats, SliceOverflow};
pub use scheduler::{CpuScheduler, IdleClass, NoopCharge, PolicyChain, Rq, RuntimeCharge, SchedClass};
