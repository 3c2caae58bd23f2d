/*!
 * Scheduler Module
 * Host-side scheduling: per-processor context, class interface, and policy chain
 */

mod chain;
mod cpu;
mod idle;
mod rq;
pub mod traits;

pub use chain::PolicyChain;
pub use cpu::CpuScheduler;
pub use idle::IdleClass;
pub use rq::Rq;
pub use traits::{NoopCharge, RuntimeCharge, SchedClass};
