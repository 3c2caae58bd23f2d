/*!
 * RAS Scheduling Policy
 * Weight-driven round-robin with a probabilistic, bounded time slice
 */

use crate::core::errors::{ConfigError, SchedResult};
use crate::process::Task;
use crate::scheduler::{NoopCharge, RuntimeCharge};
use std::sync::Arc;
use tracing::{debug, info};

mod accounting;
mod atomic_stats;
mod config;
mod entity;
mod operations;
mod probability;
mod run_queue;
mod stats;
mod timeslice;

pub use accounting::RuntimeAccountant;
pub use atomic_stats::AtomicRasStats;
pub use config::{RasConfig, SliceOverflow};
pub use entity::RasEntity;
pub use probability::{bucket_for_ratio, weight_ratio, Estimate, ProbabilityModel, QueueLoad};
pub use run_queue::{Iter, RasRunQueue, RuntimeCounter};
pub use stats::RasStats;
pub use timeslice::TimesliceAllocator;

/// RAS scheduling class
///
/// Stateless apart from configuration and counters: all queue state lives in
/// the per-processor [`Rq`](crate::scheduler::Rq), so one instance can serve
/// every processor.
pub struct RasScheduler {
    config: RasConfig,
    model: ProbabilityModel,
    allocator: TimesliceAllocator,
    accountant: RuntimeAccountant,
    stats: Arc<AtomicRasStats>,
}

impl RasScheduler {
    /// Create a scheduler from a validated configuration
    pub fn new(config: RasConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            min_slice = config.min_slice,
            max_slice = config.max_slice,
            default_bucket = config.default_bucket,
            overflow = config.overflow.as_str(),
            "RAS scheduler initialized"
        );
        Ok(Self::build(config, Arc::new(NoopCharge)))
    }

    fn build(config: RasConfig, charge: Arc<dyn RuntimeCharge>) -> Self {
        Self {
            model: ProbabilityModel::new(config.default_bucket),
            allocator: TimesliceAllocator::from_config(&config),
            accountant: RuntimeAccountant::new(charge),
            stats: Arc::new(AtomicRasStats::new()),
            config,
        }
    }

    /// Route runtime charges to external accounting collaborators
    pub fn with_charge(mut self, charge: Arc<dyn RuntimeCharge>) -> Self {
        self.accountant = RuntimeAccountant::new(charge);
        self
    }

    pub fn config(&self) -> &RasConfig {
        &self.config
    }

    /// Fresh time slice for `task` against the current queue load
    pub(crate) fn timeslice(&self, rq: &RasRunQueue, task: &Task) -> SchedResult<u32> {
        let load = QueueLoad::of(rq);
        let estimate = self.model.estimate(load, task.wcounts);
        debug!(
            pid = task.pid,
            avg = estimate.average,
            wcounts = task.wcounts,
            prob = estimate.bucket,
            total = load.total_wcounts,
            nr = load.nr_running,
            ratio = ?estimate.ratio,
            "probability estimate"
        );
        self.allocator.allocate(estimate.bucket)
    }
}

impl Default for RasScheduler {
    fn default() -> Self {
        Self::build(RasConfig::default(), Arc::new(NoopCharge))
    }
}
