/*!
 * Probability Model
 * Discretizes a task's weight relative to its run queue average into a bucket
 */

use super::run_queue::RasRunQueue;
use crate::core::types::Weight;

/// Run queue load as seen by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueLoad {
    pub nr_running: usize,
    pub total_wcounts: u64,
}

impl QueueLoad {
    pub fn of(rq: &RasRunQueue) -> Self {
        Self {
            nr_running: rq.nr_running(),
            total_wcounts: rq.total_wcounts(),
        }
    }

    /// Integer average weight, `None` on an empty queue
    #[inline]
    pub fn average(&self) -> Option<u64> {
        (self.nr_running > 0).then(|| self.total_wcounts / self.nr_running as u64)
    }
}

/// Outcome of one model evaluation, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Estimate {
    pub average: u64,
    /// `None` when the default bucket was used
    pub ratio: Option<i64>,
    pub bucket: u32,
}

/// Signed weight ratio against the queue average
///
/// Negative values say how many times lighter than average the task is,
/// positive values how many times heavier. Zero weight maps to 0; a zero
/// average with a non-zero weight maps to 1.
pub fn weight_ratio(average: u64, wcounts: Weight) -> i64 {
    let wcounts = u64::from(wcounts);
    if wcounts == 0 {
        return 0;
    }
    if average == 0 {
        return 1;
    }
    // Both operands are bounded by u32::MAX, so the quotient fits in i64
    if average > wcounts {
        -((average / wcounts) as i64)
    } else {
        (wcounts / average) as i64
    }
}

/// Bucket table. The asymmetry is a tuning parameter.
pub fn bucket_for_ratio(ratio: i64) -> u32 {
    match ratio {
        0 => 0,
        r if r < -9 => 1,
        r if r < -4 => 2,
        r if r < -2 => 3,
        -2 | -1 | 1 => 5,
        2 | 3 => 7,
        4..=8 => 8,
        _ => 9,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProbabilityModel {
    default_bucket: u32,
}

impl ProbabilityModel {
    pub const fn new(default_bucket: u32) -> Self {
        Self { default_bucket }
    }

    pub fn estimate(&self, load: QueueLoad, wcounts: Weight) -> Estimate {
        match load.average() {
            None => Estimate {
                average: 0,
                ratio: None,
                bucket: self.default_bucket,
            },
            Some(average) => {
                let ratio = weight_ratio(average, wcounts);
                Estimate {
                    average,
                    ratio: Some(ratio),
                    bucket: bucket_for_ratio(ratio),
                }
            }
        }
    }
}
