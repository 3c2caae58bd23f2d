/*!
 * Time Slice Allocator
 * Maps probability buckets to bounded time slices
 */

use super::config::{RasConfig, SliceOverflow};
use crate::core::errors::{SchedResult, SchedulerError};
use crate::core::limits::SLICE_BASE;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub struct TimesliceAllocator {
    min_slice: u32,
    max_slice: u32,
    overflow: SliceOverflow,
}

impl TimesliceAllocator {
    pub fn from_config(config: &RasConfig) -> Self {
        Self {
            min_slice: config.min_slice,
            max_slice: config.max_slice,
            overflow: config.overflow,
        }
    }

    /// Raw slice for a bucket, before bounds are applied
    #[inline(always)]
    pub const fn slice_for_bucket(bucket: u32) -> u32 {
        SLICE_BASE.saturating_sub(bucket)
    }

    #[inline]
    pub fn validate(&self, slice: u32) -> SchedResult<u32> {
        if slice < self.min_slice || slice > self.max_slice {
            return Err(SchedulerError::SliceOutOfRange {
                slice,
                min: self.min_slice,
                max: self.max_slice,
            });
        }
        Ok(slice)
    }

    /// Slice for a bucket with the configured overflow policy applied
    pub fn allocate(&self, bucket: u32) -> SchedResult<u32> {
        let slice = Self::slice_for_bucket(bucket);
        match (self.validate(slice), self.overflow) {
            (Ok(slice), _) => Ok(slice),
            (Err(err), SliceOverflow::Clamp) => {
                let clamped = slice.clamp(self.min_slice, self.max_slice);
                warn!(error = %err, clamped, "time slice out of range, clamping");
                Ok(clamped)
            }
            (Err(err), SliceOverflow::Reject) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_for_bucket() {
        assert_eq!(TimesliceAllocator::slice_for_bucket(0), 10);
        assert_eq!(TimesliceAllocator::slice_for_bucket(5), 5);
        assert_eq!(TimesliceAllocator::slice_for_bucket(7), 3);
        assert_eq!(TimesliceAllocator::slice_for_bucket(9), 1);
    }

    #[test]
    fn test_default_bounds_accept_every_bucket() {
        let allocator = TimesliceAllocator::from_config(&RasConfig::default());
        for bucket in 0..=9 {
            assert_eq!(allocator.allocate(bucket), Ok(10 - bucket));
        }
    }

    #[test]
    fn test_reject_out_of_range() {
        let config = RasConfig::default().with_bounds(3, 8);
        let allocator = TimesliceAllocator::from_config(&config);
        assert_eq!(
            allocator.allocate(0),
            Err(SchedulerError::SliceOutOfRange {
                slice: 10,
                min: 3,
                max: 8
            })
        );
        assert_eq!(allocator.allocate(5), Ok(5));
    }

    #[test]
    fn test_clamp_out_of_range() {
        let config = RasConfig::clamped().with_bounds(3, 8);
        let allocator = TimesliceAllocator::from_config(&config);
        assert_eq!(allocator.allocate(0), Ok(8));
        assert_eq!(allocator.allocate(9), Ok(3));
    }
}
