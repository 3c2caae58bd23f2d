/*!
 * RAS Policy Configuration
 *
 * Slice bounds and overflow handling, loadable from defaults, environment,
 * or JSON.
 */

use crate::core::errors::ConfigError;
use crate::core::limits::{DEFAULT_BUCKET, DEFAULT_MAX_SLICE, DEFAULT_MIN_SLICE, MAX_BUCKET};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do with a computed slice outside `[min_slice, max_slice]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceOverflow {
    /// Log it and keep the entity's previous slice
    #[default]
    Reject,
    /// Log it and clamp into range
    Clamp,
}

impl SliceOverflow {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Clamp => "clamp",
        }
    }
}

impl FromStr for SliceOverflow {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "clamp" => Ok(Self::Clamp),
            _ => Err(ConfigError::InvalidEnv {
                var: ENV_OVERFLOW.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

pub const ENV_MIN_SLICE: &str = "RAS_TIMESLICE_MIN";
pub const ENV_MAX_SLICE: &str = "RAS_TIMESLICE_MAX";
pub const ENV_DEFAULT_BUCKET: &str = "RAS_DEFAULT_BUCKET";
pub const ENV_OVERFLOW: &str = "RAS_SLICE_OVERFLOW";

/// RAS policy configuration
///
/// The bounds are read-only to the policy once a scheduler is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RasConfig {
    /// Smallest slice (ticks) an entity may be granted
    pub min_slice: u32,
    /// Largest slice (ticks) an entity may be granted
    pub max_slice: u32,
    /// Bucket used when a slice is computed against an empty run queue
    ///
    /// Enqueue counts the task first, so this only reaches `get_rr_interval`
    /// on an empty queue and ticks of unlinked tasks.
    pub default_bucket: u32,
    pub overflow: SliceOverflow,
}

impl Default for RasConfig {
    fn default() -> Self {
        Self::strict()
    }
}

impl RasConfig {
    /// Default bounds, rejecting out-of-range slices
    pub const fn strict() -> Self {
        Self {
            min_slice: DEFAULT_MIN_SLICE,
            max_slice: DEFAULT_MAX_SLICE,
            default_bucket: DEFAULT_BUCKET,
            overflow: SliceOverflow::Reject,
        }
    }

    /// Default bounds, clamping out-of-range slices instead of rejecting them
    pub const fn clamped() -> Self {
        Self {
            min_slice: DEFAULT_MIN_SLICE,
            max_slice: DEFAULT_MAX_SLICE,
            default_bucket: DEFAULT_BUCKET,
            overflow: SliceOverflow::Clamp,
        }
    }

    pub const fn with_bounds(mut self, min_slice: u32, max_slice: u32) -> Self {
        self.min_slice = min_slice;
        self.max_slice = max_slice;
        self
    }

    pub const fn with_overflow(mut self, overflow: SliceOverflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_slice == 0 || self.min_slice > self.max_slice {
            return Err(ConfigError::InvalidBounds {
                min: self.min_slice,
                max: self.max_slice,
            });
        }
        if self.default_bucket > MAX_BUCKET {
            return Err(ConfigError::InvalidBucket(self.default_bucket));
        }
        Ok(())
    }

    /// Load from `RAS_*` environment variables on top of the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_MIN_SLICE) {
            config.min_slice = parse_u32(ENV_MIN_SLICE, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_SLICE) {
            config.max_slice = parse_u32(ENV_MAX_SLICE, &value)?;
        }
        if let Some(value) = lookup(ENV_DEFAULT_BUCKET) {
            config.default_bucket = parse_u32(ENV_DEFAULT_BUCKET, &value)?;
        }
        if let Some(value) = lookup(ENV_OVERFLOW) {
            config.overflow = value.trim().parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; absent fields take their defaults
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_u32(var: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    })
}
