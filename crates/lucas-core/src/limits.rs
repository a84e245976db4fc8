//! Engine limits checked before a run starts.
//!
//! A violated limit rejects the request up front; searches that merely run
//! out of budget are reported through their outcomes instead.

use serde::{Deserialize, Serialize};

use lucas_model::MAX_ENUMERATION_WIDTH;

/// Global engine limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineLimits {
    /// Widest domain the engine will enumerate.
    pub max_enumeration_width: u32,
    /// Maximum annealing attempts raced at once.
    pub max_parallel_attempts: usize,
    /// Maximum size of a JSON run configuration.
    pub max_config_bytes: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_enumeration_width: 20,
            max_parallel_attempts: 64,
            max_config_bytes: 1024 * 1024, // 1 MB
        }
    }
}

/// A limit violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LimitViolation {
    #[error("width {n} exceeds the enumeration limit of {max}")]
    WidthTooLarge { n: u32, max: u32 },
    #[error("too many parallel attempts ({count}, max {max})")]
    TooManyAttempts { count: usize, max: usize },
    #[error("configuration too large ({size} bytes, max {max})")]
    ConfigTooLarge { size: usize, max: usize },
}

impl EngineLimits {
    /// The effective width cap: never above what the model can enumerate.
    pub fn width_cap(&self) -> u32 {
        self.max_enumeration_width.min(MAX_ENUMERATION_WIDTH)
    }

    pub fn check_width(&self, n: u32) -> Result<(), LimitViolation> {
        let max = self.width_cap();
        if n > max {
            return Err(LimitViolation::WidthTooLarge { n, max });
        }
        Ok(())
    }

    pub fn check_attempts(&self, count: usize) -> Result<(), LimitViolation> {
        if count > self.max_parallel_attempts {
            return Err(LimitViolation::TooManyAttempts {
                count,
                max: self.max_parallel_attempts,
            });
        }
        Ok(())
    }

    pub fn check_config_size(&self, size: usize) -> Result<(), LimitViolation> {
        if size > self.max_config_bytes {
            return Err(LimitViolation::ConfigTooLarge {
                size,
                max: self.max_config_bytes,
            });
        }
        Ok(())
    }
}
