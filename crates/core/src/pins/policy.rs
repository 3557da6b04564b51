use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::error::PolicyError;

/// Default maximum number of pins per user.
pub const MAX_PINS: usize = 7;

/// Default idle days after which a pin is shown as stale.
pub const STALE_THRESHOLD_DAYS: u32 = 14;

/// Default idle days after which a pin may be removed automatically.
pub const AUTO_UNPIN_THRESHOLD_DAYS: u32 = 21;

/// Capacity and decay thresholds applied to every user's pin set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinPolicy {
    pub max_pins: usize,
    pub stale_after_days: u32,
    pub auto_unpin_after_days: u32,
}

impl Default for PinPolicy {
    fn default() -> Self {
        Self {
            max_pins: MAX_PINS,
            stale_after_days: STALE_THRESHOLD_DAYS,
            auto_unpin_after_days: AUTO_UNPIN_THRESHOLD_DAYS,
        }
    }
}

impl PinPolicy {
    pub fn with_max_pins(mut self, max_pins: usize) -> Self {
        self.max_pins = max_pins;
        self
    }

    pub fn with_stale_after_days(mut self, days: u32) -> Self {
        self.stale_after_days = days;
        self
    }

    pub fn with_auto_unpin_after_days(mut self, days: u32) -> Self {
        self.auto_unpin_after_days = days;
        self
    }

    /// Idle time after which a pin is stale.
    pub fn stale_after(&self) -> Duration {
        Duration::days(i64::from(self.stale_after_days))
    }

    /// Idle time after which a pin is eligible for automatic removal.
    pub fn auto_unpin_after(&self) -> Duration {
        Duration::days(i64::from(self.auto_unpin_after_days))
    }

    /// Checks that the policy can be enforced.
    ///
    /// The two thresholds are independent of each other.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.max_pins == 0 {
            return Err(PolicyError::ZeroCapacity);
        }
        if self.stale_after_days == 0 {
            return Err(PolicyError::ZeroThreshold("Stale"));
        }
        if self.auto_unpin_after_days == 0 {
            return Err(PolicyError::ZeroThreshold("Auto-unpin"));
        }
        Ok(())
    }
}
