use std::env;
use std::str::FromStr;

use pinboard_core::pins::{
    PinPolicy, PolicyError, AUTO_UNPIN_THRESHOLD_DAYS, MAX_PINS, STALE_THRESHOLD_DAYS,
};

/// Default SQLite database path.
pub const DEFAULT_DB_PATH: &str = "pinboard.db";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum pins per user (default: 7)
    pub max_pins: usize,
    /// Idle days before a pin is shown as stale (default: 14)
    pub stale_after_days: u32,
    /// Idle days before a pin may be removed automatically (default: 21)
    pub auto_unpin_after_days: u32,
    /// Path to SQLite database file (default: "pinboard.db")
    pub db_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PINBOARD_MAX_PINS` - Maximum pins per user (default: 7)
    /// - `PINBOARD_STALE_DAYS` - Idle days until stale (default: 14)
    /// - `PINBOARD_AUTO_UNPIN_DAYS` - Idle days until auto-unpin (default: 21)
    /// - `PINBOARD_DB_PATH` - SQLite database path (default: "pinboard.db")
    ///
    /// Unparsable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: FromStr>(value: Option<String>, default: T) -> T {
            value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
        }

        Self {
            max_pins: parsed(lookup("PINBOARD_MAX_PINS"), MAX_PINS),
            stale_after_days: parsed(lookup("PINBOARD_STALE_DAYS"), STALE_THRESHOLD_DAYS),
            auto_unpin_after_days: parsed(
                lookup("PINBOARD_AUTO_UNPIN_DAYS"),
                AUTO_UNPIN_THRESHOLD_DAYS,
            ),
            db_path: lookup("PINBOARD_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
        }
    }

    /// Builds the pin policy, rejecting zero capacity or thresholds.
    pub fn policy(&self) -> Result<PinPolicy, PolicyError> {
        let policy = PinPolicy::default()
            .with_max_pins(self.max_pins)
            .with_stale_after_days(self.stale_after_days)
            .with_auto_unpin_after_days(self.auto_unpin_after_days);
        policy.validate()?;
        Ok(policy)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);

        assert_eq!(config.max_pins, 7);
        assert_eq!(config.stale_after_days, 14);
        assert_eq!(config.auto_unpin_after_days, 21);
        assert_eq!(config.db_path, "pinboard.db");
        assert_eq!(config.policy().unwrap(), PinPolicy::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PINBOARD_MAX_PINS", "3"),
            ("PINBOARD_STALE_DAYS", " 5 "),
            ("PINBOARD_AUTO_UNPIN_DAYS", "9"),
            ("PINBOARD_DB_PATH", "/tmp/pins.db"),
        ]);

        let policy = config.policy().unwrap();
        assert_eq!(policy.max_pins, 3);
        assert_eq!(policy.stale_after_days, 5);
        assert_eq!(policy.auto_unpin_after_days, 9);
        assert_eq!(config.db_path, "/tmp/pins.db");
    }

    #[test]
    fn test_unparsable_value_falls_back() {
        let config = config_from(&[("PINBOARD_MAX_PINS", "many")]);
        assert_eq!(config.max_pins, 7);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = config_from(&[("PINBOARD_MAX_PINS", "0")]);
        assert_eq!(config.policy(), Err(PolicyError::ZeroCapacity));
    }
}
