use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::time::{SimDuration, MINUTES_PER_DAY};

/// Default time table slot width: 10 minutes.
const DEFAULT_SLOT_WIDTH_MINUTES: u32 = 10;

/// Default statistics bucket: 1 hour.
const DEFAULT_STATS_BUCKET_MINUTES: u32 = 60;

/// Default horizon: 10 simulated hours.
const DEFAULT_MAX_SIMULATED_SECONDS: u64 = 10 * 60 * 60;

/// Engine configuration supplied by the embedding application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Width of a daily time table slot in minutes. Must divide 1440.
    pub slot_width_minutes: u32,
    /// Width of an event statistics bucket in minutes.
    pub stats_bucket_minutes: u32,
    /// Horizon used by [crate::simulation::Simulation::run_configured].
    pub max_simulated_seconds: u64,
    /// Seed for the scheduler's random source (for reproducibility).
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            slot_width_minutes: DEFAULT_SLOT_WIDTH_MINUTES,
            stats_bucket_minutes: DEFAULT_STATS_BUCKET_MINUTES,
            max_simulated_seconds: DEFAULT_MAX_SIMULATED_SECONDS,
            seed: 0,
        }
    }
}

impl SimConfig {
    pub fn with_slot_width_minutes(mut self, minutes: u32) -> Self {
        self.slot_width_minutes = minutes;
        self
    }

    pub fn with_stats_bucket_minutes(mut self, minutes: u32) -> Self {
        self.stats_bucket_minutes = minutes;
        self
    }

    pub fn with_max_simulated_seconds(mut self, seconds: u64) -> Self {
        self.max_simulated_seconds = seconds;
        self
    }

    pub fn with_max_simulated_hours(self, hours: u64) -> Self {
        self.with_max_simulated_seconds(hours.saturating_mul(60 * 60))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_width_minutes == 0 {
            return Err(ConfigError::ZeroSlotWidth);
        }
        if MINUTES_PER_DAY % self.slot_width_minutes != 0 {
            return Err(ConfigError::SlotWidthNotDivisor(self.slot_width_minutes));
        }
        if self.stats_bucket_minutes == 0 {
            return Err(ConfigError::ZeroBucketWidth);
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn stats_bucket_width(&self) -> SimDuration {
        SimDuration::from_mins(self.stats_bucket_minutes as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stats_bucket_width(), SimDuration::from_hours(1));
    }

    #[test]
    fn builder_overrides() {
        let config = SimConfig::default()
            .with_slot_width_minutes(15)
            .with_stats_bucket_minutes(5)
            .with_max_simulated_hours(2)
            .with_seed(7);
        assert_eq!(config.slot_width_minutes, 15);
        assert_eq!(config.stats_bucket_minutes, 5);
        assert_eq!(config.max_simulated_seconds, 7200);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn huge_hour_horizon_saturates() {
        let config = SimConfig::default().with_max_simulated_hours(u64::MAX / 2);
        assert_eq!(config.max_simulated_seconds, u64::MAX);
    }

    #[test]
    fn validation_rejects_bad_widths() {
        let bad_slot = SimConfig::default().with_slot_width_minutes(7);
        assert!(matches!(
            bad_slot.validate(),
            Err(ConfigError::SlotWidthNotDivisor(7))
        ));

        let zero_bucket = SimConfig::default().with_stats_bucket_minutes(0);
        assert!(matches!(
            zero_bucket.validate(),
            Err(ConfigError::ZeroBucketWidth)
        ));
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = SimConfig::from_json_str(r#"{ "slot_width_minutes": 30, "seed": 9 }"#)
            .expect("valid config");
        assert_eq!(config.slot_width_minutes, 30);
        assert_eq!(config.seed, 9);
        assert_eq!(config.stats_bucket_minutes, DEFAULT_STATS_BUCKET_MINUTES);
    }

    #[test]
    fn json_parse_and_validation_errors() {
        assert!(matches!(
            SimConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimConfig::from_json_str(r#"{ "slot_width_minutes": 0 }"#),
            Err(ConfigError::ZeroSlotWidth)
        ));
    }
}
