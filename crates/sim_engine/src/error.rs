use thiserror::Error;

use crate::time::SimTime;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("time table slot width must be non-zero")]
    ZeroSlotWidth,
    #[error("time table slot width {0} min does not divide a day")]
    SlotWidthNotDivisor(u32),
    #[error("statistics bucket width must be non-zero")]
    ZeroBucketWidth,
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("cannot schedule at {at}, clock is already at {now}")]
    InPast { at: SimTime, now: SimTime },
}

/// Reported by a scenario whose priming step failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("priming failed with code {code}: {reason}")]
pub struct PrimeError {
    pub code: i32,
    pub reason: String,
}

impl PrimeError {
    pub fn new(code: i32, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("priming sim failed (code {code}): {reason}")]
    Priming { code: i32, reason: String },
    #[error("simulation has already run")]
    AlreadyRun,
}

impl SimError {
    /// Non-zero status for hosts that surface a numeric run result.
    pub fn exit_code(&self) -> i32 {
        match self {
            SimError::Priming { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

impl From<PrimeError> for SimError {
    fn from(err: PrimeError) -> Self {
        SimError::Priming {
            code: err.code,
            reason: err.reason,
        }
    }
}
