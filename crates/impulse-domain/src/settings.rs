//! User-tunable thresholds that drive the recording flow.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::common::{SliderBounds, ValueError};

/// Range offered for the monthly budget.
pub const BUDGET_BOUNDS: SliderBounds = SliderBounds::new(10_000, 200_000, 5_000);

/// Range offered for the impulse threshold.
pub const THRESHOLD_BOUNDS: SliderBounds = SliderBounds::new(1_000, 30_000, 500);

/// Length of the cooldown imposed on deferred purchases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TimerDuration {
    #[default]
    Day,
    TwoDays,
    ThreeDays,
}

impl TimerDuration {
    pub const ALL: [TimerDuration; 3] = [
        TimerDuration::Day,
        TimerDuration::TwoDays,
        TimerDuration::ThreeDays,
    ];

    pub fn hours(self) -> u32 {
        match self {
            TimerDuration::Day => 24,
            TimerDuration::TwoDays => 48,
            TimerDuration::ThreeDays => 72,
        }
    }

    pub fn from_hours(hours: u32) -> Result<Self, ValueError> {
        match hours {
            24 => Ok(TimerDuration::Day),
            48 => Ok(TimerDuration::TwoDays),
            72 => Ok(TimerDuration::ThreeDays),
            other => Err(ValueError::InvalidDuration(other)),
        }
    }

    pub fn as_duration(self) -> Duration {
        Duration::hours(i64::from(self.hours()))
    }
}

impl TryFrom<u32> for TimerDuration {
    type Error = ValueError;

    fn try_from(hours: u32) -> Result<Self, Self::Error> {
        Self::from_hours(hours)
    }
}

impl From<TimerDuration> for u32 {
    fn from(duration: TimerDuration) -> Self {
        duration.hours()
    }
}

impl fmt::Display for TimerDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.hours())
    }
}

/// Singleton configuration persisted alongside the expense history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub monthly_budget: u64,
    pub impulse_threshold: u64,
    pub timer_duration: TimerDuration,
}

impl Settings {
    pub const DEFAULT_MONTHLY_BUDGET: u64 = 50_000;
    pub const DEFAULT_IMPULSE_THRESHOLD: u64 = 5_000;

    /// Returns `true` when a purchase of `amount` must wait out a cooldown.
    pub fn defers(&self, amount: u64) -> bool {
        amount >= self.impulse_threshold
    }

    pub fn validate(&self) -> Result<(), ValueError> {
        if self.monthly_budget == 0 {
            return Err(ValueError::NonPositive("monthly budget"));
        }
        if self.impulse_threshold == 0 {
            return Err(ValueError::NonPositive("impulse threshold"));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            monthly_budget: Self::DEFAULT_MONTHLY_BUDGET,
            impulse_threshold: Self::DEFAULT_IMPULSE_THRESHOLD,
            timer_duration: TimerDuration::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.monthly_budget, 50_000);
        assert_eq!(settings.impulse_threshold, 5_000);
        assert_eq!(settings.timer_duration.hours(), 24);
    }

    #[test]
    fn threshold_is_inclusive() {
        let settings = Settings::default();
        assert!(settings.defers(5_000));
        assert!(!settings.defers(4_999));
    }

    #[test]
    fn serializes_with_camel_case_and_hour_counts() {
        let settings = Settings {
            monthly_budget: 80_000,
            impulse_threshold: 3_000,
            timer_duration: TimerDuration::ThreeDays,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(
            json,
            r#"{"monthlyBudget":80000,"impulseThreshold":3000,"timerDuration":72}"#
        );
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn rejects_unsupported_duration() {
        assert!(serde_json::from_str::<TimerDuration>("36").is_err());
        assert_eq!(TimerDuration::from_hours(48), Ok(TimerDuration::TwoDays));
    }

    #[test]
    fn zero_budget_is_invalid() {
        let settings = Settings {
            monthly_budget: 0,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ValueError::NonPositive("monthly budget"))
        );
    }
}
