//! Cooldown timers that hold a deferred purchase until the user decides.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    category::Category,
    common::*,
    expense::PurchaseCandidate,
    settings::TimerDuration,
};

/// A pending purchase decision waiting out its reflection window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CooldownTimer {
    pub id: Uuid,
    pub amount: u64,
    pub mood: Mood,
    pub fatigue: Fatigue,
    pub category: Category,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_time: DateTime<Utc>,
    pub completed: bool,
}

impl CooldownTimer {
    pub fn new(candidate: &PurchaseCandidate, duration: TimerDuration, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount: candidate.amount,
            mood: candidate.mood,
            fatigue: candidate.fatigue,
            category: candidate.category,
            start_time: now,
            end_time: now + duration.as_duration(),
            completed: false,
        }
    }

    /// Purchase attributes carried by the timer.
    pub fn candidate(&self) -> PurchaseCandidate {
        PurchaseCandidate {
            amount: self.amount,
            mood: self.mood,
            fatigue: self.fatigue,
            category: self.category,
        }
    }

    pub fn window(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Unresolved and still counting down.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.end_time > now
    }

    /// Time left before the window closes, never negative.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.end_time - now).max(Duration::zero())
    }

    /// Share of the window already elapsed, in percent.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        let total = self.window().num_milliseconds();
        if total <= 0 || now >= self.end_time {
            return 100.0;
        }
        let elapsed = (now - self.start_time).num_milliseconds().clamp(0, total);
        elapsed as f64 * 100.0 / total as f64
    }

    pub fn state(&self, now: DateTime<Utc>) -> CooldownState {
        if self.completed {
            CooldownState::Resolved
        } else if self.end_time > now {
            CooldownState::Active
        } else {
            CooldownState::Expired
        }
    }
}

/// Lifecycle position of a persisted timer.
///
/// `Expired` timers are unresolved but no longer active; they keep
/// `completed == false` until the user resolves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownState {
    Active,
    Expired,
    Resolved,
}

impl fmt::Display for CooldownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CooldownState::Active => "Active",
            CooldownState::Expired => "Expired",
            CooldownState::Resolved => "Resolved",
        };
        f.pad(label)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::expense::PurchaseDraft;

    fn timer(now: DateTime<Utc>) -> CooldownTimer {
        let candidate = PurchaseDraft {
            amount: 8_000,
            mood: 2,
            fatigue: 3,
            category: Some(Category::Shopping),
        }
        .validate()
        .unwrap();
        CooldownTimer::new(&candidate, TimerDuration::Day, now)
    }

    #[test]
    fn window_matches_configured_hours() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let timer = timer(start);
        assert_eq!(
            (timer.end_time - timer.start_time).num_milliseconds(),
            24 * 3_600_000
        );
        assert!(!timer.completed);
    }

    #[test]
    fn remaining_clamps_at_zero_after_expiry() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let timer = timer(start);

        assert_eq!(timer.remaining(start + Duration::hours(20)), Duration::hours(4));
        assert_eq!(timer.remaining(start + Duration::hours(30)), Duration::zero());
        assert_eq!(timer.state(start + Duration::hours(30)), CooldownState::Expired);
        assert!(!timer.is_active(start + Duration::hours(24)));
    }

    #[test]
    fn progress_tracks_elapsed_share() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let timer = timer(start);

        assert_eq!(timer.progress(start), 0.0);
        assert_eq!(timer.progress(start + Duration::hours(6)), 25.0);
        assert_eq!(timer.progress(start + Duration::days(3)), 100.0);
    }

    #[test]
    fn timestamps_serialize_as_epoch_millis() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let timer = timer(start);
        let json = serde_json::to_value(&timer).unwrap();

        assert_eq!(json["startTime"], start.timestamp_millis());
        assert_eq!(json["completed"], false);
        let parsed: CooldownTimer = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, timer);
    }
}
