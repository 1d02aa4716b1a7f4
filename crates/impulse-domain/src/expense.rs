//! Recorded purchases and the candidate values they are built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    category::Category,
    common::*,
    cooldown::CooldownTimer,
};

/// Unvalidated purchase input as collected from a form or command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseDraft {
    pub amount: u64,
    pub mood: u8,
    pub fatigue: u8,
    pub category: Option<Category>,
}

impl PurchaseDraft {
    /// Checks every field and produces a candidate that is safe to persist.
    pub fn validate(&self) -> Result<PurchaseCandidate, ValueError> {
        let category = self.category.ok_or(ValueError::MissingCategory)?;
        if !AMOUNT_BOUNDS.contains(self.amount) {
            return Err(ValueError::AmountOutOfRange(self.amount));
        }
        Ok(PurchaseCandidate {
            amount: self.amount,
            mood: Mood::new(self.mood)?,
            fatigue: Fatigue::new(self.fatigue)?,
            category,
        })
    }
}

/// A validated purchase awaiting the record-or-defer decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseCandidate {
    pub amount: u64,
    pub mood: Mood,
    pub fatigue: Fatigue,
    pub category: Category,
}

/// A recorded (or avoided) purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub amount: u64,
    pub mood: Mood,
    pub fatigue: Fatigue,
    pub category: Category,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoided: Option<bool>,
}

impl Expense {
    /// Builds an expense recorded directly, without a cooldown.
    pub fn record(candidate: &PurchaseCandidate, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount: candidate.amount,
            mood: candidate.mood,
            fatigue: candidate.fatigue,
            category: candidate.category,
            timestamp,
            avoided: None,
        }
    }

    /// Builds the expense produced when a cooldown is resolved.
    pub fn from_cooldown(timer: &CooldownTimer, avoided: bool, timestamp: DateTime<Utc>) -> Self {
        Self {
            avoided: Some(avoided),
            ..Self::record(&timer.candidate(), timestamp)
        }
    }

    pub fn is_avoided(&self) -> bool {
        self.avoided == Some(true)
    }
}
