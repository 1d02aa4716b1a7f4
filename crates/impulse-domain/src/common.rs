//! Bounded value types and validation errors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inclusive slider bounds with a fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderBounds {
    pub min: u64,
    pub max: u64,
    pub step: u64,
}

impl SliderBounds {
    pub const fn new(min: u64, max: u64, step: u64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Returns `true` when `value` is in range and lands on a step.
    pub fn accepts(&self, value: u64) -> bool {
        self.contains(value) && (self.step == 0 || (value - self.min) % self.step == 0)
    }
}

/// Bounds for a single purchase amount.
pub const AMOUNT_BOUNDS: SliderBounds = SliderBounds::new(100, 50_000, 100);

/// Self-reported emotional valence, 1 (low) to 5 (high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Mood(u8);

impl Mood {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ValueError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValueError::MoodOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Mood {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Mood> for u8 {
    fn from(mood: Mood) -> Self {
        mood.0
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Self-reported tiredness, 1 (rested) to 3 (exhausted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Fatigue(u8);

impl Fatigue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    pub fn new(value: u8) -> Result<Self, ValueError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValueError::FatigueOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Fatigue {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Fatigue> for u8 {
    fn from(fatigue: Fatigue) -> Self {
        fatigue.0
    }
}

impl fmt::Display for Fatigue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Rejections raised while constructing domain values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    AmountOutOfRange(u64),
    MoodOutOfRange(u8),
    FatigueOutOfRange(u8),
    MissingCategory,
    UnknownCategory(String),
    InvalidDuration(u32),
    NonPositive(&'static str),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::AmountOutOfRange(value) => write!(
                f,
                "amount {} is outside {}..={}",
                value, AMOUNT_BOUNDS.min, AMOUNT_BOUNDS.max
            ),
            ValueError::MoodOutOfRange(value) => write!(
                f,
                "mood {} is outside {}..={}",
                value,
                Mood::MIN,
                Mood::MAX
            ),
            ValueError::FatigueOutOfRange(value) => write!(
                f,
                "fatigue {} is outside {}..={}",
                value,
                Fatigue::MIN,
                Fatigue::MAX
            ),
            ValueError::MissingCategory => f.write_str("a category must be selected"),
            ValueError::UnknownCategory(value) => write!(f, "unknown category `{}`", value),
            ValueError::InvalidDuration(value) => {
                write!(f, "cooldown duration must be 24, 48 or 72 hours (got {})", value)
            }
            ValueError::NonPositive(field) => write!(f, "{} must be greater than zero", field),
        }
    }
}

impl std::error::Error for ValueError {}
