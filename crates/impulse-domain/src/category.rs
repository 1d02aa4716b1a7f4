//! Purchase categories.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::ValueError;

/// Fixed set of discretionary spending categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Shopping,
    Entertainment,
    Fashion,
    Beauty,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Shopping,
        Category::Entertainment,
        Category::Fashion,
        Category::Beauty,
        Category::Other,
    ];

    /// Stable identifier used in persisted records and command arguments.
    pub fn key(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Shopping => "shopping",
            Category::Entertainment => "entertainment",
            Category::Fashion => "fashion",
            Category::Beauty => "beauty",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Food => "Food",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Fashion => "Fashion",
            Category::Beauty => "Beauty",
            Category::Other => "Other",
        };
        f.pad(label)
    }
}

impl FromStr for Category {
    type Err = ValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueError::MissingCategory);
        }
        Category::ALL
            .into_iter()
            .find(|category| category.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValueError::UnknownCategory(trimmed.to_string()))
    }
}
