//! impulse-domain
//!
//! Pure domain models (Expense, CooldownTimer, Settings and their value types).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod cooldown;
pub mod expense;
pub mod settings;

pub use category::*;
pub use common::*;
pub use cooldown::*;
pub use expense::*;
pub use settings::*;
