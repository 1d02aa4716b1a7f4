//! impulse-config
//!
//! Persistent CLI preferences (display and data location).
//! Owns the Config data structure plus disk persistence helpers. Budget and
//! cooldown settings live in the store, not here.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
