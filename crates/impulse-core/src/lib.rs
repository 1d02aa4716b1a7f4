//! impulse-core
//!
//! Business logic and services for Impulse Stopper.
//! Depends on impulse-domain. No CLI, no terminal I/O; persistence goes
//! through the injected [`storage::Store`] handle.

pub mod cooldown_service;
pub mod error;
pub mod recording_service;
pub mod repository;
pub mod settings_service;
pub mod stats_service;
pub mod storage;
pub mod time;
pub mod tracker;

pub use cooldown_service::*;
pub use error::CoreError;
pub use recording_service::*;
pub use repository::*;
pub use settings_service::*;
pub use stats_service::*;
pub use storage::{KeyValueStore, MemoryStore, Store, StoreKey, NAMESPACE};
pub use time::Clock;
pub use tracker::*;

#[cfg(test)]
mod tests;
