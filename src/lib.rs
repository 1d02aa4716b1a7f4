#![doc(test(attr(deny(warnings))))]

//! Impulse Stopper records discretionary purchases together with the mood
//! and fatigue behind them, holds large ones in a cooldown, and reports the
//! spending patterns that emerge.

pub mod cli;
pub mod errors;
pub mod utils;

pub use impulse_config as config;
pub use impulse_core as core;
pub use impulse_domain as domain;
pub use impulse_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Impulse Stopper tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
