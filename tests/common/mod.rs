#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use impulse_stopper::core::{Clock, ImpulseTracker, Store};
use impulse_stopper::storage::JsonFileStore;
use tempfile::TempDir;

/// Clock that only moves when a test advances it.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

pub fn mid_month() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 14, 12, 0, 0).unwrap()
}

/// Isolated data directory plus a clock shared by every session.
pub struct TestEnv {
    pub dir: TempDir,
    pub store: JsonFileStore,
    pub clock: Arc<ManualClock>,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let store = JsonFileStore::new(dir.path().join("data")).expect("create json store");
        Self {
            dir,
            store,
            clock: ManualClock::new(mid_month()),
        }
    }

    /// A fresh tracker over the same files, as a new session would open them.
    pub fn session(&self) -> ImpulseTracker {
        let clock: Arc<dyn Clock> = self.clock.clone();
        ImpulseTracker::new(Store::new(Arc::new(self.store.clone())), clock)
    }
}
