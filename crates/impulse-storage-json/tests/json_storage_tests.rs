use std::{fs, sync::Arc};

use chrono::{DateTime, Duration, TimeZone, Utc};
use impulse_core::{Clock, ImpulseTracker, KeyValueStore, RecordingOutcome, Store, StoreKey};
use impulse_domain::{Category, PurchaseDraft, Settings, TimerDuration};
use impulse_storage_json::JsonFileStore;
use tempfile::tempdir;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn tracker_at(store: &JsonFileStore, now: DateTime<Utc>) -> ImpulseTracker {
    ImpulseTracker::new(Store::new(Arc::new(store.clone())), Arc::new(FixedClock(now)))
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 5, 18, 30, 0).unwrap()
}

#[test]
fn json_store_reads_back_written_values() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("data")).expect("create store");

    assert_eq!(store.read("impulse_stopper_settings").unwrap(), None);
    store
        .write("impulse_stopper_settings", r#"{"monthlyBudget":1}"#)
        .expect("write");

    assert_eq!(
        store.read("impulse_stopper_settings").unwrap().as_deref(),
        Some(r#"{"monthlyBudget":1}"#)
    );
    let path = store.key_path("impulse_stopper_settings");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn cooldown_survives_a_reload() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");

    let first_session = tracker_at(&store, start());
    first_session
        .save_settings(Settings {
            timer_duration: TimerDuration::TwoDays,
            ..Settings::default()
        })
        .expect("save settings");
    let RecordingOutcome::Deferred(timer) = first_session
        .record(&PurchaseDraft {
            amount: 12_000,
            mood: 2,
            fatigue: 2,
            category: Some(Category::Fashion),
        })
        .expect("record")
    else {
        panic!("expected deferred outcome");
    };

    let reopened = JsonFileStore::new(dir.path().to_path_buf()).expect("reopen store");
    let second_session = tracker_at(&reopened, start() + Duration::hours(10));
    let active = second_session.active_cooldown().expect("still active");

    assert_eq!(active, timer);
    assert_eq!(
        second_session.cooldowns().remaining(&active),
        Duration::hours(38)
    );
    assert_eq!(second_session.settings().timer_duration, TimerDuration::TwoDays);
}

#[test]
fn corrupted_file_falls_back_to_empty_history() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");
    fs::write(store.key_path(StoreKey::Expenses.as_str()), "[{\"amount\":").expect("corrupt");

    let tracker = tracker_at(&store, start());
    assert_eq!(tracker.report().expense_count, 0);

    tracker
        .record(&PurchaseDraft {
            amount: 1_200,
            mood: 4,
            fatigue: 1,
            category: Some(Category::Food),
        })
        .expect("record over corrupted file");
    assert_eq!(tracker.report().expense_count, 1);
}

#[test]
fn reset_leaves_foreign_files_alone() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");
    store.write("notes", "\"keep\"").expect("write foreign key");

    let tracker = tracker_at(&store, start());
    tracker
        .record(&PurchaseDraft {
            amount: 700,
            mood: 3,
            fatigue: 2,
            category: Some(Category::Entertainment),
        })
        .expect("record");

    assert_eq!(tracker.reset().expect("reset"), 1);
    assert_eq!(store.keys().unwrap(), vec!["notes".to_string()]);
    assert!(!store.key_path(StoreKey::Expenses.as_str()).exists());
}
