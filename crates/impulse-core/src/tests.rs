use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc, Weekday};
use uuid::Uuid;

use crate::{
    stats_service::{
        average_fatigue, average_mood, avoided_count, busiest_day, category_breakdown,
        day_of_week_histogram, insights, monthly_spend, start_of_month, BudgetStatus, Insight,
        SpendingReport,
    },
    storage::{KeyValueStore, MemoryStore, Store, StoreKey},
    repository::{ExpenseRepository, SettingsRepository, TimerRepository},
    time::Clock,
    CoreError, ImpulseTracker, RecordingOutcome,
};
use impulse_domain::{
    Category, CooldownState, Expense, Fatigue, Mood, PurchaseDraft, Settings, TimerDuration,
    ValueError,
};

struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(now)))
    }

    fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 14, 12, 0, 0).unwrap()
}

fn tracker() -> (ImpulseTracker, Arc<ManualClock>, Store) {
    let clock = ManualClock::at(start());
    let store = Store::in_memory();
    (ImpulseTracker::new(store.clone(), clock.clone()), clock, store)
}

fn draft(amount: u64, mood: u8, fatigue: u8, category: Category) -> PurchaseDraft {
    PurchaseDraft {
        amount,
        mood,
        fatigue,
        category: Some(category),
    }
}

fn expense(amount: u64, category: Category, at: DateTime<Utc>) -> Expense {
    Expense {
        id: Uuid::new_v4(),
        amount,
        mood: Mood::new(3).unwrap(),
        fatigue: Fatigue::new(2).unwrap(),
        category,
        timestamp: at,
        avoided: None,
    }
}

fn expenses(store: &Store) -> Vec<Expense> {
    ExpenseRepository::new(store.clone()).all()
}

#[test]
fn small_purchase_is_recorded_immediately() {
    let (tracker, _clock, store) = tracker();
    let before = tracker.home().budget.spent;

    let outcome = tracker
        .record(&draft(3_000, 4, 1, Category::Food))
        .expect("record");

    let RecordingOutcome::Immediate(recorded) = outcome else {
        panic!("expected immediate outcome");
    };
    assert_eq!(recorded.timestamp, start());
    assert_eq!(recorded.avoided, None);
    assert_eq!(expenses(&store), vec![recorded]);
    assert_eq!(tracker.home().budget.spent, before + 3_000);
    assert!(tracker.active_cooldown().is_none());
}

#[test]
fn large_purchase_starts_a_cooldown_instead() {
    let (tracker, _clock, store) = tracker();

    let outcome = tracker
        .record(&draft(8_000, 2, 3, Category::Shopping))
        .expect("record");

    let RecordingOutcome::Deferred(timer) = outcome else {
        panic!("expected deferred outcome");
    };
    assert!(expenses(&store).is_empty());
    assert_eq!(
        (timer.end_time - timer.start_time).num_milliseconds(),
        24 * 3_600_000
    );
    assert_eq!(tracker.active_cooldown(), Some(timer.clone()));
    assert_eq!(TimerRepository::new(store).all(), vec![timer]);
}

#[test]
fn threshold_routing_holds_for_varied_settings() {
    for threshold in [1_000, 4_500, 30_000] {
        let (tracker, _clock, store) = tracker();
        tracker
            .save_settings(Settings {
                impulse_threshold: threshold,
                ..Settings::default()
            })
            .expect("save settings");

        let below = tracker
            .record(&draft(threshold - 100, 3, 2, Category::Other))
            .expect("below threshold");
        assert!(!below.is_deferred());
        assert_eq!(expenses(&store).len(), 1);

        let at = tracker
            .record(&draft(threshold, 3, 2, Category::Other))
            .expect("at threshold");
        assert!(at.is_deferred());
        assert_eq!(expenses(&store).len(), 1);
    }
}

#[test]
fn submit_does_not_persist_deferred_timer() {
    let clock = ManualClock::at(start());
    let store = Store::in_memory();
    let recording = crate::RecordingService::new(
        ExpenseRepository::new(store.clone()),
        SettingsRepository::new(store.clone()),
        clock,
    );

    let outcome = recording
        .submit(&draft(9_000, 3, 2, Category::Fashion))
        .expect("submit");

    assert!(outcome.is_deferred());
    assert!(TimerRepository::new(store.clone()).all().is_empty());
    assert!(expenses(&store).is_empty());
}

#[test]
fn resolving_as_avoided_counts_without_spending() {
    let (tracker, clock, store) = tracker();
    let RecordingOutcome::Deferred(timer) = tracker
        .record(&draft(8_000, 2, 3, Category::Shopping))
        .expect("record")
    else {
        panic!("expected deferred outcome");
    };
    clock.advance(Duration::hours(2));

    let expense = tracker
        .resolve_cooldown(timer.id, true)
        .expect("resolve")
        .expect("expense created");

    assert_eq!(expense.amount, 8_000);
    assert_eq!(expense.category, Category::Shopping);
    assert_eq!(expense.mood, timer.mood);
    assert_eq!(expense.fatigue, timer.fatigue);
    assert_eq!(expense.avoided, Some(true));
    assert_eq!(expense.timestamp, start() + Duration::hours(2));

    let home = tracker.home();
    assert_eq!(home.avoided_count, 1);
    assert_eq!(home.budget.spent, 0);
    assert!(home.active_cooldown.is_none());
    assert_eq!(expenses(&store).len(), 1);

    let stored = tracker.cooldowns().find(timer.id).expect("timer kept");
    assert!(stored.completed);
}

#[test]
fn resolving_as_purchased_adds_to_spend() {
    let (tracker, _clock, _store) = tracker();
    let RecordingOutcome::Deferred(timer) = tracker
        .record(&draft(6_000, 4, 1, Category::Beauty))
        .expect("record")
    else {
        panic!("expected deferred outcome");
    };

    let expense = tracker
        .resolve_cooldown(timer.id, false)
        .expect("resolve")
        .expect("expense created");

    assert_eq!(expense.avoided, Some(false));
    assert_eq!(tracker.home().budget.spent, 6_000);
    assert_eq!(tracker.home().avoided_count, 0);
}

#[test]
fn second_resolution_is_a_no_op() {
    let (tracker, _clock, store) = tracker();
    let RecordingOutcome::Deferred(timer) = tracker
        .record(&draft(7_000, 3, 2, Category::Entertainment))
        .expect("record")
    else {
        panic!("expected deferred outcome");
    };

    assert!(tracker.resolve_cooldown(timer.id, true).unwrap().is_some());
    assert!(tracker.resolve_cooldown(timer.id, false).unwrap().is_none());
    assert_eq!(expenses(&store).len(), 1);
}

#[test]
fn resolving_unknown_timer_reports_not_found() {
    let (tracker, _clock, _store) = tracker();
    let id = Uuid::new_v4();
    assert!(matches!(
        tracker.resolve_cooldown(id, true),
        Err(CoreError::CooldownNotFound(missing)) if missing == id
    ));
}

#[test]
fn second_cooldown_is_rejected_while_one_is_active() {
    let (tracker, clock, store) = tracker();
    let RecordingOutcome::Deferred(first) = tracker
        .record(&draft(8_000, 2, 3, Category::Shopping))
        .expect("record")
    else {
        panic!("expected deferred outcome");
    };

    let err = tracker
        .record(&draft(12_000, 1, 3, Category::Fashion))
        .expect_err("second cooldown must be rejected");
    assert!(matches!(err, CoreError::CooldownActive(id) if id == first.id));
    assert_eq!(TimerRepository::new(store.clone()).all().len(), 1);

    clock.advance(Duration::hours(25));
    assert!(tracker
        .record(&draft(12_000, 1, 3, Category::Fashion))
        .expect("record after expiry")
        .is_deferred());
    assert_eq!(TimerRepository::new(store).all().len(), 2);
}

#[test]
fn expired_timer_is_inactive_but_still_resolvable() {
    let (tracker, clock, _store) = tracker();
    let RecordingOutcome::Deferred(timer) = tracker
        .record(&draft(8_000, 2, 3, Category::Shopping))
        .expect("record")
    else {
        panic!("expected deferred outcome");
    };

    clock.advance(Duration::hours(24));
    assert!(tracker.active_cooldown().is_none());
    assert_eq!(tracker.cooldowns().remaining(&timer), Duration::zero());

    let unresolved = tracker.unresolved_cooldowns();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].state(tracker.now()), CooldownState::Expired);
    assert!(!unresolved[0].completed);

    assert!(tracker.resolve_cooldown(timer.id, true).unwrap().is_some());
    assert!(tracker.unresolved_cooldowns().is_empty());
}

#[test]
fn start_uses_requested_duration() {
    let (tracker, _clock, _store) = tracker();
    let candidate = draft(9_500, 3, 2, Category::Other).validate().unwrap();

    let timer = tracker
        .cooldowns()
        .start(&candidate, TimerDuration::ThreeDays)
        .expect("start");

    assert_eq!(timer.window(), Duration::hours(72));
    assert_eq!(tracker.cooldowns().remaining(&timer), Duration::hours(72));
    assert_eq!(tracker.active_cooldown(), Some(timer));
}

#[test]
fn invalid_drafts_persist_nothing() {
    let (tracker, _clock, store) = tracker();
    let no_category = PurchaseDraft {
        category: None,
        ..draft(3_000, 3, 2, Category::Food)
    };

    assert!(matches!(
        tracker.record(&no_category),
        Err(CoreError::Validation(ValueError::MissingCategory))
    ));
    assert!(matches!(
        tracker.record(&draft(3_000, 7, 2, Category::Food)),
        Err(CoreError::Validation(ValueError::MoodOutOfRange(7)))
    ));
    assert!(matches!(
        tracker.record(&draft(60_000, 3, 2, Category::Food)),
        Err(CoreError::Validation(ValueError::AmountOutOfRange(60_000)))
    ));
    assert!(expenses(&store).is_empty());
    assert!(tracker.unresolved_cooldowns().is_empty());
}

#[test]
fn settings_round_trip_and_defaults() {
    let (tracker, _clock, _store) = tracker();
    assert_eq!(tracker.settings(), Settings::default());

    let custom = Settings {
        monthly_budget: 120_000,
        impulse_threshold: 2_500,
        timer_duration: TimerDuration::TwoDays,
    };
    tracker.save_settings(custom).expect("save");
    assert_eq!(tracker.settings(), custom);

    let invalid = Settings {
        impulse_threshold: 0,
        ..custom
    };
    assert!(tracker.save_settings(invalid).is_err());
    assert_eq!(tracker.settings(), custom);
}

#[test]
fn deferred_timer_uses_configured_duration() {
    let (tracker, _clock, _store) = tracker();
    tracker
        .save_settings(Settings {
            timer_duration: TimerDuration::TwoDays,
            ..Settings::default()
        })
        .expect("save");

    let RecordingOutcome::Deferred(timer) = tracker
        .record(&draft(5_000, 3, 2, Category::Food))
        .expect("record")
    else {
        panic!("expected deferred outcome");
    };
    assert_eq!(timer.window(), Duration::hours(48));
}

#[test]
fn malformed_values_fall_back_to_defaults() {
    let backend = Arc::new(MemoryStore::new());
    backend
        .write(StoreKey::Expenses.as_str(), "{not json")
        .unwrap();
    backend
        .write(StoreKey::Settings.as_str(), r#"{"monthlyBudget":"lots"}"#)
        .unwrap();
    backend
        .write(
            StoreKey::Timers.as_str(),
            r#"[{"id":"x","amount":1,"mood":9}]"#,
        )
        .unwrap();
    let store = Store::new(backend);

    assert!(ExpenseRepository::new(store.clone()).all().is_empty());
    assert!(TimerRepository::new(store.clone()).all().is_empty());
    assert_eq!(SettingsRepository::new(store).load(), Settings::default());
}

#[test]
fn reset_clears_only_the_namespace() {
    let backend = Arc::new(MemoryStore::new());
    backend.write("unrelated_key", "keep me").unwrap();
    let store = Store::new(backend.clone());
    let clock = ManualClock::at(start());
    let tracker = ImpulseTracker::new(store, clock);

    tracker.record(&draft(3_000, 4, 1, Category::Food)).unwrap();
    tracker.record(&draft(8_000, 2, 3, Category::Food)).unwrap();
    tracker.save_settings(Settings::default()).unwrap();

    assert_eq!(tracker.reset().unwrap(), 3);
    assert_eq!(backend.keys().unwrap(), vec!["unrelated_key".to_string()]);
    assert!(tracker.active_cooldown().is_none());
    assert_eq!(tracker.home().budget.spent, 0);
}

#[test]
fn repositories_write_only_their_own_key() {
    let store = Store::in_memory();
    let expenses = ExpenseRepository::new(store.clone());
    let settings = SettingsRepository::new(store.clone());
    expenses
        .append(expense(500, Category::Food, start()))
        .unwrap();
    settings
        .save(&Settings {
            monthly_budget: 90_000,
            ..Settings::default()
        })
        .unwrap();

    expenses.save_all(&[]).unwrap();

    assert!(expenses.all().is_empty());
    assert_eq!(settings.load().monthly_budget, 90_000);
}

#[test]
fn timer_update_ignores_unknown_ids() {
    let timers = TimerRepository::new(Store::in_memory());
    let updated = timers
        .update(Uuid::new_v4(), |timer| timer.completed = true)
        .unwrap();
    assert!(updated.is_none());
}

#[test]
fn empty_history_has_no_averages() {
    let (tracker, _clock, _store) = tracker();
    let report = tracker.report();

    assert!(report.is_empty());
    assert_eq!(report.average_mood, None);
    assert_eq!(report.average_fatigue, None);
    assert_eq!(report.histogram, [0; 7]);
    assert_eq!(report.busiest_day, None);
    assert!(report.categories.is_empty());
    assert!(report.insights.is_empty());
}

#[test]
fn averages_include_avoided_expenses() {
    let mut avoided = expense(8_000, Category::Shopping, start());
    avoided.mood = Mood::new(1).unwrap();
    avoided.fatigue = Fatigue::new(3).unwrap();
    avoided.avoided = Some(true);
    let kept = expense(2_000, Category::Food, start());

    let all = vec![avoided, kept];
    assert_eq!(average_mood(&all), Some(2.0));
    assert_eq!(average_fatigue(&all), Some(2.5));
    assert_eq!(avoided_count(&all), 1);
}

#[test]
fn monthly_spend_skips_previous_month_and_avoided() {
    let now = Utc.with_ymd_and_hms(2025, 5, 20, 10, 0, 0).unwrap();
    let mut avoided = expense(9_000, Category::Fashion, now);
    avoided.avoided = Some(true);
    let mut purchased_after_cooldown = expense(6_000, Category::Beauty, now);
    purchased_after_cooldown.avoided = Some(false);
    let all = vec![
        expense(1_000, Category::Food, Utc.with_ymd_and_hms(2025, 4, 30, 23, 59, 59).unwrap()),
        expense(2_000, Category::Food, Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()),
        avoided,
        purchased_after_cooldown,
    ];

    assert_eq!(monthly_spend(&all, now, &Utc), 8_000);
}

#[test]
fn month_start_follows_the_given_timezone() {
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    // 2025-05-31T20:00Z is already June 1st in Tokyo.
    let now = Utc.with_ymd_and_hms(2025, 5, 31, 20, 0, 0).unwrap();

    assert_eq!(
        start_of_month(now, &tokyo),
        Utc.with_ymd_and_hms(2025, 5, 31, 15, 0, 0).unwrap()
    );
    assert_eq!(
        start_of_month(now, &Utc),
        Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()
    );
}

#[test]
fn budget_status_caps_percentage_and_guards_zero_budget() {
    let over = BudgetStatus::new(50_000, 65_000);
    assert_eq!(over.remaining, -15_000);
    assert_eq!(over.percent_used, Some(100.0));
    assert!(over.is_over_budget());

    let partial = BudgetStatus::new(50_000, 12_500);
    assert_eq!(partial.percent_used, Some(25.0));
    assert_eq!(partial.remaining, 37_500);

    assert_eq!(BudgetStatus::new(0, 100).percent_used, None);
}

#[test]
fn histogram_uses_sunday_first_local_days() {
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    // Thursday 20:00 UTC is Friday 05:00 in Tokyo.
    let thursday_evening = Utc.with_ymd_and_hms(2025, 5, 15, 20, 0, 0).unwrap();
    let monday = Utc.with_ymd_and_hms(2025, 5, 12, 12, 0, 0).unwrap();
    let all = vec![
        expense(1_000, Category::Food, thursday_evening),
        expense(1_000, Category::Food, thursday_evening),
        expense(1_000, Category::Food, monday),
    ];

    let utc_hist = day_of_week_histogram(&all, &Utc);
    assert_eq!(utc_hist, [0, 1, 0, 0, 2, 0, 0]);
    assert!(!insights(None, None, &utc_hist).contains(&Insight::FridaySpending));

    let tokyo_hist = day_of_week_histogram(&all, &tokyo);
    assert_eq!(tokyo_hist, [0, 1, 0, 0, 0, 2, 0]);
    assert_eq!(busiest_day(&tokyo_hist), Some(Weekday::Fri));
    assert_eq!(
        insights(None, None, &tokyo_hist),
        vec![Insight::FridaySpending]
    );
}

#[test]
fn busiest_day_prefers_earliest_on_ties() {
    assert_eq!(busiest_day(&[0, 2, 0, 2, 0, 0, 0]), Some(Weekday::Mon));
    assert_eq!(busiest_day(&[0; 7]), None);
}

#[test]
fn insights_follow_average_thresholds() {
    let hist = [0; 7];
    assert_eq!(
        insights(Some(2.5), Some(2.5), &hist),
        vec![Insight::FatigueDriven, Insight::MoodDriven]
    );
    assert!(insights(Some(2.6), Some(2.4), &hist).is_empty());
}

#[test]
fn category_breakdown_sorts_by_total_and_keeps_tie_order() {
    let at = start();
    let all = vec![
        expense(1_000, Category::Beauty, at),
        expense(3_000, Category::Food, at),
        expense(2_000, Category::Shopping, at),
        expense(1_000, Category::Shopping, at),
        expense(3_000, Category::Other, at),
    ];

    let breakdown = category_breakdown(&all);
    let order: Vec<_> = breakdown.iter().map(|entry| entry.category).collect();
    assert_eq!(
        order,
        vec![
            Category::Food,
            Category::Shopping,
            Category::Other,
            Category::Beauty
        ]
    );
    assert_eq!(breakdown[1].count, 2);
    assert_eq!(breakdown[1].total, 3_000);
    assert_eq!(breakdown[1].average(), 1_500);
}

#[test]
fn aggregation_is_idempotent() {
    let at = start();
    let all = vec![
        expense(1_000, Category::Beauty, at),
        expense(4_000, Category::Food, at - Duration::days(3)),
    ];

    let first = SpendingReport::from_expenses(&all, &Utc);
    let second = SpendingReport::from_expenses(&all, &Utc);
    assert_eq!(first, second);
    assert_eq!(monthly_spend(&all, at, &Utc), monthly_spend(&all, at, &Utc));
}

/// Memory backend that can refuse writes to one key.
struct RefusingStore {
    inner: MemoryStore,
    refused: Mutex<Option<&'static str>>,
}

impl RefusingStore {
    fn refuse(&self, key: Option<&'static str>) {
        *self.refused.lock().unwrap() = key;
    }
}

impl KeyValueStore for RefusingStore {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        if *self.refused.lock().unwrap() == Some(key) {
            return Err(CoreError::Storage(format!("write to {key} refused")));
        }
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        self.inner.keys()
    }
}

#[test]
fn failed_expense_write_leaves_cooldown_resolvable() {
    let backend = Arc::new(RefusingStore {
        inner: MemoryStore::new(),
        refused: Mutex::new(None),
    });
    let clock = ManualClock::at(start());
    let tracker = ImpulseTracker::new(Store::new(backend.clone()), clock);

    let RecordingOutcome::Deferred(timer) = tracker
        .record(&draft(9_000, 2, 2, Category::Fashion))
        .unwrap()
    else {
        panic!("expected deferral");
    };

    backend.refuse(Some(StoreKey::Expenses.as_str()));
    assert!(matches!(
        tracker.resolve_cooldown(timer.id, true),
        Err(CoreError::Storage(_))
    ));
    assert_eq!(tracker.unresolved_cooldowns(), vec![timer.clone()]);
    assert_eq!(tracker.report().expense_count, 0);

    backend.refuse(None);
    let expense = tracker
        .resolve_cooldown(timer.id, true)
        .unwrap()
        .expect("retry records the expense");
    assert_eq!(expense.avoided, Some(true));
    assert_eq!(tracker.home().avoided_count, 1);
    assert!(tracker.unresolved_cooldowns().is_empty());
}

#[test]
fn reading_settings_does_not_persist_defaults() {
    let backend = Arc::new(MemoryStore::new());
    let tracker = ImpulseTracker::new(Store::new(backend.clone()), ManualClock::at(start()));

    assert_eq!(tracker.settings(), Settings::default());
    assert!(backend.keys().unwrap().is_empty());

    tracker.save_settings(Settings::default()).unwrap();
    assert_eq!(
        backend.keys().unwrap(),
        vec![StoreKey::Settings.as_str().to_string()]
    );
}
