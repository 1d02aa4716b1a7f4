//! Stable, public-facing entry point that wires the services to one store.
//!
//! Frontends (the CLI, tests) build an [`ImpulseTracker`] from a [`Store`]
//! and a [`Clock`] instead of assembling repositories themselves.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use impulse_domain::{CooldownTimer, Expense, PurchaseDraft, Settings};

use crate::{
    cooldown_service::CooldownService,
    recording_service::{RecordingOutcome, RecordingService},
    repository::{ExpenseRepository, SettingsRepository, TimerRepository},
    settings_service::SettingsService,
    stats_service::{BudgetStatus, SpendingReport, StatsService},
    storage::Store,
    time::Clock,
    CoreError,
};

/// Figures shown on the home view.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeSummary {
    pub budget: BudgetStatus,
    pub avoided_count: usize,
    pub active_cooldown: Option<CooldownTimer>,
}

#[derive(Clone)]
pub struct ImpulseTracker {
    store: Store,
    clock: Arc<dyn Clock>,
    settings: SettingsService,
    recording: RecordingService,
    cooldowns: CooldownService,
    stats: StatsService,
}

impl ImpulseTracker {
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        let expenses = ExpenseRepository::new(store.clone());
        let timers = TimerRepository::new(store.clone());
        let settings = SettingsRepository::new(store.clone());
        Self {
            settings: SettingsService::new(settings.clone()),
            recording: RecordingService::new(expenses.clone(), settings.clone(), clock.clone()),
            cooldowns: CooldownService::new(timers, expenses.clone(), clock.clone()),
            stats: StatsService::new(expenses, settings, clock.clone()),
            store,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn cooldowns(&self) -> &CooldownService {
        &self.cooldowns
    }

    pub fn stats(&self) -> &StatsService {
        &self.stats
    }

    pub fn settings(&self) -> Settings {
        self.settings.current()
    }

    pub fn save_settings(&self, settings: Settings) -> Result<Settings, CoreError> {
        self.settings.save(settings)
    }

    /// Submits a purchase and, when it is deferred, starts its cooldown.
    pub fn record(&self, draft: &PurchaseDraft) -> Result<RecordingOutcome, CoreError> {
        let outcome = self.recording.submit(draft)?;
        match outcome {
            RecordingOutcome::Deferred(timer) => {
                let started = self.cooldowns.begin(timer)?;
                Ok(RecordingOutcome::Deferred(started))
            }
            immediate => Ok(immediate),
        }
    }

    pub fn active_cooldown(&self) -> Option<CooldownTimer> {
        self.cooldowns.active()
    }

    pub fn unresolved_cooldowns(&self) -> Vec<CooldownTimer> {
        self.cooldowns.unresolved()
    }

    pub fn resolve_cooldown(&self, id: Uuid, avoided: bool) -> Result<Option<Expense>, CoreError> {
        self.cooldowns.resolve(id, avoided)
    }

    pub fn home(&self) -> HomeSummary {
        HomeSummary {
            budget: self.stats.budget_status(),
            avoided_count: self.stats.avoided_count(),
            active_cooldown: self.cooldowns.active(),
        }
    }

    pub fn report(&self) -> SpendingReport {
        self.stats.report()
    }

    /// Wipes every collection and the settings. Returns the number of keys
    /// removed.
    pub fn reset(&self) -> Result<usize, CoreError> {
        let removed = self.store.clear()?;
        info!(removed, "store reset");
        Ok(removed)
    }
}
