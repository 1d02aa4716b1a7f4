//! Typed repositories over the three persisted collections.
//!
//! Every mutation is a whole-collection read-modify-write.

use uuid::Uuid;

use impulse_domain::{CooldownTimer, Expense, Settings};

use crate::{
    storage::{Store, StoreKey},
    CoreError,
};

#[derive(Clone)]
pub struct ExpenseRepository {
    store: Store,
}

impl ExpenseRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All expenses in insertion order.
    pub fn all(&self) -> Vec<Expense> {
        self.store.get(StoreKey::Expenses)
    }

    pub fn save_all(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        self.store.set(StoreKey::Expenses, expenses)
    }

    pub fn append(&self, expense: Expense) -> Result<(), CoreError> {
        let mut expenses = self.all();
        expenses.push(expense);
        self.save_all(&expenses)
    }
}

#[derive(Clone)]
pub struct TimerRepository {
    store: Store,
}

impl TimerRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn all(&self) -> Vec<CooldownTimer> {
        self.store.get(StoreKey::Timers)
    }

    pub fn save_all(&self, timers: &[CooldownTimer]) -> Result<(), CoreError> {
        self.store.set(StoreKey::Timers, timers)
    }

    pub fn append(&self, timer: CooldownTimer) -> Result<(), CoreError> {
        let mut timers = self.all();
        timers.push(timer);
        self.save_all(&timers)
    }

    pub fn find(&self, id: Uuid) -> Option<CooldownTimer> {
        self.all().into_iter().find(|timer| timer.id == id)
    }

    /// Applies `update` to the timer with `id` in place and persists the
    /// collection. Returns the updated timer, or `None` when no timer matches.
    pub fn update<F>(&self, id: Uuid, update: F) -> Result<Option<CooldownTimer>, CoreError>
    where
        F: FnOnce(&mut CooldownTimer),
    {
        let mut timers = self.all();
        let Some(timer) = timers.iter_mut().find(|timer| timer.id == id) else {
            return Ok(None);
        };
        update(timer);
        let updated = timer.clone();
        self.save_all(&timers)?;
        Ok(Some(updated))
    }
}

#[derive(Clone)]
pub struct SettingsRepository {
    store: Store,
}

impl SettingsRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Stored settings, or the defaults when none were saved yet.
    pub fn load(&self) -> Settings {
        self.store.get(StoreKey::Settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        self.store.set(StoreKey::Settings, settings)
    }
}
