//! Cooldown timer lifecycle: start, query, resolve.
//!
//! Timers are evaluated lazily against the clock; nothing fires at expiry.
//! An expired timer stays unresolved until the user picks an outcome.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use impulse_domain::{CooldownTimer, Expense, PurchaseCandidate, TimerDuration};

use crate::{
    repository::{ExpenseRepository, TimerRepository},
    time::Clock,
    CoreError,
};

#[derive(Clone)]
pub struct CooldownService {
    timers: TimerRepository,
    expenses: ExpenseRepository,
    clock: Arc<dyn Clock>,
}

impl CooldownService {
    pub fn new(timers: TimerRepository, expenses: ExpenseRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            timers,
            expenses,
            clock,
        }
    }

    /// Builds a timer for `candidate` starting now and persists it.
    pub fn start(
        &self,
        candidate: &PurchaseCandidate,
        duration: TimerDuration,
    ) -> Result<CooldownTimer, CoreError> {
        let timer = CooldownTimer::new(candidate, duration, self.clock.now());
        self.begin(timer)
    }

    /// Persists an already constructed timer.
    ///
    /// Only one timer may be active at a time; a second one is rejected with
    /// [`CoreError::CooldownActive`].
    pub fn begin(&self, timer: CooldownTimer) -> Result<CooldownTimer, CoreError> {
        if let Some(active) = self.active() {
            return Err(CoreError::CooldownActive(active.id));
        }
        self.timers.append(timer.clone())?;
        info!(
            timer = %timer.id,
            amount = timer.amount,
            ends_at = %timer.end_time,
            "cooldown started"
        );
        Ok(timer)
    }

    /// First unresolved timer whose window has not closed yet.
    pub fn active(&self) -> Option<CooldownTimer> {
        let now = self.clock.now();
        self.timers
            .all()
            .into_iter()
            .find(|timer| timer.is_active(now))
    }

    /// Every timer still waiting for a decision, expired ones included.
    pub fn unresolved(&self) -> Vec<CooldownTimer> {
        self.timers
            .all()
            .into_iter()
            .filter(|timer| !timer.completed)
            .collect()
    }

    pub fn find(&self, id: Uuid) -> Option<CooldownTimer> {
        self.timers.find(id)
    }

    pub fn remaining(&self, timer: &CooldownTimer) -> Duration {
        timer.remaining(self.clock.now())
    }

    /// Marks the timer completed and records the resulting expense.
    ///
    /// Resolving an already completed timer is a no-op and yields `None`.
    /// When the expense cannot be written the timer is reopened, so the
    /// call can be retried.
    pub fn resolve(&self, id: Uuid, avoided: bool) -> Result<Option<Expense>, CoreError> {
        let timer = self.timers.find(id).ok_or(CoreError::CooldownNotFound(id))?;
        if timer.completed {
            debug!(timer = %id, "cooldown already resolved");
            return Ok(None);
        }

        self.timers
            .update(id, |timer| timer.completed = true)?
            .ok_or(CoreError::CooldownNotFound(id))?;

        let expense = Expense::from_cooldown(&timer, avoided, self.clock.now());
        if let Err(err) = self.expenses.append(expense.clone()) {
            warn!(timer = %id, error = %err, "expense write failed; reopening cooldown");
            self.timers.update(id, |timer| timer.completed = false)?;
            return Err(err);
        }
        info!(timer = %id, expense = %expense.id, avoided, "cooldown resolved");
        Ok(Some(expense))
    }
}
