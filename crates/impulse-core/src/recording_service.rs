//! Threshold-gated routing of new purchases.

use std::sync::Arc;

use tracing::{debug, info};

use impulse_domain::{CooldownTimer, Expense, PurchaseDraft};

use crate::{
    repository::{ExpenseRepository, SettingsRepository},
    time::Clock,
    CoreError,
};

/// Result of submitting a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingOutcome {
    /// Below the impulse threshold; the expense is already persisted.
    Immediate(Expense),
    /// At or above the threshold; the timer still has to be started.
    Deferred(CooldownTimer),
}

impl RecordingOutcome {
    pub fn is_deferred(&self) -> bool {
        matches!(self, RecordingOutcome::Deferred(_))
    }
}

#[derive(Clone)]
pub struct RecordingService {
    expenses: ExpenseRepository,
    settings: SettingsRepository,
    clock: Arc<dyn Clock>,
}

impl RecordingService {
    pub fn new(
        expenses: ExpenseRepository,
        settings: SettingsRepository,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            expenses,
            settings,
            clock,
        }
    }

    /// Validates `draft`, then either records it or builds a cooldown timer
    /// for it. Invalid drafts are rejected before anything is persisted.
    pub fn submit(&self, draft: &PurchaseDraft) -> Result<RecordingOutcome, CoreError> {
        let candidate = draft.validate()?;
        let settings = self.settings.load();
        let now = self.clock.now();

        if settings.defers(candidate.amount) {
            let timer = CooldownTimer::new(&candidate, settings.timer_duration, now);
            debug!(
                amount = candidate.amount,
                threshold = settings.impulse_threshold,
                timer = %timer.id,
                "purchase deferred into cooldown"
            );
            return Ok(RecordingOutcome::Deferred(timer));
        }

        let expense = Expense::record(&candidate, now);
        self.expenses.append(expense.clone())?;
        info!(
            expense = %expense.id,
            amount = expense.amount,
            category = expense.category.key(),
            "expense recorded"
        );
        Ok(RecordingOutcome::Immediate(expense))
    }
}
