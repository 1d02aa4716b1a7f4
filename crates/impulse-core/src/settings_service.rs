//! Reads and replaces the singleton [`Settings`] record.

use tracing::info;

use impulse_domain::Settings;

use crate::{repository::SettingsRepository, CoreError};

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository) -> Self {
        Self { repo }
    }

    /// Returns the persisted settings, or the defaults when none are stored.
    ///
    /// Reads never write; the defaults only reach the store on the first
    /// [`SettingsService::save`], so a fresh install keeps an empty namespace.
    pub fn current(&self) -> Settings {
        self.repo.load()
    }

    /// Validates and overwrites the stored settings wholesale.
    pub fn save(&self, settings: Settings) -> Result<Settings, CoreError> {
        settings.validate()?;
        self.repo.save(&settings)?;
        info!(
            monthly_budget = settings.monthly_budget,
            impulse_threshold = settings.impulse_threshold,
            timer_hours = settings.timer_duration.hours(),
            "settings saved"
        );
        Ok(settings)
    }
}
