use std::{path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use impulse_config::{Config, ConfigManager};
use impulse_core::{ImpulseTracker, Store};
use impulse_storage_json::JsonFileStore;
use tracing::debug;

use crate::errors::CliError;

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::format;
use super::output::{set_preferences, OutputPreferences};
use super::system_clock::SystemClock;

const HISTORY_FILE: &str = "history.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub tracker: ImpulseTracker,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Loads the preferences file and opens the data directory it points at.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(Config::base_dir())?;
        let config = config_manager.load()?;
        let data_dir = config.resolve_data_dir();
        debug!(path = %data_dir.display(), "opening data directory");
        let store = JsonFileStore::new(data_dir)?;
        let tracker = ImpulseTracker::new(Store::new(Arc::new(store)), Arc::new(SystemClock));
        Ok(Self::with_tracker(mode, config_manager, config, tracker))
    }

    pub fn with_tracker(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        tracker: ImpulseTracker,
    ) -> Self {
        apply_output_preferences(&config);
        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            tracker,
            last_command: None,
            running: true,
        }
    }

    /// Replaces the in-memory preferences and re-applies output styling.
    pub fn apply_config(&mut self, config: Config) {
        apply_output_preferences(&config);
        self.config = config;
    }

    /// Line-editor history, kept beside the preferences file.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.config_manager
            .config_path()
            .parent()
            .map(|dir| dir.join(HISTORY_FILE))
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub fn prompt(&self) -> String {
        match self.tracker.active_cooldown() {
            Some(timer) => format!(
                "impulse [cooldown {}]> ",
                format::remaining(self.tracker.cooldowns().remaining(&timer))
            ),
            None => "impulse> ".into(),
        }
    }

    pub fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub fn amount(&self, value: u64) -> String {
        self.config.format_amount(value as i64)
    }

    pub fn signed_amount(&self, value: i64) -> String {
        self.config.format_amount(value)
    }
}

fn apply_output_preferences(config: &Config) {
    set_preferences(OutputPreferences {
        color: config.ui_color_enabled,
        plain: config.plain_output,
    });
}
