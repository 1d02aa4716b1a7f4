use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "IMPULSE_STOPPER_HOME";

const APP_DIR_NAME: &str = "impulse_stopper";

/// Stores user-configurable CLI preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub plain_output: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the expense store. Defaults to the
    /// platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            plain_output: false,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "¥".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Application base directory: `$IMPULSE_STOPPER_HOME`, else the
    /// platform data directory, else the working directory.
    pub fn base_dir() -> PathBuf {
        if let Some(path) = std::env::var_os(DATA_DIR_ENV) {
            return PathBuf::from(path);
        }
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }

    /// Directory holding the expense, timer and settings files.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }
        Self::base_dir().join("data")
    }

    /// Updates one preference from its textual form.
    ///
    /// `currency` takes any non-empty symbol; `color` and `plain` take
    /// on/off, true/false or yes/no.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key.trim().to_ascii_lowercase().as_str() {
            "currency" => {
                let symbol = value.trim();
                if symbol.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "currency",
                        value: value.into(),
                    });
                }
                self.currency_symbol = symbol.into();
            }
            "color" | "colour" => self.ui_color_enabled = parse_switch("color", value)?,
            "plain" => self.plain_output = parse_switch("plain", value)?,
            other => return Err(ConfigError::UnknownKey(other.into())),
        }
        Ok(())
    }

    /// Formats `amount` with the configured symbol and thousands separators.
    pub fn format_amount(&self, amount: i64) -> String {
        let digits = amount.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, ch) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if amount < 0 { "-" } else { "" };
        format!("{}{}{}", sign, self.currency_symbol, grouped)
    }
}

fn parse_switch(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.into(),
        }),
    }
}
