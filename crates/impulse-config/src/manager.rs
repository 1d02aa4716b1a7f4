use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Reads and writes the preferences file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Manager for `<base>/config/config.json`, creating the directory.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let dir = base.join(CONFIG_DIR);
        fs::create_dir_all(&dir)?;
        Ok(Self::new(dir.join(CONFIG_FILE)))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Stored preferences; a missing file yields the defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match fs::read_to_string(&self.config_path) {
            Ok(data) => {
                serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes `config` next to the target and renames it over the old file.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let staging = self.config_path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.config_path)?;
        Ok(())
    }

    /// Applies one `key = value` change to the stored preferences and
    /// returns the updated set. Nothing is written when the value is rejected.
    pub fn set(&self, key: &str, value: &str) -> Result<Config, ConfigError> {
        let mut config = self.load()?;
        config.apply(key, value)?;
        self.save(&config)?;
        Ok(config)
    }
}
