use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Unknown preference `{0}`; use currency, color or plain")]
    UnknownKey(String),

    #[error("Invalid value `{value}` for {key}")]
    InvalidValue { key: &'static str, value: String },
}
