use impulse_domain::ValueError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValueError),
    #[error("Cooldown {0} is still running; resolve it before starting another")]
    CooldownActive(Uuid),
    #[error("Cooldown not found: {0}")]
    CooldownNotFound(Uuid),
}
