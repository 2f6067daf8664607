//! Error types for scene configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("gravity must be finite and negative, got {0}")]
    Gravity(f64),

    #[error("ball radius must be finite and positive, got {0}")]
    Radius(f64),

    #[error("start height {start} is below floor contact {contact}")]
    StartBelowFloor { start: f64, contact: f64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
