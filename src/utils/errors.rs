//! Error handling for stepflow
//!
//! This module defines the main error type used throughout the library
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for stepflow operations
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown step: {step}")]
    UnknownStep { step: String },

    #[error("Malformed callback payload: {0}")]
    MalformedCallback(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for stepflow operations
pub type Result<T> = std::result::Result<T, FlowError>;

impl FlowError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            FlowError::Database(_) => false,
            FlowError::Migration(_) => false,
            FlowError::Telegram(_) => true,
            FlowError::Config(_) => false,
            FlowError::UnknownStep { .. } => false,
            FlowError::MalformedCallback(_) => false,
            FlowError::Serialization(_) => false,
            FlowError::Io(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_step_display() {
        let err = FlowError::UnknownStep {
            step: "confirmation".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown step: confirmation");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_malformed_callback_display() {
        let err = FlowError::MalformedCallback("no prefix".to_string());
        assert_eq!(err.to_string(), "Malformed callback payload: no prefix");
    }
}
