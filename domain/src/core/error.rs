//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown synthesis mode: {0}")]
    UnknownSynthesisMode(String),

    #[error("Unknown arbitration input: {0}")]
    UnknownArbitrationInput(String),

    #[error("Unknown source capability: {0}")]
    UnknownCapability(String),
}

impl DomainError {
    /// Check if this error came from parsing a configuration value
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, DomainError::EmptyQuery)
    }
}
