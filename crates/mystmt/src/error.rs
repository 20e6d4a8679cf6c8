//! Error types for mystmt

use thiserror::Error;

/// Result type alias for statement building
pub type StmtResult<T> = Result<T, StmtError>;

/// Error types raised while assembling a statement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StmtError {
    /// A builder method or helper received an argument it cannot use
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The statement cannot be rendered with its current combination of clauses
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl StmtError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is an invalid state error
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }

    /// The human readable message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument(m) | Self::InvalidState(m) | Self::Config(m) => m,
        }
    }
}

impl From<toml::de::Error> for StmtError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
