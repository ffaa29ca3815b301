//! Unified error types for the user registry service.

use thiserror::Error;

/// Unified error type for service bootstrap and wiring.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Metrics recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised by [`crate::users::UserRegistry`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A required input field was missing or empty.
    #[error("{0}")]
    Validation(String),

    /// The username or email is already taken.
    #[error("{0}")]
    Conflict(String),

    /// The identifier is not a valid integer.
    #[error("invalid user id: {0}")]
    InvalidIdentifier(String),

    /// No record carries the identifier.
    #[error("user {0} not found")]
    NotFound(i64),

    /// Unexpected failure accessing the collection.
    #[error("internal registry failure: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Short machine-readable name, used as a metrics label and error code.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::Validation(_) => "ValidationError",
            RegistryError::Conflict(_) => "Conflict",
            RegistryError::InvalidIdentifier(_) => "InvalidIdentifier",
            RegistryError::NotFound(_) => "NotFound",
            RegistryError::Internal(_) => "InternalError",
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_kinds() {
        assert_eq!(RegistryError::NotFound(3).kind(), "NotFound");
        assert_eq!(
            RegistryError::InvalidIdentifier("abc".into()).kind(),
            "InvalidIdentifier"
        );
        assert_eq!(RegistryError::Internal("x".into()).kind(), "InternalError");
    }
}
