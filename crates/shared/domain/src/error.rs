//! Domain-level errors.
//!
//! Raised by pure domain logic: input rules for accounts, ledger records and
//! date ranges, and password hashing.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input broke a business rule; the message is shown to the user as is
    #[error("{0}")]
    Validation(String),

    /// Hashing or parsing a stored hash failed
    #[error("Password error: {0}")]
    Password(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
