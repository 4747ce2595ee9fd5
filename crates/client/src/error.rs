//! Client error types.

use common::AppError;
use thiserror::Error;

/// Failures of the persisted session slot.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced to the initiating user action.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Another create or delete from the same action is still in flight
    #[error("A request is already in progress")]
    Busy,

    /// Rejected before any remote call
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("{}", .0.user_message())]
    Remote(#[from] AppError),
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
