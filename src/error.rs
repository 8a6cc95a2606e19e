//! Error taxonomy for store operations.
//!
//! Every failure is returned to the caller; nothing in the library logs an
//! error and carries on.

use std::fmt;

use thiserror::Error;

use crate::models::UserId;

/// Errors returned by [`crate::store::UserStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    FetchFailed(#[from] FetchError),

    #[error("no user with id {0}")]
    NotFound(UserId),

    #[error("missing required field(s): {}", fields.join(", "))]
    ValidationFailed { fields: Vec<&'static str> },
}

impl StoreError {
    /// The underlying fetch cause, if this is a remote failure.
    pub fn fetch_cause(&self) -> Option<&FetchCause> {
        match self {
            StoreError::FetchFailed(e) => Some(&e.cause),
            _ => None,
        }
    }
}

/// Remote operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::List => write!(f, "list users"),
            Operation::Create => write!(f, "create user"),
            Operation::Update => write!(f, "update user"),
            Operation::Delete => write!(f, "delete user"),
        }
    }
}

/// A failed remote call.
#[derive(Error, Debug)]
#[error("failed to {operation}: {cause}")]
pub struct FetchError {
    pub operation: Operation,
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(operation: Operation, cause: FetchCause) -> Self {
        Self { operation, cause }
    }
}

/// Why a remote call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchCause {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("server assigned id {0}, which is already in use")]
    DuplicateId(UserId),
}
