//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a record addressed by id does not exist.
//! - [`MissingField`] thrown when a required input field is absent or blank.
//! - [`InvalidValue`] thrown when an input is present but not acceptable.
//! - [`ExistingKey`] thrown when a unique code is already taken.
//! - [`InvalidState`] thrown when a state transition is not allowed.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`MissingField`]: EngineError::MissingField
//!  [`InvalidValue`]: EngineError::InvalidValue
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`InvalidState`]: EngineError::InvalidState
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("\"{0}\" already present")]
    ExistingKey(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::MissingField(a), Self::MissingField(b)) => a == b,
            (Self::InvalidValue(a), Self::InvalidValue(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
