//! The module contains the error the engine can throw.
//!
//! Three kinds belong to balance reconciliation:
//!
//! - [`Configuration`] thrown when a malformed transaction reaches the effect
//!   calculator. Nothing has been mutated yet.
//! - [`MissingAccount`] thrown when a forward balance effect names an account
//!   that does not resolve.
//! - [`Concurrency`] thrown when the relative balance update fails at the
//!   storage layer.
//!
//! Every other variant is raised by the write path before reconciliation runs.
//!
//!  [`Configuration`]: EngineError::Configuration
//!  [`MissingAccount`]: EngineError::MissingAccount
//!  [`Concurrency`]: EngineError::Concurrency
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Malformed transaction: {0}")]
    Configuration(String),
    #[error("Account {0} not found while applying balance effects")]
    MissingAccount(Uuid),
    #[error("Balance update failed: {0}")]
    Concurrency(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Account in use: {0}")]
    AccountInUse(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Configuration(a), Self::Configuration(b)) => a == b,
            (Self::MissingAccount(a), Self::MissingAccount(b)) => a == b,
            (Self::Concurrency(a), Self::Concurrency(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidTransaction(a), Self::InvalidTransaction(b)) => a == b,
            (Self::AccountInUse(a), Self::AccountInUse(b)) => a == b,
            (Self::Hashing(a), Self::Hashing(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl From<bcrypt::BcryptError> for EngineError {
    fn from(value: bcrypt::BcryptError) -> Self {
        Self::Hashing(value.to_string())
    }
}
