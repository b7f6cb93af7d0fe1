//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Variants cover invalid world configuration, unresolvable generators or block patterns
//! and generic errors.
//! Deposit generation itself never fails: configuration problems disable the affected variant
//! and are reported through logging and [`crate::events::DepositEvent::ConfigError`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("deposit '{variant}' defines no generator")]
    MissingGenerator { variant: String },

    #[error("no generator with code '{name}' found")]
    UnknownGenerator { name: String },

    #[error("block pattern '{pattern}' matched no block")]
    UnresolvedBlock { pattern: String },

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
