//! Error types for store operations.

use crate::composite::KeyError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] certledger_journal::JournalError),
    /// Key could not be encoded or decoded.
    #[error("key error: {0}")]
    Key(#[from] KeyError),
    /// Empty values are indistinguishable from absent keys and are refused.
    #[error("refusing to store empty value for key {0:?}")]
    EmptyValue(String),
    /// Query string is not a supported selector query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    /// Results iterator was used after being closed.
    #[error("results iterator already closed")]
    IteratorClosed,
    /// Other error.
    #[error("{0}")]
    Other(String),
}
