use certledger_store::{KeyError, StoreError};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// One-based position of an invocation argument, displayed as an ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgPosition(pub usize);

impl fmt::Display for ArgPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        let suffix = match (n % 10, n % 100) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        };
        write!(f, "{}{}", n, suffix)
    }
}

/// Errors returned by record operations. All are terminal for the invocation.
#[derive(Error, Debug)]
pub enum CertError {
    /// Wrong number of positional arguments for the operation.
    #[error("incorrect number of arguments for {verb}: expecting {expected}, got {got}")]
    InvalidArgumentCount {
        /// Operation verb.
        verb: &'static str,
        /// Expected arity, e.g. `"4"` or `"at least 1"`.
        expected: &'static str,
        /// Number of arguments received.
        got: usize,
    },
    /// A required argument is empty.
    #[error("{position} argument must be a non-empty string")]
    InvalidArgument {
        /// Position of the offending argument.
        position: ArgPosition,
    },
    /// An argument that must be a base-10 integer is not one.
    #[error("{position} argument must be a numeric string, got {value:?}")]
    InvalidNumericArgument {
        /// Position of the offending argument.
        position: ArgPosition,
        /// Raw argument text.
        value: String,
    },
    /// A key or index attribute cannot be encoded.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),
    /// A record with this certificate ID already exists.
    #[error("certificate already exists: {key}")]
    DuplicateRecord {
        /// Certificate ID.
        key: String,
    },
    /// No record is stored under this certificate ID.
    #[error("certificate does not exist: {key}")]
    NotFound {
        /// Certificate ID.
        key: String,
    },
    /// The store failed while reading or writing `key`.
    #[error("failed to access state for {key}: {source}")]
    StoreUnavailable {
        /// Key being accessed.
        key: String,
        /// Underlying store failure.
        source: StoreError,
    },
    /// The query facility failed to run or iterate a query.
    #[error("query failed: {0}")]
    QueryFailed(#[source] StoreError),
    /// Verb does not name an operation.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    /// Record could not be encoded.
    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CertError {
    /// Message returned to the caller.
    ///
    /// Key lookups fail with a structured `{"Error":"..."}` payload embedding
    /// the key; every other error is the plain display text.
    pub fn message(&self) -> String {
        match self {
            CertError::NotFound { .. } | CertError::StoreUnavailable { .. } => {
                json!({ "Error": self.to_string() }).to_string()
            }
            _ => self.to_string(),
        }
    }
}
