//! Certificate records over a pluggable key-value ledger.
//!
//! This crate provides:
//! - The [`Record`] model and its on-ledger JSON encoding
//! - [`RecordService`]: validated creation with uniqueness enforcement and a
//!   `degree~name` secondary index, point reads, owner selector queries and
//!   degree index scans
//! - [`QueryResultBuilder`]: JSON array assembly that splices stored records
//!   without re-parsing them
//! - [`Operation`] / [`Response`]: the verb + positional argument surface
//!
//! Core invariants:
//! - A certificate ID is written at most once
//! - `degree` and `owner` are stored lowercase
//! - Validation and uniqueness failures never write anything
//! - A record and its index entry are written in that order; a failure
//!   between the two leaves an unindexed record behind
#![deny(missing_docs)]

/// Error types for record operations.
pub mod errors;
/// Invocation parsing and responses.
pub mod invocation;
/// Record model and index constants.
pub mod record;
/// Query result assembly.
pub mod results;
/// Record service.
pub mod service;

pub use errors::{ArgPosition, CertError};
pub use invocation::{CreateArgs, Operation, Response, ERROR, OK};
pub use record::{fold_case, Record, DEGREE_INDEX, INDEX_SENTINEL, RECORD_TYPE};
pub use results::{QueryResultBuilder, ScopedResults};
pub use service::RecordService;
