//! Pluggable key-value storage for certledger records.
//!
//! This crate provides:
//! - `KeyValueStore` and `QueryFacility` traits, the only store primitives the
//!   record service depends on
//! - Composite key encoding for secondary indexes with exact prefix scans
//! - Equality selector queries over JSON values
//! - An in-memory backend and a durable journal-backed backend
//!
//! The journal backend persists every write through `certledger-journal` and
//! rebuilds state by replay on open.

#![deny(missing_docs)]

/// Composite key encoding.
pub mod composite;
/// Error types for store operations.
pub mod error;
/// Journal-backed storage implementation.
pub mod journal;
/// In-memory storage implementation.
pub mod memory;
/// Selector query parsing and matching.
pub mod selector;
/// Storage backend traits.
pub mod traits;

pub use certledger_journal::{ReadMode, WriteOptions};
pub use composite::{
    is_composite_key, make_composite_key, partial_key_range, split_composite_key,
    validate_simple_key, KeyError,
};
pub use error::StoreError;
pub use journal::JournalStore;
pub use memory::MemoryStore;
pub use selector::{FieldEquals, RecordFilter, Selector};
pub use traits::{
    KeyValue, KeyValueStore, QueryFacility, ResultsIter, ResultsIterator, VecResultsIterator,
};
