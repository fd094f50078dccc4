//! Append-only journal format for certledger state writes.
//!
//! This crate provides:
//! - Framed, append-only storage of key/value writes (`.clj` files)
//! - Reader/writer APIs with strict and permissive truncation handling
//!
//! ## Format
//!
//! A 16-byte header (`CLJ1`, version, flags, reserved) is followed by frames.
//! Each frame is an 8-byte header (kind, 3 reserved bytes, little-endian
//! payload length) and a payload of at most 16 MiB. The only defined kind is
//! `StatePut` (`0x01`); readers skip any other kind.
//!
//! ## Key Types
//!
//! - [`JournalWriter`] - Append state writes to journal files
//! - [`JournalReader`] - Replay state writes from journal files
//! - [`StateEntry`] - Payload of a `StatePut` frame

#![deny(missing_docs)]

/// State entry payload codec.
pub mod entry;
/// Error types for journal operations.
pub mod errors;
/// Frame structure and serialization.
pub mod frame;
/// Journal reader implementation.
pub mod reader;
/// Journal writer implementation.
pub mod writer;

pub use entry::StateEntry;
pub use errors::JournalError;
pub use frame::{FrameHeader, FrameKind, JournalHeader};
pub use reader::{JournalReader, ReadMode};
pub use writer::{JournalWriter, WriteOptions};
