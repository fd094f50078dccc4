use thiserror::Error;

/// Failures while reading or appending a ledger journal.
#[derive(Error, Debug)]
pub enum JournalError {
    /// The filesystem reported an error.
    #[error("journal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The file does not start with a supported journal header.
    #[error("not a ledger journal: {0}")]
    InvalidHeader(String),
    /// A frame header is malformed.
    #[error("malformed frame at byte {offset}: {reason}")]
    InvalidFrame {
        /// Offset of the frame header.
        offset: u64,
        /// What is wrong with it.
        reason: String,
    },
    /// A payload was refused for exceeding the frame size limit.
    #[error("frame payload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge {
        /// Requested payload size.
        size: u64,
        /// Limit in bytes.
        max: u32,
    },
    /// A `StatePut` payload does not decode.
    #[error("malformed state entry: {0}")]
    InvalidEntry(String),
    /// A state entry key is not UTF-8.
    #[error("state entry key is not UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// The file has content but is shorter than a header.
    #[error("existing file is too short to be a ledger journal")]
    FileNotEmpty,
    /// The file ends inside a frame and the reader is strict.
    #[error("journal ends inside the frame at byte {offset}")]
    TruncatedFrame {
        /// Offset of the torn frame.
        offset: u64,
    },
}
