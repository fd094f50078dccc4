//! On-disk layout of the ledger journal.
//!
//! ```text
//! file   := header frame*
//! header := "CLJ1" version:u16le flags:u16le zero[8]
//! frame  := kind:u8 zero[3] len:u32le payload[len]
//! ```

use crate::errors::JournalError;

/// Magic bytes opening every ledger journal.
pub const MAGIC: &[u8; 4] = b"CLJ1";

/// Format version written by this crate.
pub const VERSION: u16 = 0x0001;

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Size of a frame header in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Largest accepted frame payload (16 MiB).
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// Kind byte of a [`FrameKind::StatePut`] frame.
pub const FRAME_KIND_STATE_PUT: u8 = 0x01;

fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Journal file header.
///
/// Only version `0x0001` with zero flags exists; anything else is refused so
/// an older binary never replays a ledger it cannot interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalHeader {
    /// Format version.
    pub version: u16,
    /// Feature flags. Always zero.
    pub flags: u16,
}

impl Default for JournalHeader {
    fn default() -> Self {
        Self {
            version: VERSION,
            flags: 0,
        }
    }
}

impl JournalHeader {
    /// Encodes the header, padding the tail with zeros.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..4].copy_from_slice(MAGIC);
        out[4..6].copy_from_slice(&self.version.to_le_bytes());
        out[6..8].copy_from_slice(&self.flags.to_le_bytes());
        out
    }

    /// Decodes and validates a header.
    pub fn decode(bytes: &[u8]) -> Result<Self, JournalError> {
        let invalid = |msg: String| Err(JournalError::InvalidHeader(msg));

        if bytes.len() < HEADER_SIZE {
            return invalid(format!("expected {} bytes, found {}", HEADER_SIZE, bytes.len()));
        }
        if &bytes[..4] != MAGIC {
            return invalid(format!("bad magic {:02x?}", &bytes[..4]));
        }

        let header = Self {
            version: le_u16(bytes, 4),
            flags: le_u16(bytes, 6),
        };
        if header.version != VERSION {
            return invalid(format!("unsupported version 0x{:04x}", header.version));
        }
        if header.flags != 0 {
            return invalid(format!("unknown flags 0x{:04x}", header.flags));
        }
        if bytes[8..HEADER_SIZE].iter().any(|&b| b != 0) {
            return invalid("reserved header bytes are not zero".to_string());
        }
        Ok(header)
    }
}

/// Kind of a journal frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// A single key/value write, see [`StateEntry`](crate::StateEntry).
    StatePut,
    /// A kind this version does not understand. Readers skip it.
    Unknown(u8),
}

impl From<u8> for FrameKind {
    fn from(byte: u8) -> Self {
        match byte {
            FRAME_KIND_STATE_PUT => FrameKind::StatePut,
            other => FrameKind::Unknown(other),
        }
    }
}

impl From<FrameKind> for u8 {
    fn from(kind: FrameKind) -> Self {
        match kind {
            FrameKind::StatePut => FRAME_KIND_STATE_PUT,
            FrameKind::Unknown(byte) => byte,
        }
    }
}

/// Header preceding each frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Frame kind.
    pub kind: FrameKind,
    /// Payload length in bytes.
    pub len: u32,
}

impl FrameHeader {
    /// Builds the header for a payload of `len` bytes.
    pub fn for_payload(kind: FrameKind, len: usize) -> Result<Self, JournalError> {
        match u32::try_from(len) {
            Ok(len) if len <= MAX_PAYLOAD_SIZE => Ok(Self { kind, len }),
            _ => Err(JournalError::PayloadTooLarge {
                size: len as u64,
                max: MAX_PAYLOAD_SIZE,
            }),
        }
    }

    /// Encodes the header. Reserved bytes are written as zero.
    pub fn encode(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut out = [0u8; FRAME_HEADER_SIZE];
        out[0] = self.kind.into();
        out[4..].copy_from_slice(&self.len.to_le_bytes());
        out
    }

    /// Decodes a frame header found at byte `offset` of the journal.
    pub fn decode(bytes: &[u8; FRAME_HEADER_SIZE], offset: u64) -> Result<Self, JournalError> {
        let invalid = |reason: String| Err(JournalError::InvalidFrame { offset, reason });

        if bytes[1..4] != [0, 0, 0] {
            return invalid("reserved frame bytes are not zero".to_string());
        }
        let len = le_u32(bytes, 4);
        if len > MAX_PAYLOAD_SIZE {
            return invalid(format!("payload length {} over limit {}", len, MAX_PAYLOAD_SIZE));
        }
        Ok(Self {
            kind: FrameKind::from(bytes[0]),
            len,
        })
    }
}
