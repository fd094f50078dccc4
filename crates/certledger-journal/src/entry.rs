//! Payload codec for `StatePut` frames.

use crate::errors::JournalError;

/// A single key/value write recorded in the journal.
///
/// Payload layout: `u32` little-endian key length, the UTF-8 key, then the
/// value bytes filling the rest of the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    /// State key (primary or composite).
    pub key: String,
    /// Stored value bytes.
    pub value: Vec<u8>,
}

impl StateEntry {
    /// Creates a new entry.
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Encodes the entry as a frame payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let key = self.key.as_bytes();
        let mut out = Vec::with_capacity(4 + key.len() + self.value.len());
        out.extend_from_slice(&(key.len() as u32).to_le_bytes());
        out.extend_from_slice(key);
        out.extend_from_slice(&self.value);
        out
    }

    /// Decodes an entry from a frame payload.
    pub fn from_bytes(payload: &[u8]) -> Result<Self, JournalError> {
        if payload.len() < 4 {
            return Err(JournalError::InvalidEntry(format!(
                "payload too short: {} bytes",
                payload.len()
            )));
        }
        let key_len =
            u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
        let rest = &payload[4..];
        if key_len > rest.len() {
            return Err(JournalError::InvalidEntry(format!(
                "key length {} exceeds payload remainder {}",
                key_len,
                rest.len()
            )));
        }
        let key = std::str::from_utf8(&rest[..key_len])?.to_string();
        Ok(Self {
            key,
            value: rest[key_len..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_what_it_encodes() {
        let entry = StateEntry::new("\u{0}degree~name\u{0}me\u{0}as23df\u{0}", vec![0x00]);
        assert_eq!(StateEntry::from_bytes(&entry.to_bytes()).unwrap(), entry);
    }

    #[test]
    fn rejects_key_length_past_end() {
        let mut bytes = StateEntry::new("abc", b"v".to_vec()).to_bytes();
        bytes[0] = 200;
        assert!(matches!(
            StateEntry::from_bytes(&bytes),
            Err(JournalError::InvalidEntry(_))
        ));
    }

    #[test]
    fn rejects_non_utf8_key() {
        let mut bytes = 2u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0xC3, 0x28]);
        assert!(matches!(
            StateEntry::from_bytes(&bytes),
            Err(JournalError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn empty_value_is_preserved() {
        let entry = StateEntry::from_bytes(&StateEntry::new("k", Vec::new()).to_bytes()).unwrap();
        assert_eq!(entry.key, "k");
        assert!(entry.value.is_empty());
    }
}
