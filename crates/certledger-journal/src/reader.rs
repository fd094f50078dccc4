//! Sequential replay of a ledger journal.

use crate::entry::StateEntry;
use crate::errors::JournalError;
use crate::frame::{FrameHeader, FrameKind, JournalHeader, FRAME_HEADER_SIZE, HEADER_SIZE};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// How a reader treats a frame cut short by the end of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// A torn frame is a [`JournalError::TruncatedFrame`].
    Strict,
    /// A torn frame ends the journal.
    Permissive,
}

/// Reads frames front to back.
///
/// # Example
///
/// ```rust
/// use certledger_journal::{JournalReader, JournalWriter, ReadMode, StateEntry, WriteOptions};
///
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("ledger.clj");
/// JournalWriter::open(&path, WriteOptions::default())?
///     .append_entry(&StateEntry::new("as23df", b"{}".to_vec()))?;
///
/// let mut reader = JournalReader::open(&path, ReadMode::Strict)?;
/// while let Some(entry) = reader.read_entry()? {
///     println!("{} = {} bytes", entry.key, entry.value.len());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalReader {
    input: BufReader<File>,
    mode: ReadMode,
    position: u64,
}

/// Outcome of filling a buffer from the journal.
enum Fill {
    Full,
    Empty,
    Partial,
}

fn fill(input: &mut impl Read, buf: &mut [u8]) -> io::Result<Fill> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(match filled {
        0 => Fill::Empty,
        n if n == buf.len() => Fill::Full,
        _ => Fill::Partial,
    })
}

impl JournalReader {
    /// Opens a journal and validates its header.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let mut input = BufReader::new(File::open(path)?);

        let mut header = [0u8; HEADER_SIZE];
        match fill(&mut input, &mut header)? {
            Fill::Full => {}
            _ => {
                return Err(JournalError::InvalidHeader(
                    "file ends before the header".to_string(),
                ))
            }
        }
        JournalHeader::decode(&header)?;

        Ok(Self {
            input,
            mode,
            position: HEADER_SIZE as u64,
        })
    }

    /// Offset of the next unread frame.
    ///
    /// Once a permissive read hits a torn frame this stays at the start of
    /// that frame, which is the length of the intact prefix.
    pub fn position(&self) -> u64 {
        self.position
    }

    fn torn<T>(&self) -> Result<Option<T>, JournalError> {
        match self.mode {
            ReadMode::Strict => Err(JournalError::TruncatedFrame {
                offset: self.position,
            }),
            ReadMode::Permissive => Ok(None),
        }
    }

    /// Reads the next frame of any kind.
    ///
    /// Returns `Ok(None)` at the end of the journal.
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        let mut raw = [0u8; FRAME_HEADER_SIZE];
        match fill(&mut self.input, &mut raw)? {
            Fill::Empty => return Ok(None),
            Fill::Partial => return self.torn(),
            Fill::Full => {}
        }
        let header = FrameHeader::decode(&raw, self.position)?;

        let mut payload = vec![0u8; header.len as usize];
        if !payload.is_empty() {
            match fill(&mut self.input, &mut payload)? {
                Fill::Full => {}
                Fill::Empty | Fill::Partial => return self.torn(),
            }
        }

        self.position += (FRAME_HEADER_SIZE + payload.len()) as u64;
        Ok(Some((header.kind, payload)))
    }

    /// Reads the next state write, skipping frames of unknown kind.
    pub fn read_entry(&mut self) -> Result<Option<StateEntry>, JournalError> {
        while let Some((kind, payload)) = self.read_frame()? {
            if kind == FrameKind::StatePut {
                return StateEntry::from_bytes(&payload).map(Some);
            }
        }
        Ok(None)
    }
}
