//! Append side of the ledger journal.

use crate::entry::StateEntry;
use crate::errors::JournalError;
use crate::frame::{FrameHeader, FrameKind, JournalHeader, FRAME_HEADER_SIZE, HEADER_SIZE};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Options for [`JournalWriter::open`].
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Call `fsync` after every append. Defaults to `false`.
    pub sync: bool,
    /// Create the file when missing. Defaults to `true`.
    pub create: bool,
    /// Keep existing frames. When `false` the journal is reset to an empty
    /// ledger. Defaults to `true`.
    pub append: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
            append: true,
        }
    }
}

/// Appends state writes to a journal file.
///
/// Every ledger `put` becomes one `StatePut` frame. Frames are never
/// rewritten; replaying the file in order yields the current state.
///
/// # Example
///
/// ```rust
/// use certledger_journal::{JournalWriter, StateEntry, WriteOptions};
///
/// let dir = tempfile::tempdir()?;
/// let mut writer = JournalWriter::open(dir.path().join("ledger.clj"), WriteOptions::default())?;
/// writer.append_entry(&StateEntry::new("as23df", br#"{"docType":"student"}"#.to_vec()))?;
/// writer.finish()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalWriter {
    file: File,
    sync: bool,
}

impl JournalWriter {
    /// Opens a journal for appending, writing a header into an empty file.
    ///
    /// # Errors
    ///
    /// [`JournalError::FileNotEmpty`] when the file has some bytes but fewer
    /// than a header, [`JournalError::InvalidHeader`] when the header is not a
    /// ledger journal header, and [`JournalError::Io`] for anything the
    /// filesystem reports.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(options.create)
            .open(path)?;

        let len = file.metadata()?.len();
        if len == 0 {
            file.write_all(&JournalHeader::default().encode())?;
        } else if len < HEADER_SIZE as u64 {
            return Err(JournalError::FileNotEmpty);
        } else {
            let mut header = [0u8; HEADER_SIZE];
            file.read_exact(&mut header)?;
            JournalHeader::decode(&header)?;
            if !options.append {
                file.set_len(HEADER_SIZE as u64)?;
            }
        }
        file.seek(SeekFrom::End(0))?;

        let mut writer = Self {
            file,
            sync: options.sync,
        };
        writer.flush()?;
        Ok(writer)
    }

    fn flush(&mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_data()?;
        }
        Ok(())
    }

    /// Appends a key/value write.
    pub fn append_entry(&mut self, entry: &StateEntry) -> Result<(), JournalError> {
        self.append_raw(FrameKind::StatePut, &entry.to_bytes())
    }

    /// Appends a frame of any kind.
    ///
    /// The frame header and payload go out in a single write so a rejected
    /// or failed append leaves no header without its payload.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        let header = FrameHeader::for_payload(kind, payload.len())?;

        let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
        frame.extend_from_slice(&header.encode());
        frame.extend_from_slice(payload);
        self.file.write_all(&frame)?;
        self.flush()
    }

    /// Flushes and closes the journal, surfacing any final I/O error.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.flush()
    }
}

impl Drop for JournalWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
