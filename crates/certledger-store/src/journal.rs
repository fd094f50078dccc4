//! Journal-backed storage implementation.

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::traits::{KeyValueStore, QueryFacility, ResultsIter};
use certledger_journal::{JournalReader, JournalWriter, ReadMode, StateEntry, WriteOptions};
use std::path::Path;
use tracing::{debug, warn};

/// Durable store: an in-memory state rebuilt from an append-only journal.
///
/// Opening replays every `StatePut` frame in order (later writes win). Each
/// `put` is appended to the journal before the in-memory state changes, so a
/// failed append leaves both unchanged.
pub struct JournalStore {
    state: MemoryStore,
    writer: JournalWriter,
}

impl JournalStore {
    /// Opens (or creates) the ledger file at `path`.
    ///
    /// `mode` controls how a truncated tail frame is treated during replay.
    /// Frames carrying an empty value cannot be represented in the state and
    /// are skipped with a warning.
    pub fn open<P: AsRef<Path>>(
        path: P,
        options: WriteOptions,
        mode: ReadMode,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let mut state = MemoryStore::new();

        let existing = std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
        if existing {
            let mut reader = JournalReader::open(path, mode)?;
            let mut replayed = 0usize;
            while let Some(entry) = reader.read_entry()? {
                if entry.value.is_empty() {
                    warn!(key = ?entry.key, "skipping journal entry with empty value");
                    continue;
                }
                state.put(&entry.key, &entry.value)?;
                replayed += 1;
            }
            debug!(path = %path.display(), replayed, keys = state.len(), "replayed ledger journal");

            // Permissive replay may stop before a torn tail frame; cut it off so
            // new frames are not appended behind garbage.
            let intact = reader.position();
            drop(reader);
            let file = std::fs::OpenOptions::new().write(true).open(path)?;
            if file.metadata()?.len() > intact {
                warn!(path = %path.display(), intact, "truncating torn journal tail");
                file.set_len(intact)?;
            }
        }

        let writer = JournalWriter::open(path, options)?;
        Ok(Self { state, writer })
    }

    /// Read-only view of the replayed state.
    pub fn state(&self) -> &MemoryStore {
        &self.state
    }

    /// Flushes and closes the journal.
    pub fn finish(self) -> Result<(), StoreError> {
        self.writer.finish()?;
        Ok(())
    }
}

impl KeyValueStore for JournalStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.state.get(key)
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if value.is_empty() {
            return Err(StoreError::EmptyValue(key.to_string()));
        }
        self.writer
            .append_entry(&StateEntry::new(key, value.to_vec()))?;
        self.state.put(key, value)
    }

    fn range(&self, start: &str, end: &str) -> Result<ResultsIter<'_>, StoreError> {
        self.state.range(start, end)
    }
}

impl QueryFacility for JournalStore {
    fn query(&self, query: &str) -> Result<ResultsIter<'_>, StoreError> {
        self.state.query(query)
    }
}
