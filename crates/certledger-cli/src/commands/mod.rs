pub mod invoke;
pub mod keys;

use certledger_store::{JournalStore, ReadMode, WriteOptions};
use std::path::Path;

/// Opens the ledger journal, replaying it into memory.
///
/// Only commands that write may create a missing ledger. A frame torn by an
/// interrupted append is cut off during replay.
pub fn open_ledger(
    path: &Path,
    sync: bool,
    create: bool,
) -> Result<JournalStore, Box<dyn std::error::Error>> {
    if !create && !path.exists() {
        return Err(format!("Ledger not found: {}", path.display()).into());
    }
    let options = WriteOptions {
        sync,
        create,
        ..WriteOptions::default()
    };
    JournalStore::open(path, options, ReadMode::Permissive)
        .map_err(|e| format!("Failed to open ledger {}: {}", path.display(), e).into())
}
