//! In-memory store backed by an ordered map.

use crate::composite::is_composite_key;
use crate::error::StoreError;
use crate::selector::{RecordFilter, Selector};
use crate::traits::{KeyValue, KeyValueStore, QueryFacility, ResultsIter, VecResultsIterator};
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Ordered in-memory key-value store with selector query support.
///
/// Results iterators are snapshots taken when the scan or query starts. The
/// store counts iterators that were handed out but not yet closed, which
/// lets callers check that every scan released its iterator.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
    open_iterators: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys, composite keys included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterators handed out and not yet closed.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    fn iterator(&self, entries: Vec<KeyValue>) -> ResultsIter<'_> {
        self.open_iterators.fetch_add(1, Ordering::SeqCst);
        let open = Arc::clone(&self.open_iterators);
        Box::new(VecResultsIterator::new(entries).on_close(move || {
            open.fetch_sub(1, Ordering::SeqCst);
        }))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if value.is_empty() {
            return Err(StoreError::EmptyValue(key.to_string()));
        }
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn range(&self, start: &str, end: &str) -> Result<ResultsIter<'_>, StoreError> {
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else if start > end {
            return Ok(self.iterator(Vec::new()));
        } else {
            Bound::Excluded(end.to_string())
        };
        let entries: Vec<KeyValue> = self
            .entries
            .range((Bound::Included(start.to_string()), upper))
            .map(|(key, value)| KeyValue {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();
        trace!(start, end, matched = entries.len(), "range scan");
        Ok(self.iterator(entries))
    }
}

impl QueryFacility for MemoryStore {
    fn query(&self, query: &str) -> Result<ResultsIter<'_>, StoreError> {
        let selector = Selector::parse(query)?;
        let entries: Vec<KeyValue> = self
            .entries
            .iter()
            .filter(|(key, _)| !is_composite_key(key))
            .filter(|(_, value)| {
                serde_json::from_slice::<Value>(value)
                    .map(|record| selector.matches(&record))
                    .unwrap_or(false)
            })
            .map(|(key, value)| KeyValue {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();
        trace!(query, matched = entries.len(), "selector query");
        Ok(self.iterator(entries))
    }
}
