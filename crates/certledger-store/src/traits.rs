//! Storage backend traits.
//!
//! These are the only primitives the record service consumes: point reads and
//! writes, key-range scans, and selector queries. Iterators returned by scans
//! and queries must be closed by the caller.

use crate::composite::partial_key_range;
use crate::error::StoreError;

/// A key together with its stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// State key.
    pub key: String,
    /// Raw stored bytes.
    pub value: Vec<u8>,
}

/// Finite, closable stream of key/value pairs.
pub trait ResultsIterator {
    /// Returns the next pair, or `None` once exhausted.
    fn next_entry(&mut self) -> Result<Option<KeyValue>, StoreError>;

    /// Releases the iterator. Closing twice is a no-op.
    fn close(&mut self) -> Result<(), StoreError>;
}

/// Boxed results iterator borrowing from its store.
pub type ResultsIter<'a> = Box<dyn ResultsIterator + 'a>;

/// Point key-value store with ordered range scans.
pub trait KeyValueStore {
    /// Gets a value by key. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Writes a value. Empty values are rejected.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Scans keys in `[start, end)` in ascending order. An empty `end` means unbounded.
    fn range(&self, start: &str, end: &str) -> Result<ResultsIter<'_>, StoreError>;

    /// Scans every composite key of `index` whose leading attributes equal `attributes`.
    fn range_by_partial_composite_key(
        &self,
        index: &str,
        attributes: &[&str],
    ) -> Result<ResultsIter<'_>, StoreError> {
        let (start, end) = partial_key_range(index, attributes)?;
        self.range(&start, &end)
    }
}

/// Rich query facility evaluating selector queries against stored JSON values.
pub trait QueryFacility {
    /// Runs a query string such as `{"selector":{"owner":"bob"}}`.
    fn query(&self, query: &str) -> Result<ResultsIter<'_>, StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn range(&self, start: &str, end: &str) -> Result<ResultsIter<'_>, StoreError> {
        (**self).range(start, end)
    }
}

impl<T: QueryFacility + ?Sized> QueryFacility for &mut T {
    fn query(&self, query: &str) -> Result<ResultsIter<'_>, StoreError> {
        (**self).query(query)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn range(&self, start: &str, end: &str) -> Result<ResultsIter<'_>, StoreError> {
        (**self).range(start, end)
    }
}

impl<T: QueryFacility + ?Sized> QueryFacility for Box<T> {
    fn query(&self, query: &str) -> Result<ResultsIter<'_>, StoreError> {
        (**self).query(query)
    }
}

/// Iterator over an owned snapshot of results.
pub struct VecResultsIterator {
    entries: std::vec::IntoIter<KeyValue>,
    closed: bool,
    on_close: Option<Box<dyn FnOnce() + Send>>,
}

impl VecResultsIterator {
    /// Creates an iterator over `entries`.
    pub fn new(entries: Vec<KeyValue>) -> Self {
        Self {
            entries: entries.into_iter(),
            closed: false,
            on_close: None,
        }
    }

    /// Registers a callback run exactly once when the iterator is closed.
    pub fn on_close(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }
}

impl ResultsIterator for VecResultsIterator {
    fn next_entry(&mut self) -> Result<Option<KeyValue>, StoreError> {
        if self.closed {
            return Err(StoreError::IteratorClosed);
        }
        Ok(self.entries.next())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if !self.closed {
            self.closed = true;
            if let Some(callback) = self.on_close.take() {
                callback();
            }
        }
        Ok(())
    }
}
