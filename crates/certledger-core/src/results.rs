//! Query result assembly.
//!
//! Results are spliced into a JSON array without re-parsing the stored
//! records: `[{"Key":"k1","Record":<v1>},{"Key":"k2","Record":<v2>}]`. The
//! stored value is embedded byte for byte, so a corrupt value yields a
//! corrupt response rather than being repaired.

use certledger_store::{KeyValue, ResultsIter, StoreError};
use serde_json::Value;

/// Results iterator that is closed on every exit path.
///
/// Dropping the guard closes the inner iterator if [`ScopedResults::close`]
/// was not called, so early returns and `?` cannot leak it.
pub struct ScopedResults<'a> {
    inner: ResultsIter<'a>,
    closed: bool,
}

impl<'a> ScopedResults<'a> {
    /// Takes ownership of `inner`.
    pub fn new(inner: ResultsIter<'a>) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    /// Returns the next pair, or `None` once exhausted.
    pub fn next_entry(&mut self) -> Result<Option<KeyValue>, StoreError> {
        self.inner.next_entry()
    }

    /// Closes the iterator, reporting any close failure.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.closed = true;
        self.inner.close()
    }
}

impl Drop for ScopedResults<'_> {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.inner.close();
        }
    }
}

/// Incremental builder for the query response array.
#[derive(Debug)]
pub struct QueryResultBuilder {
    buffer: Vec<u8>,
    count: usize,
}

impl Default for QueryResultBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryResultBuilder {
    /// Starts an empty array.
    pub fn new() -> Self {
        Self {
            buffer: vec![b'['],
            count: 0,
        }
    }

    /// Appends one `{"Key":..,"Record":..}` element.
    pub fn push(&mut self, key: &str, record: &[u8]) {
        if self.count > 0 {
            self.buffer.push(b',');
        }
        self.buffer.extend_from_slice(b"{\"Key\":");
        self.buffer
            .extend_from_slice(Value::from(key).to_string().as_bytes());
        self.buffer.extend_from_slice(b",\"Record\":");
        self.buffer.extend_from_slice(record);
        self.buffer.push(b'}');
        self.count += 1;
    }

    /// Number of elements pushed so far.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no element was pushed.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Closes the array and returns the payload.
    pub fn finish(mut self) -> Vec<u8> {
        self.buffer.push(b']');
        self.buffer
    }

    /// Drains `results` into a response array, closing the iterator whether
    /// or not draining succeeds.
    pub fn collect(results: ResultsIter<'_>) -> Result<Vec<u8>, StoreError> {
        let mut results = ScopedResults::new(results);
        let mut builder = Self::new();
        while let Some(kv) = results.next_entry()? {
            builder.push(&kv.key, &kv.value);
        }
        results.close()?;
        Ok(builder.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certledger_store::{ResultsIterator, VecResultsIterator};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn kv(key: &str, value: &str) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: value.as_bytes().to_vec(),
        }
    }

    struct FailingIterator {
        remaining: Vec<KeyValue>,
        closed: Arc<AtomicBool>,
    }

    impl ResultsIterator for FailingIterator {
        fn next_entry(&mut self) -> Result<Option<KeyValue>, StoreError> {
            match self.remaining.pop() {
                Some(kv) => Ok(Some(kv)),
                None => Err(StoreError::Other("connection reset".to_string())),
            }
        }

        fn close(&mut self) -> Result<(), StoreError> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn empty_stream_is_empty_array() {
        let payload = QueryResultBuilder::collect(Box::new(VecResultsIterator::new(vec![]))).unwrap();
        assert_eq!(payload, b"[]");
    }

    #[test]
    fn commas_only_between_elements() {
        let payload = QueryResultBuilder::collect(Box::new(VecResultsIterator::new(vec![
            kv("a", r#"{"n":1}"#),
            kv("b", r#"{"n":2}"#),
            kv("c", r#"{"n":3}"#),
        ])))
        .unwrap();
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            r#"[{"Key":"a","Record":{"n":1}},{"Key":"b","Record":{"n":2}},{"Key":"c","Record":{"n":3}}]"#
        );
    }

    #[test]
    fn record_is_spliced_verbatim() {
        let mut builder = QueryResultBuilder::new();
        builder.push("k", br#"{ "spaced" : true }"#);
        assert_eq!(builder.len(), 1);
        assert_eq!(
            builder.finish(),
            br#"[{"Key":"k","Record":{ "spaced" : true }}]"#.to_vec()
        );
    }

    #[test]
    fn corrupt_record_propagates() {
        let mut builder = QueryResultBuilder::new();
        builder.push("k", b"{broken");
        let payload = builder.finish();
        assert!(serde_json::from_slice::<Value>(&payload).is_err());
    }

    #[test]
    fn key_is_escaped() {
        let mut builder = QueryResultBuilder::new();
        builder.push("a\"b", b"1");
        let parsed: Value = serde_json::from_slice(&builder.finish()).unwrap();
        assert_eq!(parsed[0]["Key"], "a\"b");
    }

    #[test]
    fn iterator_closed_on_error() {
        let closed = Arc::new(AtomicBool::new(false));
        let iter = FailingIterator {
            remaining: vec![kv("a", "1")],
            closed: Arc::clone(&closed),
        };
        let result = QueryResultBuilder::collect(Box::new(iter));
        assert!(result.is_err());
        assert!(closed.load(Ordering::SeqCst));
    }
}
