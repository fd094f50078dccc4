//! Record service: validation, uniqueness, indexing and queries.

use crate::errors::{ArgPosition, CertError};
use crate::invocation::{CreateArgs, Operation, Response};
use crate::record::{fold_case, Record, DEGREE_INDEX, INDEX_SENTINEL, RECORD_TYPE};
use crate::results::{QueryResultBuilder, ScopedResults};
use certledger_store::{
    split_composite_key, validate_simple_key, KeyValueStore, QueryFacility, Selector, StoreError,
};
use tracing::{debug, info, warn};

/// Certificate record operations over an injected store.
///
/// The service holds no state of its own; everything lives in `S`.
///
/// # Example
///
/// ```rust
/// use certledger_core::{CreateArgs, RecordService};
/// use certledger_store::MemoryStore;
///
/// let mut service = RecordService::new(MemoryStore::new());
/// service.create(&CreateArgs::new("as23df", "ME", "4674", "Hussein"))?;
///
/// let stored = service.read_by_id("as23df")?;
/// assert!(String::from_utf8(stored)?.contains(r#""owner":"hussein""#));
///
/// let results = service.query_by_owner("HUSSEIN")?;
/// assert!(results.starts_with(br#"[{"Key":"as23df""#));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct RecordService<S> {
    store: S,
}

impl<S: KeyValueStore + QueryFacility> RecordService<S> {
    /// Wraps `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwraps the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Creates a record and its degree index entry.
    ///
    /// Every validation and the uniqueness check run before the first write.
    /// On success exactly two writes happen: the record, then the index entry.
    ///
    /// If the index write fails, the record stays written but unindexed and
    /// the error is returned; nothing is rolled back.
    pub fn create(&mut self, args: &CreateArgs) -> Result<(), CertError> {
        for (i, value) in args.positional().iter().enumerate() {
            if value.is_empty() {
                return Err(CertError::InvalidArgument {
                    position: ArgPosition(i + 1),
                });
            }
        }
        let numeric_id: i64 =
            args.numeric_id
                .parse()
                .map_err(|_| CertError::InvalidNumericArgument {
                    position: ArgPosition(3),
                    value: args.numeric_id.clone(),
                })?;

        let record = Record::new(&args.certificate_id, &args.degree, numeric_id, &args.owner);
        validate_simple_key(&record.certificate_id)?;
        let index_key = record.index_key()?;

        let key = record.certificate_id.as_str();
        let existing = self.store.get(key).map_err(|source| CertError::StoreUnavailable {
            key: key.to_string(),
            source,
        })?;
        if existing.is_some() {
            debug!(certificate_id = key, "record already exists");
            return Err(CertError::DuplicateRecord {
                key: key.to_string(),
            });
        }

        let encoded = record.to_bytes()?;
        self.store
            .put(key, &encoded)
            .map_err(|source| CertError::StoreUnavailable {
                key: key.to_string(),
                source,
            })?;
        self.store
            .put(&index_key, INDEX_SENTINEL)
            .map_err(|source| {
                warn!(certificate_id = key, "record written but index entry failed");
                CertError::StoreUnavailable {
                    key: index_key.clone(),
                    source,
                }
            })?;

        info!(certificate_id = key, degree = %record.degree, "record created and indexed");
        Ok(())
    }

    /// Returns the stored bytes of a record exactly as persisted.
    pub fn read_by_id(&self, certificate_id: &str) -> Result<Vec<u8>, CertError> {
        match self.store.get(certificate_id) {
            Err(source) => Err(CertError::StoreUnavailable {
                key: certificate_id.to_string(),
                source,
            }),
            Ok(None) => Err(CertError::NotFound {
                key: certificate_id.to_string(),
            }),
            Ok(Some(bytes)) => Ok(bytes),
        }
    }

    /// Returns every record owned by `owner` (case-insensitive) as a JSON array.
    pub fn query_by_owner(&self, owner: &str) -> Result<Vec<u8>, CertError> {
        let query = Selector::new()
            .equals("docType", RECORD_TYPE)
            .equals("owner", fold_case(owner))
            .to_query_string();
        debug!(%query, "running selector query");

        let results = self.store.query(&query).map_err(CertError::QueryFailed)?;
        let payload = QueryResultBuilder::collect(results).map_err(CertError::QueryFailed)?;
        debug!(bytes = payload.len(), "assembled owner query result");
        Ok(payload)
    }

    /// Returns every record with `degree` (case-insensitive) as a JSON array,
    /// ordered by certificate ID, using the degree index.
    pub fn query_by_degree(&self, degree: &str) -> Result<Vec<u8>, CertError> {
        let degree = fold_case(degree);
        let scan = self
            .store
            .range_by_partial_composite_key(DEGREE_INDEX, &[degree.as_str()])
            .map_err(CertError::QueryFailed)?;
        let mut scan = ScopedResults::new(scan);

        let mut builder = QueryResultBuilder::new();
        while let Some(entry) = scan.next_entry().map_err(CertError::QueryFailed)? {
            let (_, attributes) = split_composite_key(&entry.key)
                .map_err(|e| CertError::QueryFailed(StoreError::Key(e)))?;
            let certificate_id = match attributes.as_slice() {
                [_, certificate_id] => certificate_id,
                _ => {
                    warn!(key = ?entry.key, "malformed degree index entry");
                    continue;
                }
            };
            match self.store.get(certificate_id).map_err(CertError::QueryFailed)? {
                Some(record) => builder.push(certificate_id, &record),
                None => warn!(certificate_id = %certificate_id, "index entry without record"),
            }
        }
        scan.close().map_err(CertError::QueryFailed)?;

        debug!(degree = %degree, results = builder.len(), "assembled degree query result");
        Ok(builder.finish())
    }

    /// Runs a parsed operation.
    pub fn execute(&mut self, operation: Operation) -> Result<Vec<u8>, CertError> {
        match operation {
            Operation::Create(args) => self.create(&args).map(|()| Vec::new()),
            Operation::ReadById { certificate_id } => self.read_by_id(&certificate_id),
            Operation::QueryByOwner { owner } => self.query_by_owner(&owner),
            Operation::QueryByDegree { degree } => self.query_by_degree(&degree),
        }
    }

    /// Parses and runs `verb` with positional `args`.
    pub fn invoke<A: AsRef<str>>(&mut self, verb: &str, args: &[A]) -> Response {
        info!(verb, args = args.len(), "invoke is running");
        let result = Operation::parse(verb, args).and_then(|operation| self.execute(operation));
        if let Err(err) = &result {
            debug!(verb, error = %err, "invocation failed");
        }
        Response::from(result)
    }
}
