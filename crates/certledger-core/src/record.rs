use certledger_store::{make_composite_key, KeyError};
use serde::{Deserialize, Serialize};

/// Discriminator stored in `docType` for certificate records.
pub const RECORD_TYPE: &str = "student";

/// Name of the secondary index over `(degree, certificate ID)`.
pub const DEGREE_INDEX: &str = "degree~name";

/// Value stored under index keys. Only key presence matters, but an empty
/// value would read back as "absent".
pub const INDEX_SENTINEL: &[u8] = &[0x00];

/// Lowercases `text` one character at a time.
///
/// Unlike [`str::to_lowercase`] this never maps a word-final `Σ` to `ς`, so
/// values folded here agree with ledgers written by other runtimes that
/// lowercase without context.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// A certificate record as persisted in the ledger.
///
/// Field order and the renamed field names are the on-ledger encoding and
/// must not change: `{"docType","cert","degree","iD","owner"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record family discriminator, always [`RECORD_TYPE`].
    #[serde(rename = "docType")]
    pub record_type: String,
    /// Primary key.
    #[serde(rename = "cert")]
    pub certificate_id: String,
    /// Degree, lowercase.
    pub degree: String,
    /// Numeric student ID.
    #[serde(rename = "iD")]
    pub numeric_id: i64,
    /// Owner, lowercase.
    pub owner: String,
}

impl Record {
    /// Builds a record, lowercasing `degree` and `owner`.
    pub fn new(certificate_id: &str, degree: &str, numeric_id: i64, owner: &str) -> Self {
        Self {
            record_type: RECORD_TYPE.to_string(),
            certificate_id: certificate_id.to_string(),
            degree: fold_case(degree),
            numeric_id,
            owner: fold_case(owner),
        }
    }

    /// Compact JSON encoding stored under the certificate ID.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decodes a stored record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Key of this record's entry in [`DEGREE_INDEX`].
    pub fn index_key(&self) -> Result<String, KeyError> {
        make_composite_key(DEGREE_INDEX, &[self.degree.as_str(), self.certificate_id.as_str()])
    }
}
