//! Invocation surface: verbs with positional string arguments.

use crate::errors::CertError;

/// Status code of a successful response.
pub const OK: u16 = 200;

/// Status code of a failed response.
pub const ERROR: u16 = 500;

/// Positional arguments of a create call, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateArgs {
    /// Certificate ID (primary key).
    pub certificate_id: String,
    /// Degree, any case.
    pub degree: String,
    /// Numeric ID as decimal text.
    pub numeric_id: String,
    /// Owner, any case.
    pub owner: String,
}

impl CreateArgs {
    /// Creates arguments from their four positional values.
    pub fn new(
        certificate_id: impl Into<String>,
        degree: impl Into<String>,
        numeric_id: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            certificate_id: certificate_id.into(),
            degree: degree.into(),
            numeric_id: numeric_id.into(),
            owner: owner.into(),
        }
    }

    /// Arguments in positional order.
    pub fn positional(&self) -> [&str; 4] {
        [
            self.certificate_id.as_str(),
            self.degree.as_str(),
            self.numeric_id.as_str(),
            self.owner.as_str(),
        ]
    }
}

/// A parsed invocation. Dispatch over this enum is exhaustive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create and index a record.
    Create(CreateArgs),
    /// Return the stored bytes of one record.
    ReadById {
        /// Certificate ID.
        certificate_id: String,
    },
    /// Selector query on the owner field.
    QueryByOwner {
        /// Owner, any case.
        owner: String,
    },
    /// Range scan of the degree index.
    QueryByDegree {
        /// Degree, any case.
        degree: String,
    },
}

impl Operation {
    /// Parses a verb and its positional arguments.
    ///
    /// Accepts `create`, `readByID`, `queryByOwner` and `queryByDegree`, plus
    /// the chaincode names `initCert`, `readCert` and `queryCertByOwner`.
    pub fn parse<S: AsRef<str>>(verb: &str, args: &[S]) -> Result<Self, CertError> {
        let arg = |i: usize| args[i].as_ref().to_string();
        match verb {
            "create" | "initCert" => {
                if args.len() != 4 {
                    return Err(CertError::InvalidArgumentCount {
                        verb: "create",
                        expected: "4",
                        got: args.len(),
                    });
                }
                Ok(Operation::Create(CreateArgs::new(arg(0), arg(1), arg(2), arg(3))))
            }
            "readByID" | "readCert" => {
                if args.len() != 1 {
                    return Err(CertError::InvalidArgumentCount {
                        verb: "readByID",
                        expected: "1",
                        got: args.len(),
                    });
                }
                Ok(Operation::ReadById {
                    certificate_id: arg(0),
                })
            }
            "queryByOwner" | "queryCertByOwner" => {
                if args.is_empty() {
                    return Err(CertError::InvalidArgumentCount {
                        verb: "queryByOwner",
                        expected: "at least 1",
                        got: 0,
                    });
                }
                Ok(Operation::QueryByOwner { owner: arg(0) })
            }
            "queryByDegree" => {
                if args.is_empty() {
                    return Err(CertError::InvalidArgumentCount {
                        verb: "queryByDegree",
                        expected: "at least 1",
                        got: 0,
                    });
                }
                Ok(Operation::QueryByDegree { degree: arg(0) })
            }
            other => Err(CertError::UnknownOperation(other.to_string())),
        }
    }

    /// Canonical verb of this operation.
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Create(_) => "create",
            Operation::ReadById { .. } => "readByID",
            Operation::QueryByOwner { .. } => "queryByOwner",
            Operation::QueryByDegree { .. } => "queryByDegree",
        }
    }
}

/// Outcome of an invocation, shaped like a chaincode response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// [`OK`] or [`ERROR`].
    pub status: u16,
    /// Error message; empty on success.
    pub message: String,
    /// Success payload; empty on error.
    pub payload: Vec<u8>,
}

impl Response {
    /// Successful response carrying `payload`.
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: OK,
            message: String::new(),
            payload,
        }
    }

    /// Failed response carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// Returns true for [`OK`] responses.
    pub fn is_ok(&self) -> bool {
        self.status == OK
    }
}

impl From<Result<Vec<u8>, CertError>> for Response {
    fn from(result: Result<Vec<u8>, CertError>) -> Self {
        match result {
            Ok(payload) => Response::success(payload),
            Err(err) => Response::error(err.message()),
        }
    }
}
