//! Error types for the finance tracker.
//!
//! Internal plumbing uses `anyhow` (`Res<T>`) so that context can be attached freely. At module
//! boundaries errors are classified with an `ErrorType` so that callers, such as a presentation
//! layer, can tell a validation failure from a missing record or a storage outage.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type. Errors are `anyhow::Error` and carry no classification.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The broad class of an `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Malformed or incomplete user input. Raised before any storage call is made.
    Validation,
    /// The operation referenced a transaction id that is not present.
    NotFound,
    /// The storage backend was unreachable or rejected the operation.
    Storage,
    /// The configuration or home directory is missing or invalid.
    Config,
    /// Anything else.
    Internal,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error with an `ErrorType` and a chain of context messages.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    /// Creates a `Validation` error with `message`.
    pub fn validation(message: impl Display) -> Self {
        Self::new(ErrorType::Validation, anyhow::anyhow!("{message}"))
    }

    /// Creates a `NotFound` error with `message`.
    pub fn not_found(message: impl Display) -> Self {
        Self::new(ErrorType::NotFound, anyhow::anyhow!("{message}"))
    }

    /// Creates a `Storage` error with `message`.
    pub fn storage(message: impl Display) -> Self {
        Self::new(ErrorType::Storage, anyhow::anyhow!("{message}"))
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    pub fn is_validation(&self) -> bool {
        self.error_type == ErrorType::Validation
    }

    pub fn is_not_found(&self) -> bool {
        self.error_type == ErrorType::NotFound
    }

    pub fn is_storage(&self) -> bool {
        self.error_type == ErrorType::Storage
    }

    /// Adds a context message while keeping the `ErrorType`.
    pub fn context(self, message: impl Display + Send + Sync + 'static) -> Self {
        Self {
            error_type: self.error_type,
            inner: self.inner.context(message),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.inner)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let inner: &(dyn std::error::Error + Send + Sync + 'static) = self.inner.as_ref();
        Some(inner)
    }
}

impl From<anyhow::Error> for Error {
    fn from(inner: anyhow::Error) -> Self {
        Self::new(ErrorType::Internal, inner)
    }
}

/// Converts an internal result into the public `Result`, tagging the error with `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
