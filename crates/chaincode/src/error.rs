use std::fmt;

use digicon_core::ModelError;
use digicon_storage::StorageError;
use serde::Serialize;

/// Stable tag for each failure class, suitable for wire responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    BadArguments,
    AlreadyInitialized,
    AlreadyExists,
    NotFound,
    UnknownOperation,
    StoreError,
    SerializationError,
    InvalidContract,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Failure of a chaincode operation.
///
/// Every variant is returned synchronously; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ChaincodeError {
    /// Wrong argument count or shape. Caller error, not retryable.
    #[error("bad arguments: {message}")]
    BadArguments { message: String },

    /// The genesis record already exists.
    #[error("ledger already initialized")]
    AlreadyInitialized,

    /// A record already exists under the key being created.
    #[error("asset {key} already exists")]
    AlreadyExists { key: String },

    /// No record exists under the key being read.
    #[error("asset with key {key} doesn't exist")]
    NotFound { key: String },

    /// The dispatcher has no operation with this name.
    #[error("unknown operation {name}")]
    UnknownOperation { name: String },

    /// The ledger gateway failed. May be transient.
    #[error("store error: {0}")]
    Store(#[from] StorageError),

    /// Encoding or decoding a contract failed.
    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A typed contract failed its invariants.
    #[error("invalid contract: {0}")]
    InvalidContract(#[source] ModelError),
}

impl ChaincodeError {
    pub(crate) fn bad_arguments(message: impl Into<String>) -> Self {
        ChaincodeError::BadArguments {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ChaincodeError::BadArguments { .. } => ErrorKind::BadArguments,
            ChaincodeError::AlreadyInitialized => ErrorKind::AlreadyInitialized,
            ChaincodeError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            ChaincodeError::NotFound { .. } => ErrorKind::NotFound,
            ChaincodeError::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            ChaincodeError::Store(_) => ErrorKind::StoreError,
            ChaincodeError::Serialization(_) => ErrorKind::SerializationError,
            ChaincodeError::InvalidContract(_) => ErrorKind::InvalidContract,
        }
    }

    /// Serialize to the JSON error envelope used by the CLI and HTTP gateway.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "kind":  self.kind(),
        })
    }
}

impl From<ModelError> for ChaincodeError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Codec(inner) => ChaincodeError::Serialization(inner),
            other => ChaincodeError::InvalidContract(other),
        }
    }
}
