use std::path::PathBuf;

/// All errors that can be returned by a LedgerGateway implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A backend-specific failure (connection, injected fault, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Reading or writing the ledger file failed.
    #[error("ledger file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ledger file exists but does not hold a valid ledger document.
    #[error("ledger file {} is corrupt: {message}", .path.display())]
    Corrupt { path: PathBuf, message: String },
}
