//! Backend selection for the configured ledger.

use digicon_storage::{FileLedger, LedgerGateway, MemoryLedger, StorageError};

use crate::config::{Backend, LedgerConfig};

/// Ledger handle shared by the CLI commands and the HTTP gateway.
pub(crate) type SharedLedger = Box<dyn LedgerGateway + Send>;

pub(crate) fn open_ledger(config: &LedgerConfig) -> Result<SharedLedger, StorageError> {
    match config.backend {
        Backend::File => {
            let ledger = FileLedger::open(&config.path)?;
            tracing::debug!(
                path = %ledger.path().display(),
                entries = ledger.len(),
                "file ledger opened"
            );
            Ok(Box::new(ledger))
        }
        Backend::Memory => {
            tracing::debug!("memory ledger opened");
            Ok(Box::new(MemoryLedger::new()))
        }
    }
}
