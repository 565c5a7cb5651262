use std::collections::BTreeMap;

use crate::error::StorageError;
use crate::traits::LedgerGateway;

/// In-memory ledger backed by an ordered map.
///
/// Reads and writes can be made to fail on demand, which lets callers
/// exercise their store-error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    entries: BTreeMap<String, Vec<u8>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Make every subsequent `get` fail with a backend error.
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every subsequent `put` fail with a backend error.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl LedgerGateway for MemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Backend(format!("read of '{}' refused", key)));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Backend(format!("write of '{}' refused", key)));
        }
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
