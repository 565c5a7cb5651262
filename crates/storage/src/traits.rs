use crate::error::StorageError;

/// Access to the key-value store of record.
///
/// A `LedgerGateway` is a pass-through boundary: it has no logic of its
/// own and enforces nothing about keys or values.
///
/// ## Semantics
///
/// - `get` returning `Ok(None)` is indistinguishable from a key that was
///   never written.
/// - `put` on an existing key overwrites it. Callers that need
///   create-only semantics must check with `get` first.
/// - Neither method retries or locks. A read-then-write sequence is only
///   safe when the caller serializes invocations touching the same key.
pub trait LedgerGateway {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

impl<G: LedgerGateway + ?Sized> LedgerGateway for &mut G {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).put(key, value)
    }
}

impl<G: LedgerGateway + ?Sized> LedgerGateway for Box<G> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).put(key, value)
    }
}
