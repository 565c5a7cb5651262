//! Create and read operations over ledger records.

use digicon_core::Contract;
use digicon_storage::LedgerGateway;

use crate::error::ChaincodeError;

/// Create/read access to contract records through a [`LedgerGateway`].
///
/// The repository owns the non-overwrite rule: the gateway itself always
/// overwrites, so every create checks for an existing value first. That
/// check and the following write are not atomic; the host must serialize
/// concurrent invocations on the same key.
pub struct ContractRepository<G> {
    ledger: G,
}

impl<G: LedgerGateway> ContractRepository<G> {
    pub fn new(ledger: G) -> Self {
        ContractRepository { ledger }
    }

    pub fn into_inner(self) -> G {
        self.ledger
    }

    /// Store `value` under a fresh `key` and echo the bytes back.
    ///
    /// The value is not required to decode as a [`Contract`].
    pub fn create(&mut self, key: &str, value: &[u8]) -> Result<Vec<u8>, ChaincodeError> {
        if key.is_empty() {
            return Err(ChaincodeError::bad_arguments("key must not be empty"));
        }
        if value.is_empty() {
            return Err(ChaincodeError::bad_arguments("value must not be empty"));
        }
        if self.ledger.get(key)?.is_some() {
            return Err(ChaincodeError::AlreadyExists {
                key: key.to_string(),
            });
        }
        self.ledger.put(key, value)?;
        tracing::info!(key, bytes = value.len(), "asset created");
        Ok(value.to_vec())
    }

    /// Return the bytes stored under `key`, exactly as written.
    ///
    /// The bytes are decoded as a [`Contract`] for logging only: a record
    /// that fails to decode or validate is still returned, with a warning.
    pub fn read(&self, key: &str) -> Result<Vec<u8>, ChaincodeError> {
        if key.is_empty() {
            return Err(ChaincodeError::bad_arguments("key must not be empty"));
        }
        let bytes = self
            .ledger
            .get(key)?
            .ok_or_else(|| ChaincodeError::NotFound {
                key: key.to_string(),
            })?;

        match Contract::from_json_bytes(&bytes) {
            Ok(contract) => {
                if let Err(e) = contract.validate() {
                    tracing::warn!(key, error = %e, "stored contract violates an invariant");
                }
                tracing::debug!(
                    key,
                    heading = %contract.contract_heading,
                    state = ?contract.current_heading(),
                    "contract read"
                );
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value is not a well-formed contract");
            }
        }
        Ok(bytes)
    }

    /// Validate and store a typed contract under a fresh `key`.
    pub fn create_contract(
        &mut self,
        key: &str,
        contract: &Contract,
    ) -> Result<Vec<u8>, ChaincodeError> {
        contract.validate()?;
        let bytes = contract.to_json_bytes()?;
        self.create(key, &bytes)
    }

    /// Read and decode the contract under `key`.
    pub fn read_contract(&self, key: &str) -> Result<Contract, ChaincodeError> {
        let bytes = self.read(key)?;
        Ok(Contract::from_json_bytes(&bytes)?)
    }
}
