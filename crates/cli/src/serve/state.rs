//! Application state shared across request handlers.

use digicon_chaincode::{Chaincode, ChaincodeError};
use tokio::sync::Mutex;

use crate::ledger::SharedLedger;

pub(crate) struct AppState {
    pub(crate) chaincode: Chaincode,
    /// The ledger behind a single lock: every invocation runs its
    /// read-then-write chain to completion before the next one starts.
    pub(crate) ledger: Mutex<SharedLedger>,
}

impl AppState {
    pub(crate) fn new(chaincode: Chaincode, ledger: SharedLedger) -> Self {
        Self {
            chaincode,
            ledger: Mutex::new(ledger),
        }
    }

    pub(crate) async fn invoke(
        &self,
        operation: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        let mut ledger = self.ledger.lock().await;
        self.chaincode.invoke(&mut **ledger, operation, args)
    }
}
