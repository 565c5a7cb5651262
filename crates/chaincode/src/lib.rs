//! digicon-chaincode: ledger operations over the contract domain model.
//!
//! Three operations are exposed through [`Chaincode::invoke`]:
//!
//! | Operation     | Arguments      | Result                          |
//! |---------------|----------------|---------------------------------|
//! | `initLedger`  | none           | serialized genesis contract     |
//! | `addContract` | `key`, `value` | `value` echoed back             |
//! | `getContract` | `key`          | bytes stored under `key`        |
//!
//! The [`ContractRepository`] enforces create-only writes and tolerant
//! reads; [`genesis`] writes the seed record at key `"0"` exactly once.

mod dispatch;
mod error;
pub mod genesis;
mod repository;

pub use dispatch::{Chaincode, Clock, Operation};
pub use error::{ChaincodeError, ErrorKind};
pub use genesis::GENESIS_KEY;
pub use repository::ContractRepository;
