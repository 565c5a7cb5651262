pub mod conformance;
mod error;
mod file;
mod memory;
mod traits;

pub use error::StorageError;
pub use file::FileLedger;
pub use memory::MemoryLedger;
pub use traits::LedgerGateway;
