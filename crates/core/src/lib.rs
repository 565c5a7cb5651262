//! digicon-core: contract domain model for the digicon ledger.
//!
//! A [`Contract`] is the aggregate stored under one ledger key. It owns
//! its signatories, the signatures collected from them, the history of
//! lifecycle states, and the payments issued against it. Signatures and
//! payments refer to signatories by index into [`Contract::signatories`].
//!
//! # Public API
//!
//! - [`Contract`] -- aggregate root with lifecycle helpers and validation
//! - [`Signatory`], [`SignatoryRole`] -- contracting parties
//! - [`ContractSignature`], [`signature_digest()`] -- signing evidence
//! - [`ContractState`], [`StateHeading`] -- lifecycle history
//! - [`Payment`] -- payment events
//! - [`ModelError`] -- invariant and codec errors
//! - [`display`] -- locale-dependent labels and summaries

pub mod contract;
pub mod display;
pub mod error;
pub mod payment;
pub mod signatory;
pub mod state;
pub mod timestamp;

pub use contract::{Contract, ContractSignature};
pub use display::Locale;
pub use error::ModelError;
pub use payment::Payment;
pub use signatory::{signature_digest, Signatory, SignatoryRole};
pub use state::{ContractState, StateHeading};
