use crate::signatory::SignatoryRole;
use crate::state::StateHeading;

/// Errors raised when a contract violates one of its invariants, or when
/// a contract record cannot be encoded or decoded.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The contract heading (its object/title) is empty or whitespace.
    #[error("contract heading must not be empty")]
    EmptyHeading,

    /// The state history is empty; every contract starts with one state.
    #[error("contract has no state records")]
    NoStateRecords,

    /// More than one state record is still open (no end timestamp).
    #[error("contract has {count} open state records, expected at most 1")]
    OpenStates { count: usize },

    /// State records are not ordered by start timestamp.
    #[error("state record {index} starts before the record preceding it")]
    StatesOutOfOrder { index: usize },

    /// A signature or payment refers to a signatory outside the contract.
    #[error("signatory index {index} is out of range ({len} signatories)")]
    UnknownSignatory { index: usize, len: usize },

    /// A signatory without a role tag tried to sign.
    #[error("signatory {index} has no role and cannot sign")]
    MissingRole { index: usize },

    /// A signature whose role is not the role of the signatory it names.
    #[error("signature {index} does not match the role of its signatory")]
    RoleMismatch { index: usize },

    /// A signature whose digest is not the digest of its signatory.
    #[error("signature {index} digest does not match its signatory")]
    DigestMismatch { index: usize },

    /// A second signature for a role that has already signed.
    #[error("role {role} has already signed")]
    DuplicateRole { role: SignatoryRole },

    /// A payment with a negative amount.
    #[error("payment {index} has a negative amount")]
    NegativeAmount { index: usize },

    /// A lifecycle transition that does not move forward.
    #[error("cannot transition from {from} to {to}")]
    InvalidTransition { from: StateHeading, to: StateHeading },

    /// A transition or payment timestamped before the current state began.
    #[error("timestamp precedes the start of the current state")]
    TimestampRegression,

    /// JSON encode/decode failure.
    #[error("contract codec error: {0}")]
    Codec(#[from] serde_json::Error),
}
