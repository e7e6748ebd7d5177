//! Error types for the Honeycomb ledger abstraction.

use thiserror::Error;

/// Reason the ledger rejected a transaction.
///
/// A revert is a confirmed, durable no-op: the ledger processed the call
/// and refused it. Callers must not use the reason to infer slash state -
/// that comes from the `validator_state` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RevertReason {
    /// Caller lacks authority for this operation
    #[error("caller is not authorized")]
    Unauthorized,

    /// The address already holds an active or past registration
    #[error("validator already registered")]
    AlreadyRegistered,

    /// Stakeable balance is below the requested stake
    #[error("insufficient stakeable balance")]
    InsufficientBalance,

    /// Approved allowance is below the requested stake
    #[error("insufficient approved allowance")]
    InsufficientAllowance,

    /// Voter is unregistered or no longer active
    #[error("validator is not active")]
    ValidatorInactive,

    /// The voter already voted on this receipt
    #[error("duplicate vote for this receipt")]
    DuplicateVote,

    /// No receipt exists under this id
    #[error("unknown receipt id")]
    UnknownReceipt,

    /// A receipt with this content digest was already submitted
    #[error("duplicate receipt digest")]
    DuplicateReceipt,

    /// The vote judged a trapdoor receipt valid; the ledger slashed the
    /// voter as a side effect and rejected the call
    #[error("incorrect vote on a trapdoor receipt")]
    TrapdoorTripped,
}

/// Errors surfaced by a [`crate::LedgerClient`] operation.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger confirmed the call and rejected it.
    #[error("transaction reverted: {0}")]
    Reverted(RevertReason),

    /// The call never reached a confirmed outcome (connectivity failure,
    /// confirmation timeout). Must never be interpreted as a slash.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl LedgerError {
    /// Creates a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// True if this is a ledger-level revert rather than a transport failure.
    pub fn is_revert(&self) -> bool {
        matches!(self, Self::Reverted(_))
    }
}
