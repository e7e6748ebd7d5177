//! Fatal error taxonomy for the simulation core.

use honeycomb_ledger::LedgerError;
use thiserror::Error;

/// Errors that halt the simulation.
///
/// Vote-level rejections are not errors: the coordinator absorbs them
/// into per-validator outcomes and the run continues. Everything here is
/// fatal, and the runner reports the last consistent state alongside it.
#[derive(Debug, Error)]
pub enum SimError {
    /// The stake/approve/register sequence failed for a reason other
    /// than "already registered".
    #[error("validator setup failed: {0}")]
    Setup(#[source] LedgerError),

    /// Receipt submission was rejected by the ledger.
    #[error("receipt submission rejected: {0}")]
    Submission(#[source] LedgerError),

    /// Connectivity failure: the ledger outcome is unknown. Never
    /// classified as a slash.
    #[error("ledger transport failure: {0}")]
    Transport(String),
}

impl SimError {
    /// Maps a registration-phase ledger failure.
    pub(crate) fn setup(err: LedgerError) -> Self {
        match err {
            LedgerError::Transport(msg) => Self::Transport(msg),
            other => Self::Setup(other),
        }
    }

    /// Maps a submission-phase ledger failure.
    pub(crate) fn submission(err: LedgerError) -> Self {
        match err {
            LedgerError::Transport(msg) => Self::Transport(msg),
            other => Self::Submission(other),
        }
    }

    /// Maps a failed read-only query. Reads do not revert in this model,
    /// so anything unexpected surfaces as a transport-class failure
    /// rather than a guess about ledger state.
    pub(crate) fn query(err: LedgerError) -> Self {
        match err {
            LedgerError::Transport(msg) => Self::Transport(msg),
            other => Self::Transport(other.to_string()),
        }
    }
}
