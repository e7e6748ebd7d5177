//! Slash detection - post-hoc classification of vote failures.

use honeycomb_ledger::{LedgerAddr, LedgerClient};

use crate::error::SimError;

/// Distinguishes "this vote failed because the ledger slashed me" from
/// "this vote failed for some other reason".
///
/// The verdict comes from a single authoritative state read, never from
/// the shape of the rejection itself: revert payloads are not a stable
/// interface, ledger standing is.
pub struct SlashDetector;

impl SlashDetector {
    /// Returns whether the ledger now holds `addr` as slashed.
    ///
    /// Call only after a vote revert - the read is idempotent but not
    /// free. A transport failure during the read propagates as
    /// transport, never as a slash verdict.
    pub async fn was_slashed<L: LedgerClient + ?Sized>(
        ledger: &L,
        addr: LedgerAddr,
    ) -> Result<bool, SimError> {
        let state = ledger
            .validator_state(addr)
            .await
            .map_err(SimError::query)?;
        Ok(!state.is_active)
    }
}
