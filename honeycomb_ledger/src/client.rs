//! Transactional client abstraction for the audit ledger.

use async_trait::async_trait;

use crate::error::LedgerError;
use crate::types::{LedgerAddr, ReceiptDigest, ValidatorState};

/// Abstraction over the external ledger that stores stakes, receipts,
/// votes, and authoritative slash state.
///
/// # Implementations
///
/// - **Production**: an RPC client bound to the deployed audit contracts
/// - **Simulation**: an in-memory deterministic ledger
///
/// # Call flow
///
/// ```text
/// Core                        Ledger
///  |                            |
///  |-- vote(id, decision) ----->|
///  |                            |-- [tally, maybe slash] --+
///  |<---- Ok / Reverted --------|<-------------------------+
/// ```
///
/// Mutating operations suspend until the ledger confirms inclusion, so
/// two calls issued in sequence observe each other's effects. `Ok(())`
/// means the effect is durable.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Credits `to`'s stakeable balance.
    ///
    /// # Failure
    /// Reverts with `Unauthorized` unless `from` is the ledger authority.
    async fn mint(&self, from: LedgerAddr, to: LedgerAddr, amount: u128) -> Result<(), LedgerError>;

    /// Authorizes the audit module to lock up to `amount` of `from`'s
    /// balance at registration time.
    async fn approve(&self, from: LedgerAddr, amount: u128) -> Result<(), LedgerError>;

    /// Locks `amount` of stake and activates `from` as a validator.
    ///
    /// # Failure
    /// Reverts with `AlreadyRegistered`, `InsufficientBalance`, or
    /// `InsufficientAllowance`.
    async fn register_validator(&self, from: LedgerAddr, amount: u128) -> Result<(), LedgerError>;

    /// Appends a receipt and advances the global receipt counter.
    ///
    /// The confirmation does not carry the assigned id; read
    /// [`next_receipt_id`](Self::next_receipt_id) to learn it.
    async fn submit_receipt(
        &self,
        from: LedgerAddr,
        digest: ReceiptDigest,
        is_trapdoor: bool,
    ) -> Result<(), LedgerError>;

    /// Returns the next-to-be-assigned receipt id (read-only).
    async fn next_receipt_id(&self) -> Result<u64, LedgerError>;

    /// Records `from`'s validity judgment on a receipt.
    ///
    /// May slash the voter as a side effect of the ledger's own tallying.
    ///
    /// # Failure
    /// Reverts when the voter is inactive, the vote is a duplicate, the
    /// receipt id is unknown, or the vote trips a trapdoor.
    async fn vote(&self, from: LedgerAddr, receipt_id: u64, decision: bool)
        -> Result<(), LedgerError>;

    /// Returns the ledger-held state for a validator (read-only).
    ///
    /// Unregistered addresses report as inactive with zero stake.
    async fn validator_state(&self, addr: LedgerAddr) -> Result<ValidatorState, LedgerError>;
}
