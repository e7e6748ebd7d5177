//! Common types for the Honeycomb ledger abstraction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque external-ledger address of an account (validator or authority).
///
/// Uses UUID v4 for global uniqueness without coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerAddr(pub Uuid);

impl LedgerAddr {
    /// Creates a new random address.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an address from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Creates a deterministic address from a seed (for simulation).
    pub fn from_seed(seed: u64) -> Self {
        // Use seed bytes to create a deterministic UUID
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&seed.to_le_bytes());
        bytes[8..16].copy_from_slice(&seed.wrapping_mul(0x517cc1b727220a95).to_le_bytes());
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for LedgerAddr {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LedgerAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 chars for readability
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Content digest of a submitted receipt payload.
///
/// Opaque to the ledger - only uniqueness matters, so a duplicate digest
/// is rejected at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptDigest(pub [u8; 32]);

impl ReceiptDigest {
    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for ReceiptDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0[..4] {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Ledger-held validator record returned by the `validator_state` query.
///
/// `is_active == false` is the authoritative slash signal: failure
/// classification reads this, never the shape of a revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorState {
    /// Whether the validator may still vote.
    pub is_active: bool,

    /// Reputation currently locked as stake.
    pub staked: u128,
}
