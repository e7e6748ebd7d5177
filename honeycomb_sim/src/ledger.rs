//! In-memory deterministic ledger for simulation.
//!
//! `SimLedger` implements [`LedgerClient`] with the authoritative audit
//! semantics: stake accounting, the global receipt counter, vote
//! recording, and the trapdoor slash side effect.
//! Fault-injection hooks let tests exercise the transport-failure paths.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use honeycomb_ledger::{
    LedgerAddr, LedgerClient, LedgerError, ReceiptDigest, RevertReason, ValidatorState,
};

#[derive(Debug, Clone, Copy)]
struct StoredReceipt {
    digest: ReceiptDigest,
    is_trapdoor: bool,
}

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<LedgerAddr, u128>,
    allowances: HashMap<LedgerAddr, u128>,
    validators: HashMap<LedgerAddr, ValidatorState>,
    receipts: Vec<StoredReceipt>,
    votes: HashMap<u64, HashMap<LedgerAddr, bool>>,
    vote_faults: u32,
    query_faults: u32,
}

/// Deterministic in-memory ledger.
///
/// Single-threaded callers observe fully serialized semantics: each call
/// takes the state lock, applies (or rejects) its effect, and returns a
/// confirmed outcome.
pub struct SimLedger {
    authority: LedgerAddr,
    state: Mutex<LedgerState>,
}

impl SimLedger {
    /// Creates a ledger whose mint and submission rights belong to
    /// `authority`.
    pub fn new(authority: LedgerAddr) -> Self {
        Self {
            authority,
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// The address holding mint and submission rights.
    pub fn authority(&self) -> LedgerAddr {
        self.authority
    }

    /// Makes the next `n` vote calls fail at the transport layer.
    pub fn fail_next_votes(&self, n: u32) {
        self.state.lock().unwrap().vote_faults = n;
    }

    /// Makes the next `n` validator-state reads fail at the transport
    /// layer.
    pub fn fail_next_queries(&self, n: u32) {
        self.state.lock().unwrap().query_faults = n;
    }

    /// Recorded vote count for a receipt (test hook).
    pub fn vote_count(&self, receipt_id: u64) -> usize {
        self.state
            .lock()
            .unwrap()
            .votes
            .get(&receipt_id)
            .map_or(0, |cast| cast.len())
    }
}

#[async_trait]
impl LedgerClient for SimLedger {
    async fn mint(&self, from: LedgerAddr, to: LedgerAddr, amount: u128) -> Result<(), LedgerError> {
        if from != self.authority {
            return Err(LedgerError::Reverted(RevertReason::Unauthorized));
        }
        let mut state = self.state.lock().unwrap();
        *state.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }

    async fn approve(&self, from: LedgerAddr, amount: u128) -> Result<(), LedgerError> {
        let mut state = self.state.lock().unwrap();
        state.allowances.insert(from, amount);
        Ok(())
    }

    async fn register_validator(&self, from: LedgerAddr, amount: u128) -> Result<(), LedgerError> {
        let mut state = self.state.lock().unwrap();
        if state.validators.contains_key(&from) {
            return Err(LedgerError::Reverted(RevertReason::AlreadyRegistered));
        }
        if state.balances.get(&from).copied().unwrap_or(0) < amount {
            return Err(LedgerError::Reverted(RevertReason::InsufficientBalance));
        }
        if state.allowances.get(&from).copied().unwrap_or(0) < amount {
            return Err(LedgerError::Reverted(RevertReason::InsufficientAllowance));
        }

        *state.balances.entry(from).or_insert(0) -= amount;
        *state.allowances.entry(from).or_insert(0) -= amount;
        state.validators.insert(
            from,
            ValidatorState {
                is_active: true,
                staked: amount,
            },
        );
        Ok(())
    }

    async fn submit_receipt(
        &self,
        from: LedgerAddr,
        digest: ReceiptDigest,
        is_trapdoor: bool,
    ) -> Result<(), LedgerError> {
        if from != self.authority {
            return Err(LedgerError::Reverted(RevertReason::Unauthorized));
        }
        let mut state = self.state.lock().unwrap();
        if state.receipts.iter().any(|r| r.digest == digest) {
            return Err(LedgerError::Reverted(RevertReason::DuplicateReceipt));
        }
        state.receipts.push(StoredReceipt {
            digest,
            is_trapdoor,
        });
        Ok(())
    }

    async fn next_receipt_id(&self) -> Result<u64, LedgerError> {
        Ok(self.state.lock().unwrap().receipts.len() as u64)
    }

    async fn vote(
        &self,
        from: LedgerAddr,
        receipt_id: u64,
        decision: bool,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.lock().unwrap();
        if state.vote_faults > 0 {
            state.vote_faults -= 1;
            return Err(LedgerError::transport("vote confirmation lost"));
        }

        let receipt = match state.receipts.get(receipt_id as usize) {
            Some(r) => *r,
            None => return Err(LedgerError::Reverted(RevertReason::UnknownReceipt)),
        };
        match state.validators.get(&from) {
            Some(v) if v.is_active => {}
            _ => return Err(LedgerError::Reverted(RevertReason::ValidatorInactive)),
        }
        if state
            .votes
            .get(&receipt_id)
            .map_or(false, |cast| cast.contains_key(&from))
        {
            return Err(LedgerError::Reverted(RevertReason::DuplicateVote));
        }

        // Judging a trapdoor receipt valid trips the slash: the stake
        // burns, the voter deactivates, and the vote itself is rejected.
        // The penalty persists even though the vote does not.
        if receipt.is_trapdoor && decision {
            if let Some(v) = state.validators.get_mut(&from) {
                v.is_active = false;
                v.staked = 0;
            }
            return Err(LedgerError::Reverted(RevertReason::TrapdoorTripped));
        }

        state.votes.entry(receipt_id).or_default().insert(from, decision);
        Ok(())
    }

    async fn validator_state(&self, addr: LedgerAddr) -> Result<ValidatorState, LedgerError> {
        let mut state = self.state.lock().unwrap();
        if state.query_faults > 0 {
            state.query_faults -= 1;
            return Err(LedgerError::transport("state query timed out"));
        }
        Ok(state.validators.get(&addr).copied().unwrap_or(ValidatorState {
            is_active: false,
            staked: 0,
        }))
    }
}
