//! Validator registry - owns the agent population and its standing.

use honeycomb_ledger::{LedgerAddr, LedgerClient, LedgerError, RevertReason};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SimError;
use crate::policy::Policy;

/// Current eligibility of a validator.
///
/// Monotonic within a run: once `Slashed`, never `Active` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standing {
    Active,
    Slashed,
}

/// A registered validator agent.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    /// External-ledger address, unique within the registry
    pub addr: LedgerAddr,

    /// Behavior policy, fixed at registration
    pub policy: Policy,

    /// Mutated only by [`ValidatorRegistry::mark_slashed`]
    pub standing: Standing,
}

/// Owns the validator set. The "never dispatch to slashed" rule is
/// enforced here, at the point of access, not by convention at call
/// sites.
#[derive(Debug, Default)]
pub struct ValidatorRegistry {
    validators: Vec<Validator>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stakes reputation with the ledger and records the validator
    /// locally once the ledger confirms.
    ///
    /// Drives the mint -> approve -> register sequence. An
    /// `AlreadyRegistered` revert is tolerated: the stake is already
    /// locked from a previous setup, so the validator is treated as
    /// present instead of failing the whole setup.
    pub async fn register<L: LedgerClient + ?Sized>(
        &mut self,
        ledger: &L,
        authority: LedgerAddr,
        addr: LedgerAddr,
        policy: Policy,
        stake_amount: u128,
    ) -> Result<(), SimError> {
        ledger
            .mint(authority, addr, stake_amount)
            .await
            .map_err(SimError::setup)?;
        ledger
            .approve(addr, stake_amount)
            .await
            .map_err(SimError::setup)?;

        match ledger.register_validator(addr, stake_amount).await {
            Ok(()) => info!("validator {} ({}) registered", addr, policy),
            Err(LedgerError::Reverted(RevertReason::AlreadyRegistered)) => {
                warn!("validator {} already registered, keeping existing stake", addr);
            }
            Err(e) => return Err(SimError::setup(e)),
        }

        if !self.validators.iter().any(|v| v.addr == addr) {
            self.validators.push(Validator {
                addr,
                policy,
                standing: Standing::Active,
            });
        }
        Ok(())
    }

    /// All validators, any standing.
    pub fn all(&self) -> &[Validator] {
        &self.validators
    }

    /// Validators currently eligible to vote, in registry order.
    ///
    /// Dispatch must go through the coordinator's seeded shuffle rather
    /// than rely on this order.
    pub fn active(&self) -> Vec<Validator> {
        self.validators
            .iter()
            .filter(|v| v.standing == Standing::Active)
            .copied()
            .collect()
    }

    /// Number of validators still active.
    pub fn active_count(&self) -> usize {
        self.validators
            .iter()
            .filter(|v| v.standing == Standing::Active)
            .count()
    }

    /// Live standing check for one validator.
    pub fn is_active(&self, addr: LedgerAddr) -> bool {
        self.validators
            .iter()
            .any(|v| v.addr == addr && v.standing == Standing::Active)
    }

    /// Marks a validator slashed.
    ///
    /// Idempotent: returns `true` only on the Active -> Slashed
    /// transition, `false` for an already-slashed or unknown validator.
    pub fn mark_slashed(&mut self, addr: LedgerAddr) -> bool {
        match self.validators.iter_mut().find(|v| v.addr == addr) {
            Some(v) if v.standing == Standing::Active => {
                v.standing = Standing::Slashed;
                true
            }
            _ => false,
        }
    }

    /// Per-validator standing snapshot for the report.
    pub fn standings(&self) -> Vec<(LedgerAddr, Policy, Standing)> {
        self.validators
            .iter()
            .map(|v| (v.addr, v.policy, v.standing))
            .collect()
    }
}
