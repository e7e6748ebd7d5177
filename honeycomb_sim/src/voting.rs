//! Voting coordinator - drives one receipt through the validator set.

use honeycomb_ledger::{LedgerAddr, LedgerClient, LedgerError};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SimError;
use crate::receipts::Receipt;
use crate::registry::ValidatorRegistry;
use crate::slash::SlashDetector;

/// Classified result of one vote attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    /// The ledger confirmed the vote.
    Accepted,

    /// The vote was rejected and the post-hoc state read shows the
    /// validator is no longer active.
    RejectedSlash,

    /// The vote was rejected for any other ledger-level reason
    /// (duplicate vote, unknown receipt, ...). The validator stays
    /// active.
    RejectedOther,
}

/// One cast vote. Not persisted beyond the round - it exists to update
/// the report counters.
#[derive(Debug, Clone, Copy)]
pub struct Vote {
    /// Lookup key of the casting validator, not an owning reference
    pub validator: LedgerAddr,

    /// Target receipt
    pub receipt_id: u64,

    /// The validity judgment that was dispatched
    pub decision: bool,

    /// Classified after the ledger call returned
    pub outcome: VoteOutcome,
}

/// Orders and dispatches each active validator's vote for one receipt.
pub struct VotingCoordinator {
    /// RNG for the per-round dispatch shuffle.
    ///
    /// Note: seeded separately from the receipt stream so tests can pin
    /// the order without disturbing the trapdoor sequence.
    order_rng: ChaCha8Rng,
}

impl VotingCoordinator {
    /// Creates a coordinator with the given order seed.
    pub fn new(order_seed: u64) -> Self {
        Self {
            order_rng: ChaCha8Rng::seed_from_u64(order_seed),
        }
    }

    /// Runs the vote pass for one receipt.
    ///
    /// Validators are processed in a fresh random permutation each call,
    /// because ledger-side tallying can be order-sensitive. Standing is
    /// re-checked live before each dispatch: an earlier vote in the same
    /// round may already have slashed a later validator.
    ///
    /// Vote-level rejections are absorbed into [`VoteOutcome`]s; a
    /// transport failure aborts the round.
    pub async fn run_round<L: LedgerClient + ?Sized>(
        &mut self,
        ledger: &L,
        registry: &mut ValidatorRegistry,
        receipt: Receipt,
    ) -> Result<Vec<Vote>, SimError> {
        let mut roster = registry.active();
        roster.shuffle(&mut self.order_rng);

        let mut votes = Vec::with_capacity(roster.len());
        for validator in roster {
            // Live check, not the pre-round snapshot.
            if !registry.is_active(validator.addr) {
                debug!("skipping {}: slashed mid-round", validator.addr);
                continue;
            }

            let decision = validator.policy.decide(receipt.is_trapdoor);
            let outcome = match ledger.vote(validator.addr, receipt.id, decision).await {
                Ok(()) => {
                    info!(
                        "  validator {} ({}) voted {}",
                        validator.addr, validator.policy, decision
                    );
                    VoteOutcome::Accepted
                }
                Err(LedgerError::Transport(msg)) => {
                    // Unknown outcome: abort, never record as a slash.
                    return Err(SimError::Transport(msg));
                }
                Err(LedgerError::Reverted(_)) => {
                    // The revert reason is deliberately ignored; ledger
                    // standing is the only authoritative slash signal.
                    if SlashDetector::was_slashed(ledger, validator.addr).await? {
                        registry.mark_slashed(validator.addr);
                        warn!(
                            "  validator {} ({}) was SLASHED",
                            validator.addr, validator.policy
                        );
                        VoteOutcome::RejectedSlash
                    } else {
                        warn!(
                            "  validator {} ({}) vote rejected, still active",
                            validator.addr, validator.policy
                        );
                        VoteOutcome::RejectedOther
                    }
                }
            };

            votes.push(Vote {
                validator: validator.addr,
                receipt_id: receipt.id,
                decision,
                outcome,
            });
        }
        Ok(votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::SimLedger;
    use crate::policy::Policy;
    use crate::receipts::ReceiptGenerator;

    async fn setup(
        policies: &[Policy],
    ) -> (SimLedger, ValidatorRegistry, LedgerAddr) {
        let authority = LedgerAddr::from_seed(0);
        let ledger = SimLedger::new(authority);
        let mut registry = ValidatorRegistry::new();
        for (i, policy) in policies.iter().enumerate() {
            registry
                .register(&ledger, authority, LedgerAddr::from_seed(1 + i as u64), *policy, 100)
                .await
                .unwrap();
        }
        (ledger, registry, authority)
    }

    async fn submit(ledger: &SimLedger, authority: LedgerAddr, is_trapdoor: bool) -> Receipt {
        let draft = ReceiptGenerator::new(9, 0.0).next(0);
        ledger
            .submit_receipt(authority, draft.digest, is_trapdoor)
            .await
            .unwrap();
        let id = ledger.next_receipt_id().await.unwrap() - 1;
        Receipt {
            id,
            round: 0,
            is_trapdoor,
        }
    }

    #[tokio::test]
    async fn test_genuine_receipt_all_accepted() {
        let (ledger, mut registry, authority) =
            setup(&[Policy::Honest, Policy::Honest, Policy::Lazy]).await;
        let receipt = submit(&ledger, authority, false).await;

        let mut coordinator = VotingCoordinator::new(1);
        let votes = coordinator
            .run_round(&ledger, &mut registry, receipt)
            .await
            .unwrap();

        assert_eq!(votes.len(), 3);
        assert!(votes.iter().all(|v| v.outcome == VoteOutcome::Accepted));
        assert!(votes.iter().all(|v| v.decision));
        assert_eq!(registry.active_count(), 3);
    }

    #[tokio::test]
    async fn test_trapdoor_slashes_lazy_but_not_honest() {
        let (ledger, mut registry, authority) =
            setup(&[Policy::Honest, Policy::Lazy, Policy::Lazy]).await;
        let receipt = submit(&ledger, authority, true).await;

        let mut coordinator = VotingCoordinator::new(1);
        let votes = coordinator
            .run_round(&ledger, &mut registry, receipt)
            .await
            .unwrap();

        let slashed = votes
            .iter()
            .filter(|v| v.outcome == VoteOutcome::RejectedSlash)
            .count();
        let accepted = votes
            .iter()
            .filter(|v| v.outcome == VoteOutcome::Accepted)
            .count();
        assert_eq!(slashed, 2);
        assert_eq!(accepted, 1);
        assert_eq!(registry.active_count(), 1);
        assert!(registry.is_active(LedgerAddr::from_seed(1)));
    }

    #[tokio::test]
    async fn test_slashed_validator_is_never_dispatched() {
        let (ledger, mut registry, authority) = setup(&[Policy::Honest, Policy::Lazy]).await;
        registry.mark_slashed(LedgerAddr::from_seed(2));
        let receipt = submit(&ledger, authority, false).await;

        let mut coordinator = VotingCoordinator::new(1);
        let votes = coordinator
            .run_round(&ledger, &mut registry, receipt)
            .await
            .unwrap();

        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].validator, LedgerAddr::from_seed(1));
        // Only the honest validator's vote reached the ledger.
        assert_eq!(ledger.vote_count(receipt.id), 1);
    }

    #[tokio::test]
    async fn test_duplicate_vote_is_rejected_other() {
        let (ledger, mut registry, authority) = setup(&[Policy::Honest]).await;
        let receipt = submit(&ledger, authority, false).await;

        // Pre-cast the same vote directly so the coordinator's dispatch
        // collides with it.
        ledger
            .vote(LedgerAddr::from_seed(1), receipt.id, true)
            .await
            .unwrap();

        let mut coordinator = VotingCoordinator::new(1);
        let votes = coordinator
            .run_round(&ledger, &mut registry, receipt)
            .await
            .unwrap();

        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].outcome, VoteOutcome::RejectedOther);
        assert!(registry.is_active(LedgerAddr::from_seed(1)));
    }

    #[tokio::test]
    async fn test_transport_failure_aborts_without_slashing() {
        let (ledger, mut registry, authority) = setup(&[Policy::Honest, Policy::Lazy]).await;
        let receipt = submit(&ledger, authority, false).await;
        ledger.fail_next_votes(1);

        let mut coordinator = VotingCoordinator::new(1);
        let err = coordinator
            .run_round(&ledger, &mut registry, receipt)
            .await
            .unwrap_err();

        assert!(matches!(err, SimError::Transport(_)));
        assert_eq!(registry.active_count(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_order_is_pinned_by_seed() {
        let order = |seed: u64| async move {
            let (ledger, mut registry, authority) =
                setup(&[Policy::Honest, Policy::Honest, Policy::Honest, Policy::Honest]).await;
            let receipt = submit(&ledger, authority, false).await;
            let mut coordinator = VotingCoordinator::new(seed);
            coordinator
                .run_round(&ledger, &mut registry, receipt)
                .await
                .unwrap()
                .iter()
                .map(|v| v.validator)
                .collect::<Vec<_>>()
        };

        assert_eq!(order(7).await, order(7).await);
    }
}
