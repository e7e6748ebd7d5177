//! Simulation runner - drives the round loop and produces the report.

use honeycomb_ledger::{LedgerAddr, LedgerClient};
use serde::Serialize;
use tracing::{error, info};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::policy::Policy;
use crate::receipts::ReceiptGenerator;
use crate::registry::{Standing, ValidatorRegistry};
use crate::voting::{VoteOutcome, VotingCoordinator};

/// Final standing of one validator, as reported.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatorSummary {
    pub addr: String,
    pub policy: Policy,
    pub standing: Standing,
}

/// End-of-run report.
///
/// On a fatal error this still carries the last consistent state, with
/// `failure` set to the reason the run halted.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Master seed, for reproducing the run
    pub seed: u64,

    /// Rounds fully completed before the run ended
    pub rounds_completed: u64,

    /// How many submitted receipts were trapdoors
    pub trapdoor_receipts: u64,

    /// Votes the ledger confirmed
    pub votes_accepted: u64,

    /// Rejections classified as slashes
    pub votes_rejected_slash: u64,

    /// Rejections for any other ledger-level reason
    pub votes_rejected_other: u64,

    /// Per-validator final standing snapshot
    pub validators: Vec<ValidatorSummary>,

    /// Set when a fatal error halted the run early
    pub failure: Option<String>,
}

impl RunReport {
    fn new(seed: u64) -> Self {
        Self {
            seed,
            rounds_completed: 0,
            trapdoor_receipts: 0,
            votes_accepted: 0,
            votes_rejected_slash: 0,
            votes_rejected_other: 0,
            validators: Vec::new(),
            failure: None,
        }
    }

    /// Validators still active at the end of the run.
    pub fn active_count(&self) -> usize {
        self.validators
            .iter()
            .filter(|v| v.standing == Standing::Active)
            .count()
    }

    /// Validators slashed during the run.
    pub fn slashed_count(&self) -> usize {
        self.validators.len() - self.active_count()
    }
}

/// Drives the round loop against a ledger client.
///
/// Strictly sequential: each ledger call is awaited to confirmation
/// before the next one is issued.
pub struct SimulationRunner<L> {
    config: SimConfig,
    ledger: L,
    authority: LedgerAddr,
    registry: ValidatorRegistry,
    generator: ReceiptGenerator,
    coordinator: VotingCoordinator,
}

impl<L: LedgerClient> SimulationRunner<L> {
    /// Registers the configured validator population and returns a
    /// runner ready to drive rounds.
    ///
    /// Fatal if any registration fails for a reason other than
    /// "already registered".
    pub async fn setup(
        config: SimConfig,
        ledger: L,
        authority: LedgerAddr,
    ) -> Result<Self, SimError> {
        info!(
            "--- setting up {} honest + {} lazy validators ---",
            config.honest, config.lazy
        );

        let mut registry = ValidatorRegistry::new();
        for i in 0..config.honest {
            let addr = LedgerAddr::from_seed(1 + i as u64);
            registry
                .register(&ledger, authority, addr, Policy::Honest, config.stake_amount)
                .await?;
        }
        for i in 0..config.lazy {
            let addr = LedgerAddr::from_seed(1 + (config.honest + i) as u64);
            registry
                .register(&ledger, authority, addr, Policy::Lazy, config.stake_amount)
                .await?;
        }

        let generator = ReceiptGenerator::new(config.receipt_seed(), config.trapdoor_probability);
        let coordinator = VotingCoordinator::new(config.order_seed());
        Ok(Self {
            config,
            ledger,
            authority,
            registry,
            generator,
            coordinator,
        })
    }

    /// Runs the configured number of rounds.
    ///
    /// Never panics out of a fatal error: it is folded into the report
    /// so the last consistent state stays visible.
    pub async fn run(mut self) -> RunReport {
        let mut report = RunReport::new(self.config.seed);

        if let Err(e) = self.drive(&mut report).await {
            error!("simulation aborted: {}", e);
            report.failure = Some(e.to_string());
        }

        report.validators = self
            .registry
            .standings()
            .into_iter()
            .map(|(addr, policy, standing)| ValidatorSummary {
                addr: addr.to_string(),
                policy,
                standing,
            })
            .collect();
        report
    }

    async fn drive(&mut self, report: &mut RunReport) -> Result<(), SimError> {
        info!("--- starting {} rounds ---", self.config.rounds);

        for round in 0..self.config.rounds {
            let draft = self.generator.next(round);
            if draft.is_trapdoor {
                report.trapdoor_receipts += 1;
            }

            self.ledger
                .submit_receipt(self.authority, draft.digest, draft.is_trapdoor)
                .await
                .map_err(SimError::submission)?;

            // The submission confirmation does not carry the assigned id;
            // the published counter is the authoritative source.
            let next = self
                .ledger
                .next_receipt_id()
                .await
                .map_err(SimError::query)?;
            let receipt = draft.submitted(next - 1);

            info!(
                "round {}: receipt {} submitted (trapdoor: {})",
                round + 1,
                receipt.id,
                receipt.is_trapdoor
            );

            let votes = self
                .coordinator
                .run_round(&self.ledger, &mut self.registry, receipt)
                .await?;
            for vote in &votes {
                match vote.outcome {
                    VoteOutcome::Accepted => report.votes_accepted += 1,
                    VoteOutcome::RejectedSlash => report.votes_rejected_slash += 1,
                    VoteOutcome::RejectedOther => report.votes_rejected_other += 1,
                }
            }

            report.rounds_completed = round + 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::SimLedger;

    fn config(seed: u64, rounds: u64, p: f64) -> SimConfig {
        SimConfig {
            seed,
            rounds,
            trapdoor_probability: p,
            ..Default::default()
        }
    }

    async fn run(config: SimConfig) -> RunReport {
        let authority = LedgerAddr::from_seed(0);
        let ledger = SimLedger::new(authority);
        let runner = SimulationRunner::setup(config, ledger, authority)
            .await
            .unwrap();
        runner.run().await
    }

    #[tokio::test]
    async fn test_no_trapdoors_means_no_slashes() {
        let report = run(config(7, 10, 0.0)).await;
        assert!(report.failure.is_none());
        assert_eq!(report.rounds_completed, 10);
        assert_eq!(report.trapdoor_receipts, 0);
        assert_eq!(report.votes_rejected_slash, 0);
        assert_eq!(report.votes_rejected_other, 0);
        assert_eq!(report.active_count(), 5);
        // 5 validators voted every one of the 10 rounds.
        assert_eq!(report.votes_accepted, 50);
    }

    #[tokio::test]
    async fn test_all_trapdoors_slash_every_lazy_in_its_first_round() {
        let report = run(config(7, 10, 1.0)).await;
        assert!(report.failure.is_none());
        assert_eq!(report.trapdoor_receipts, 10);
        assert_eq!(report.votes_rejected_slash, 2);
        assert_eq!(report.votes_rejected_other, 0);
        // Honest validators survive all 10 rounds; lazy ones are gone
        // after their single round-1 rejection.
        assert_eq!(report.votes_accepted, 30);
        for v in &report.validators {
            match v.policy {
                Policy::Honest => assert_eq!(v.standing, Standing::Active),
                _ => assert_eq!(v.standing, Standing::Slashed),
            }
        }
    }

    #[tokio::test]
    async fn test_forced_trapdoor_resolves_within_round_one() {
        let report = run(config(3, 1, 1.0)).await;
        assert_eq!(report.rounds_completed, 1);
        assert_eq!(report.active_count(), 3);
        assert_eq!(report.slashed_count(), 2);
    }

    #[tokio::test]
    async fn test_same_seed_reproduces_the_report() {
        let a = run(config(99, 20, 0.3)).await;
        let b = run(config(99, 20, 0.3)).await;
        assert_eq!(a.trapdoor_receipts, b.trapdoor_receipts);
        assert_eq!(a.votes_accepted, b.votes_accepted);
        assert_eq!(a.votes_rejected_slash, b.votes_rejected_slash);
        assert_eq!(a.active_count(), b.active_count());
    }

    #[tokio::test]
    async fn test_attrition_is_monotonic_and_slashes_are_at_most_once() {
        // With p=0.3 over many rounds, both lazy validators are caught
        // eventually but must be counted exactly once each.
        let report = run(config(42, 50, 0.3)).await;
        assert!(report.failure.is_none());
        assert!(report.votes_rejected_slash <= 2);
        assert_eq!(report.slashed_count() as u64, report.votes_rejected_slash);
        assert!(report.active_count() >= 3);
    }

    #[tokio::test]
    async fn test_submission_rejection_is_fatal_but_reported() {
        let authority = LedgerAddr::from_seed(0);
        let ledger = SimLedger::new(authority);

        // Pre-submit the digest the generator will draft for round 0 so
        // the runner's own submission collides.
        let cfg = config(11, 5, 0.0);
        let draft = ReceiptGenerator::new(cfg.receipt_seed(), cfg.trapdoor_probability).next(0);
        ledger
            .submit_receipt(authority, draft.digest, false)
            .await
            .unwrap();

        let runner = SimulationRunner::setup(cfg, ledger, authority)
            .await
            .unwrap();
        let report = runner.run().await;

        assert!(report.failure.is_some());
        assert_eq!(report.rounds_completed, 0);
        // Last consistent state: everyone registered, nobody voted.
        assert_eq!(report.validators.len(), 5);
        assert_eq!(report.active_count(), 5);
    }

    #[tokio::test]
    async fn test_transport_failure_halts_with_state_intact() {
        let authority = LedgerAddr::from_seed(0);
        let ledger = SimLedger::new(authority);
        ledger.fail_next_votes(1);

        let runner = SimulationRunner::setup(config(5, 10, 0.0), ledger, authority)
            .await
            .unwrap();
        let report = runner.run().await;

        let failure = report.failure.as_ref().expect("transport failure must abort");
        assert!(failure.contains("transport"));
        assert_eq!(report.rounds_completed, 0);
        // A lost confirmation is never recorded as a slash.
        assert_eq!(report.votes_rejected_slash, 0);
        assert_eq!(report.active_count(), 5);
    }
}
