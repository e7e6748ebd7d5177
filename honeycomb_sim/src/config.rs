//! Simulation configuration.

use serde::{Deserialize, Serialize};

/// Parameters for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Number of audit rounds to drive
    pub rounds: u64,

    /// Honest validators to register
    pub honest: usize,

    /// Lazy validators to register
    pub lazy: usize,

    /// Per-round probability that the receipt is a trapdoor
    pub trapdoor_probability: f64,

    /// Reputation staked by each validator at registration
    pub stake_amount: u128,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rounds: 10,
            honest: 3,
            lazy: 2,
            trapdoor_probability: 0.3,
            stake_amount: 100,
        }
    }
}

impl SimConfig {
    /// Sub-seed for the receipt stream.
    ///
    /// Note: derived separately from the vote-order seed so that changing
    /// the validator population does not shift the trapdoor sequence.
    pub fn receipt_seed(&self) -> u64 {
        self.seed.wrapping_mul(0x9e3779b97f4a7c15)
    }

    /// Sub-seed for the per-round dispatch shuffle.
    pub fn order_seed(&self) -> u64 {
        self.seed.wrapping_mul(0x517cc1b727220a95)
    }
}
