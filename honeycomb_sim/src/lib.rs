//! Honeycomb Audit Protocol Simulation
//!
//! Simulates a reputation-staked audit protocol: a population of
//! validator agents with distinct behavior policies evaluates a stream
//! of receipts, some of which are deliberately poisoned ("trapdoor"
//! receipts planted to test honesty). A validator that judges a trapdoor
//! receipt valid is slashed by the ledger and excluded from all further
//! rounds.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SimulationRunner                       │
//! │                                                             │
//! │  ReceiptGenerator ──► submit ──► VotingCoordinator          │
//! │                         │              │        │           │
//! │                         ▼              ▼        ▼           │
//! │                    LedgerClient ◄─ SlashDetector            │
//! │                         ▲              │                    │
//! │                         │              ▼                    │
//! │                         └──── ValidatorRegistry             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Execution is strictly sequential: every ledger call is
//! confirmation-awaited before the next one is issued, because later
//! decisions (is this validator still active?) depend on the prior
//! call's confirmed effect.
//!
//! All entropy derives from a single 64-bit master seed, so any run is
//! reproducible from its seed number.
//!
//! # Usage
//!
//! ```ignore
//! use honeycomb_sim::{SimConfig, SimLedger, SimulationRunner};
//! use honeycomb_ledger::LedgerAddr;
//!
//! let config = SimConfig { seed: 42, ..Default::default() };
//! let authority = LedgerAddr::from_seed(0);
//! let ledger = SimLedger::new(authority);
//! let report = SimulationRunner::setup(config, ledger, authority)
//!     .await?
//!     .run()
//!     .await;
//! ```

mod config;
mod error;
mod ledger;
mod policy;
mod receipts;
mod registry;
mod runner;
mod slash;
mod voting;

pub use config::SimConfig;
pub use error::SimError;
pub use ledger::SimLedger;
pub use policy::Policy;
pub use receipts::{Receipt, ReceiptDraft, ReceiptGenerator};
pub use registry::{Standing, Validator, ValidatorRegistry};
pub use runner::{RunReport, SimulationRunner, ValidatorSummary};
pub use slash::SlashDetector;
pub use voting::{Vote, VoteOutcome, VotingCoordinator};
