//! Honeycomb Ledger Abstraction Layer
//!
//! This crate defines the interface the audit simulation core needs from
//! the external ledger: the authoritative store of stakes, receipts,
//! votes, and slash state. The core never re-implements ledger
//! consensus - it issues transactional operations through [`LedgerClient`]
//! and reacts to their confirmed outcomes.
//!
//! # Transactional model
//!
//! Every mutating operation is confirmation-awaited: the returned future
//! resolves only once the ledger has durably included (or rejected) the
//! call. A [`LedgerError::Reverted`] is a confirmed rejection; a
//! [`LedgerError::Transport`] means the outcome is unknown and the caller
//! must abort rather than guess.
//!
//! # Example
//!
//! ```ignore
//! use honeycomb_ledger::{LedgerClient, LedgerError};
//!
//! async fn stake<L: LedgerClient>(ledger: &L, me: LedgerAddr) -> Result<(), LedgerError> {
//!     ledger.approve(me, 100).await?;
//!     ledger.register_validator(me, 100).await
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::LedgerClient;
pub use error::{LedgerError, RevertReason};
pub use types::{LedgerAddr, ReceiptDigest, ValidatorState};
