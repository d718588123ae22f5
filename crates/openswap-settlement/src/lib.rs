//! # openswap-settlement
//!
//! **Finality Plane**: status ledger, call gate, currency normalization, fee
//! payouts, and the atomic swap engine.
//!
//! ## Architecture
//!
//! The [`SwapEngine`] receives a signed [`Order`](openswap_types::Order)
//! from a taker and:
//! 1. Authenticates it through `openswap-auth`
//! 2. Stages the OPEN → EXECUTED status transition
//! 3. Wraps attached native value when the currency leg allows it
//! 4. Moves both legs and pays fees through an [`AssetLedger`] transaction
//! 5. Persists the status, then commits the transaction
//!
//! ## Status storage
//!
//! - [`MemoryStatusStore`]: process-local
//! - [`FileStatusStore`]: append-only checksummed journal, replayed on open

pub mod engine;
pub mod fees;
pub mod gate;
pub mod journal;
pub mod ledger;
pub mod normalizer;
pub mod status_store;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use engine::SwapEngine;
pub use gate::{CallGate, CallScope};
pub use journal::{FileStatusStore, JournalSink};
pub use ledger::{AssetLedger, LedgerError, LedgerTx, Transfers};
pub use normalizer::{CurrencyNormalizer, Funding};
pub use status_store::{MemoryStatusStore, StagedStatus, StatusStore};
