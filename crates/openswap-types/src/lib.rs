//! # openswap-types
//!
//! Shared types, errors, and configuration for the **OpenSwap** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderHash`], [`StatusKey`], plus the re-exported
//!   [`Address`], [`B256`], [`U256`] primitives
//! - **Order model**: [`Order`], [`OrderType`], [`Leg`]
//! - **Fee model**: [`FeeSplit`], [`FeeSchedule`]
//! - **Status model**: [`Status`]
//! - **Signature schemes**: [`SignatureKind`]
//! - **Call model**: [`CallContext`]
//! - **Receipts**: [`SwapReceipt`], [`CancelReceipt`], [`TransferRecord`]
//! - **Configuration**: [`EngineConfig`], [`DomainConfig`]
//! - **Errors**: [`SwapError`] with `OS_ERR_` prefix codes
//! - **Constants**: protocol type strings, magic values, defaults

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod fees;
pub mod ids;
pub mod order;
pub mod receipt;
pub mod signature;
pub mod status;

pub use alloy_primitives::{Address, B256, U256};

pub use config::*;
pub use context::*;
pub use error::*;
pub use fees::*;
pub use ids::*;
pub use order::*;
pub use receipt::*;
pub use signature::*;
pub use status::*;

// Constants are accessed via `openswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
