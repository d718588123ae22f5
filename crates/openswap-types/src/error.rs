//! Error types for the OpenSwap settlement engine.
//!
//! All errors use the `OS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 2xx: Signature errors
//! - 3xx: Status errors
//! - 4xx: Payment / fee errors
//! - 5xx: Ledger errors
//! - 6xx: Concurrency errors
//! - 9xx: General / internal errors

use alloy_primitives::U256;
use thiserror::Error;

use crate::{OrderHash, Status};

/// Central error enum for all OpenSwap operations.
///
/// Every variant aborts the enclosing `swap`/`cancel` call as a whole.
#[derive(Debug, Error)]
pub enum SwapError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// The order's deadline has passed.
    #[error("OS_ERR_100: Order expired at {expiration}, evaluated at {now}")]
    OrderExpired { expiration: U256, now: u64 },

    /// The order carries fees but has no currency leg to deduct them from.
    #[error("OS_ERR_101: Order type {order_type} does not support fees")]
    UnsupportedFees { order_type: crate::OrderType },

    // =================================================================
    // Signature Errors (2xx)
    // =================================================================
    /// The signature did not validate against the order's seller.
    #[error("OS_ERR_200: Invalid signature for order {0}")]
    InvalidSignature(OrderHash),

    // =================================================================
    // Status Errors (3xx)
    // =================================================================
    /// The order is not in the state the operation requires.
    ///
    /// Covers already-executed, already-canceled, and any mismatch against
    /// an expected prior state.
    #[error("OS_ERR_300: Order {hash} is not open (status {actual}, expected {expected})")]
    OrderNotOpen {
        hash: OrderHash,
        expected: Status,
        actual: Status,
    },

    // =================================================================
    // Payment / Fee Errors (4xx)
    // =================================================================
    /// Fee recipient and fee amount lists differ in length.
    #[error("OS_ERR_400: Invalid fee arrays: {recipients} recipients, {amounts} amounts")]
    InvalidArrays { recipients: usize, amounts: usize },

    /// Attached native value does not match the order terms.
    #[error("OS_ERR_401: Invalid payment: attached {attached}, required {required}")]
    InvalidPayment { attached: U256, required: U256 },

    /// Fees exceed the gross amount they are deducted from.
    #[error("OS_ERR_402: Arithmetic underflow: fees {fees} exceed amount {amount}")]
    ArithmeticUnderflow { fees: U256, amount: U256 },

    /// A checked sum overflowed 256 bits.
    #[error("OS_ERR_403: Arithmetic overflow while summing {context}")]
    ArithmeticOverflow { context: &'static str },

    // =================================================================
    // Ledger Errors (5xx)
    // =================================================================
    /// An external transfer was refused by the ledger.
    #[error("OS_ERR_500: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// Wrapping attached native value failed.
    #[error("OS_ERR_501: Wrap failed: {reason}")]
    WrapFailed { reason: String },

    // =================================================================
    // Concurrency Errors (6xx)
    // =================================================================
    /// A state-mutating entry point was invoked while another swap or
    /// cancel was still in progress.
    #[error("OS_ERR_600: Reentrant call rejected: another call is in progress")]
    ReentrantCall,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Serialization / deserialization error.
    #[error("OS_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("OS_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk).
    #[error("OS_ERR_903: I/O error: {0}")]
    Io(String),

    /// The status journal is unreadable or inconsistent.
    #[error("OS_ERR_904: Status storage error: {0}")]
    Storage(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SwapError>;

impl From<std::io::Error> for SwapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
