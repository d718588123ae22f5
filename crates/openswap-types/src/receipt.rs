//! Receipts returned by the state-mutating entry points.
//!
//! A receipt is the caller-visible proof of what one call did: the order it
//! touched and every transfer it issued, in issue order.

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{OrderHash, OrderType};

/// One transfer issued against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferRecord {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

impl TransferRecord {
    #[must_use]
    pub fn new(token: Address, from: Address, to: Address, value: U256) -> Self {
        Self {
            token,
            from,
            to,
            value,
        }
    }
}

/// Result of a successful `swap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapReceipt {
    /// Time-ordered receipt identifier (UUIDv7).
    pub id: Uuid,
    pub order_hash: OrderHash,
    pub maker: Address,
    pub taker: Address,
    pub order_type: OrderType,
    /// Every transfer, in the order it was issued.
    pub transfers: Vec<TransferRecord>,
    /// Sum of all fee payouts.
    pub fees_paid: U256,
    /// Currency amount left for the counterparty after fees (zero for
    /// asset-for-asset trades).
    pub net_proceeds: U256,
    /// Native value wrapped by the engine during this call.
    pub wrapped: U256,
    pub executed_at: DateTime<Utc>,
}

/// Result of a successful `cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelReceipt {
    pub order_hash: OrderHash,
    pub maker: Address,
    pub canceled_at: DateTime<Utc>,
}
