//! Order types for the OpenSwap settlement engine.
//!
//! An [`Order`] is signed off-chain by its maker (the `seller`) and filled
//! on demand by any taker. It is immutable once signed; the engine refers to
//! it only through its canonical hash.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::FeeSchedule;

/// Trade topology of an order.
///
/// The discriminant is part of the signed payload and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum OrderType {
    /// Asset for asset; no currency leg, no fees.
    AssetForAsset = 0,
    /// Maker offers currency (sell leg) for an asset (ask leg).
    BuyOffer = 1,
    /// Maker offers an asset (sell leg) for currency (ask leg).
    SellOffer = 2,
}

impl OrderType {
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AssetForAsset => write!(f, "ASSET_FOR_ASSET"),
            Self::BuyOffer => write!(f, "BUY_OFFER"),
            Self::SellOffer => write!(f, "SELL_OFFER"),
        }
    }
}

/// One side of a trade: a token reference plus an id-or-amount.
///
/// Whether `value` is a fungible amount or a unique item id is a property of
/// the token, not of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leg {
    pub token: Address,
    pub value: U256,
}

impl Leg {
    #[must_use]
    pub fn new(token: Address, value: U256) -> Self {
        Self { token, value }
    }
}

/// A maker-signed exchange order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// The maker; the address whose signature authorizes the order.
    pub seller: Address,
    pub order_type: OrderType,
    /// What the maker requests from the taker.
    pub ask: Leg,
    /// What the maker offers to the taker.
    pub sell: Leg,
    /// Fee payouts, deducted from the currency leg.
    #[serde(default)]
    pub fees: FeeSchedule,
    /// Deadline in unix seconds. The order is fillable while `now <= expiration`.
    pub expiration: U256,
    /// Uniqueness value; two otherwise identical orders differ by salt.
    pub salt: U256,
}

impl Order {
    /// Returns `true` if the order can no longer be filled at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: u64) -> bool {
        U256::from(now) > self.expiration
    }

    /// The leg fees are deducted from, if this topology has one.
    #[must_use]
    pub fn currency_leg(&self) -> Option<&Leg> {
        match self.order_type {
            OrderType::AssetForAsset => None,
            OrderType::BuyOffer => Some(&self.sell),
            OrderType::SellOffer => Some(&self.ask),
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    fn random_salt() -> U256 {
        U256::from_be_bytes(rand::random::<[u8; 32]>())
    }

    fn default_expiration() -> U256 {
        let now = chrono::Utc::now().timestamp().unsigned_abs();
        U256::from(now + 3600)
    }

    /// Maker sells item `item_id` of `item_token` for `price` of `currency`.
    pub fn dummy_sell_offer(
        seller: Address,
        item_token: Address,
        item_id: u64,
        currency: Address,
        price: u64,
    ) -> Self {
        Self {
            seller,
            order_type: OrderType::SellOffer,
            ask: Leg::new(currency, U256::from(price)),
            sell: Leg::new(item_token, U256::from(item_id)),
            fees: FeeSchedule::default(),
            expiration: Self::default_expiration(),
            salt: Self::random_salt(),
        }
    }

    /// Maker offers `price` of `currency` for item `item_id` of `item_token`.
    pub fn dummy_buy_offer(
        seller: Address,
        item_token: Address,
        item_id: u64,
        currency: Address,
        price: u64,
    ) -> Self {
        Self {
            seller,
            order_type: OrderType::BuyOffer,
            ask: Leg::new(item_token, U256::from(item_id)),
            sell: Leg::new(currency, U256::from(price)),
            fees: FeeSchedule::default(),
            expiration: Self::default_expiration(),
            salt: Self::random_salt(),
        }
    }

    /// Maker swaps one item for another.
    pub fn dummy_asset_for_asset(seller: Address, ask: Leg, sell: Leg) -> Self {
        Self {
            seller,
            order_type: OrderType::AssetForAsset,
            ask,
            sell,
            fees: FeeSchedule::default(),
            expiration: Self::default_expiration(),
            salt: Self::random_salt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeeSplit;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    #[test]
    fn order_type_discriminants_are_stable() {
        assert_eq!(OrderType::AssetForAsset.as_u8(), 0);
        assert_eq!(OrderType::BuyOffer.as_u8(), 1);
        assert_eq!(OrderType::SellOffer.as_u8(), 2);
    }

    #[test]
    fn expiration_is_inclusive() {
        let mut order = Order::dummy_sell_offer(addr(1), addr(2), 42, addr(3), 100);
        order.expiration = U256::from(1_000u64);
        assert!(!order.is_expired_at(999));
        assert!(!order.is_expired_at(1_000));
        assert!(order.is_expired_at(1_001));
    }

    #[test]
    fn currency_leg_per_topology() {
        let sell = Order::dummy_sell_offer(addr(1), addr(2), 42, addr(3), 100);
        assert_eq!(sell.currency_leg().map(|l| l.token), Some(addr(3)));

        let buy = Order::dummy_buy_offer(addr(1), addr(2), 42, addr(3), 100);
        assert_eq!(buy.currency_leg().map(|l| l.token), Some(addr(3)));

        let swap = Order::dummy_asset_for_asset(
            addr(1),
            Leg::new(addr(2), U256::from(1)),
            Leg::new(addr(4), U256::from(2)),
        );
        assert!(swap.currency_leg().is_none());
    }

    #[test]
    fn dummy_salts_differ() {
        let a = Order::dummy_sell_offer(addr(1), addr(2), 42, addr(3), 100);
        let b = Order::dummy_sell_offer(addr(1), addr(2), 42, addr(3), 100);
        assert_ne!(a.salt, b.salt);
    }

    #[test]
    fn serde_roundtrip() {
        let mut order = Order::dummy_sell_offer(addr(1), addr(2), 42, addr(3), 100);
        order.fees = FeeSchedule::new(vec![FeeSplit::new(addr(9), U256::from(10))]);
        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("orderType"));
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }
}
