//! Identifiers used throughout OpenSwap.
//!
//! Orders have no assigned ID: an order's identity is its canonical
//! [`OrderHash`]. Status entries are keyed by `(maker, hash)` so a maker can
//! only ever touch the entries under their own address.

use std::fmt;

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// OrderHash
// ---------------------------------------------------------------------------

/// Domain-separated 256-bit digest of an [`Order`](crate::Order).
///
/// Binds every order field plus the engine's address and chain identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderHash(pub B256);

impl OrderHash {
    #[must_use]
    pub fn as_b256(&self) -> &B256 {
        &self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0.0
    }

    /// First four bytes as hex, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl From<B256> for OrderHash {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl fmt::Display for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// StatusKey
// ---------------------------------------------------------------------------

/// Key of one status ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct StatusKey {
    pub maker: Address,
    pub hash: OrderHash,
}

impl StatusKey {
    #[must_use]
    pub fn new(maker: Address, hash: OrderHash) -> Self {
        Self { maker, hash }
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.maker, self.hash.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_hash_display_is_prefixed_hex() {
        let hash = OrderHash(B256::repeat_byte(0xab));
        let shown = hash.to_string();
        assert!(shown.starts_with("0xabab"));
        assert_eq!(shown.len(), 66);
        assert_eq!(hash.short(), "abababab");
    }

    #[test]
    fn status_keys_distinguish_makers() {
        let hash = OrderHash(B256::repeat_byte(1));
        let a = StatusKey::new(Address::repeat_byte(1), hash);
        let b = StatusKey::new(Address::repeat_byte(2), hash);
        assert_ne!(a, b);
    }

    #[test]
    fn serde_roundtrips() {
        let key = StatusKey::new(Address::repeat_byte(7), OrderHash(B256::repeat_byte(9)));
        let json = serde_json::to_string(&key).unwrap();
        let back: StatusKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }
}
