//! Canonical order encoder. Produces the [`OrderHash`] a maker signs.
//!
//! The digest follows typed-data hashing:
//!
//! ```text
//! digest     = keccak256(0x19 0x01 ‖ domainSeparator ‖ structHash)
//! structHash = keccak256(ORDER_TYPEHASH ‖ word(seller) ‖ word(orderType)
//!                        ‖ word(ask.token) ‖ word(ask.value)
//!                        ‖ word(sell.token) ‖ word(sell.value)
//!                        ‖ keccak256(words(feeRecipients))
//!                        ‖ keccak256(words(feeAmounts))
//!                        ‖ word(expiration) ‖ word(salt))
//! ```
//!
//! Every field occupies exactly one 32-byte word. The variable-length fee
//! lists are hashed on their own and enter the struct hash as a single word
//! each, so no two distinct orders share a preimage.

use alloy_primitives::{Address, B256, U256, keccak256};
use openswap_types::{DomainConfig, Order, OrderHash, constants};

/// Number of 32-byte words in an encoded order struct.
const ORDER_STRUCT_WORDS: usize = 11;

/// Hashes orders for one deployment.
///
/// The domain separator is derived once at construction from the protocol
/// name, version, chain id, and engine address.
#[derive(Debug, Clone)]
pub struct OrderEncoder {
    domain_separator: B256,
    order_typehash: B256,
}

impl OrderEncoder {
    #[must_use]
    pub fn new(domain: &DomainConfig) -> Self {
        Self {
            domain_separator: Self::compute_domain_separator(domain),
            order_typehash: keccak256(constants::ORDER_TYPE.as_bytes()),
        }
    }

    #[must_use]
    pub fn domain_separator(&self) -> B256 {
        self.domain_separator
    }

    #[must_use]
    pub fn order_typehash(&self) -> B256 {
        self.order_typehash
    }

    /// The digest a maker signs for `order` on this deployment.
    #[must_use]
    pub fn hash(&self, order: &Order) -> OrderHash {
        let mut preimage = Vec::with_capacity(2 + 64);
        preimage.extend_from_slice(&constants::EIP712_PREFIX);
        preimage.extend_from_slice(self.domain_separator.as_slice());
        preimage.extend_from_slice(self.struct_hash(order).as_slice());
        OrderHash(keccak256(&preimage))
    }

    /// Hash of the order fields alone, without the domain.
    #[must_use]
    pub fn struct_hash(&self, order: &Order) -> B256 {
        keccak256(self.encode_struct(order))
    }

    /// Word-aligned encoding of the order struct.
    #[must_use]
    pub fn encode_struct(&self, order: &Order) -> Vec<u8> {
        let words = [
            self.order_typehash,
            order.seller.into_word(),
            word(U256::from(order.order_type.as_u8())),
            order.ask.token.into_word(),
            word(order.ask.value),
            order.sell.token.into_word(),
            word(order.sell.value),
            hash_addresses(order.fees.recipients()),
            hash_amounts(order.fees.amounts()),
            word(order.expiration),
            word(order.salt),
        ];
        let mut out = Vec::with_capacity(ORDER_STRUCT_WORDS * 32);
        for w in &words {
            out.extend_from_slice(w.as_slice());
        }
        out
    }

    fn compute_domain_separator(domain: &DomainConfig) -> B256 {
        let words = [
            keccak256(constants::DOMAIN_TYPE.as_bytes()),
            keccak256(domain.name.as_bytes()),
            keccak256(domain.version.as_bytes()),
            word(U256::from(domain.chain_id)),
            domain.verifying_contract.into_word(),
        ];
        let mut encoded = Vec::with_capacity(words.len() * 32);
        for w in &words {
            encoded.extend_from_slice(w.as_slice());
        }
        keccak256(&encoded)
    }
}

fn word(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

fn hash_addresses(addresses: impl Iterator<Item = Address>) -> B256 {
    let mut buf = Vec::new();
    for address in addresses {
        buf.extend_from_slice(address.into_word().as_slice());
    }
    keccak256(&buf)
}

fn hash_amounts(amounts: impl Iterator<Item = U256>) -> B256 {
    let mut buf = Vec::new();
    for amount in amounts {
        buf.extend_from_slice(&amount.to_be_bytes::<32>());
    }
    keccak256(&buf)
}
