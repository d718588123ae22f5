//! Test helpers: deterministic signers and a scriptable contract-wallet
//! capability. **Never use in production.**

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use alloy_primitives::{Address, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use openswap_types::{SignatureKind, constants};

use crate::wallet::{ContractWallet, WalletCallError};

/// A secp256k1 key derived from a one-byte seed.
#[derive(Debug, Clone)]
pub struct TestSigner {
    inner: PrivateKeySigner,
}

impl TestSigner {
    /// # Panics
    /// Panics if `seed` is zero (the zero scalar is not a valid key).
    pub fn new(seed: u8) -> Self {
        assert!(seed != 0, "TestSigner seed must be non-zero");
        let mut key = [0u8; 32];
        key[31] = seed;
        let inner = PrivateKeySigner::from_bytes(&B256::from(key))
            .expect("small non-zero scalars are valid keys");
        Self { inner }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.inner.address()
    }

    /// `r ‖ s ‖ v ‖ RawDigest` over the digest itself.
    #[must_use]
    pub fn sign_raw(&self, digest: &B256) -> Vec<u8> {
        let sig = self
            .inner
            .sign_hash_sync(digest)
            .expect("local signing is infallible");
        Self::encode(&sig, SignatureKind::RawDigest)
    }

    /// `r ‖ s ‖ v ‖ PrefixedMessage` over the personal-message hash.
    #[must_use]
    pub fn sign_prefixed(&self, digest: &B256) -> Vec<u8> {
        let sig = self
            .inner
            .sign_message_sync(digest.as_slice())
            .expect("local signing is infallible");
        Self::encode(&sig, SignatureKind::PrefixedMessage)
    }

    fn encode(sig: &alloy_primitives::Signature, kind: SignatureKind) -> Vec<u8> {
        let mut out = Vec::with_capacity(constants::ECDSA_SIGNATURE_LEN);
        out.extend_from_slice(&sig.r().to_be_bytes::<32>());
        out.extend_from_slice(&sig.s().to_be_bytes::<32>());
        out.push(27 + u8::from(sig.v()));
        out.push(kind as u8);
        out
    }
}

/// Contract wallets that approve an explicit set of digests.
#[derive(Debug, Default)]
pub struct MockWallets {
    approved: HashMap<Address, HashSet<B256>>,
    reverting: HashSet<Address>,
    calls: Mutex<Vec<(Address, B256, Vec<u8>)>>,
}

impl MockWallets {
    #[must_use]
    pub fn approve(mut self, wallet: Address, digest: B256) -> Self {
        self.approved.entry(wallet).or_default().insert(digest);
        self
    }

    #[must_use]
    pub fn reverting(mut self, wallet: Address) -> Self {
        self.reverting.insert(wallet);
        self
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<(Address, B256, Vec<u8>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ContractWallet for MockWallets {
    fn is_valid_signature(
        &self,
        wallet: Address,
        digest: B256,
        signature: &[u8],
    ) -> Result<[u8; 4], WalletCallError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((wallet, digest, signature.to_vec()));
        }
        if self.reverting.contains(&wallet) {
            return Err(WalletCallError(format!("{wallet} reverted")));
        }
        let ok = self
            .approved
            .get(&wallet)
            .is_some_and(|digests| digests.contains(&digest));
        Ok(if ok {
            constants::EIP1271_MAGIC_VALUE
        } else {
            [0u8; 4]
        })
    }
}
