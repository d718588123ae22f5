//! Contract-wallet verification capability.
//!
//! A contract account cannot produce an ECDSA signature; instead it exposes a
//! read-only `isValidSignature(digest, signature) -> bytes4` entry point and
//! certifies signatures itself. The engine consumes that entry point through
//! [`ContractWallet`].

use alloy_primitives::{Address, B256};
use thiserror::Error;

/// The contract call failed (reverted, ran out of resources, no code at the
/// address, malformed return data).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("contract wallet call failed: {0}")]
pub struct WalletCallError(pub String);

/// Read-only access to contract wallets.
pub trait ContractWallet: Send + Sync {
    /// Ask the contract at `wallet` whether `signature` certifies `digest`.
    ///
    /// Returns the raw 4-byte answer. Only the EIP-1271 magic value means
    /// acceptance; the verifier decides, not the implementation.
    fn is_valid_signature(
        &self,
        wallet: Address,
        digest: B256,
        signature: &[u8],
    ) -> Result<[u8; 4], WalletCallError>;
}

impl<T: ContractWallet + ?Sized> ContractWallet for &T {
    fn is_valid_signature(
        &self,
        wallet: Address,
        digest: B256,
        signature: &[u8],
    ) -> Result<[u8; 4], WalletCallError> {
        (**self).is_valid_signature(wallet, digest, signature)
    }
}

impl<T: ContractWallet + ?Sized> ContractWallet for std::sync::Arc<T> {
    fn is_valid_signature(
        &self,
        wallet: Address,
        digest: B256,
        signature: &[u8],
    ) -> Result<[u8; 4], WalletCallError> {
        (**self).is_valid_signature(wallet, digest, signature)
    }
}

/// Deployment without contract-wallet support: every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContractWallets;

impl ContractWallet for NoContractWallets {
    fn is_valid_signature(
        &self,
        wallet: Address,
        _digest: B256,
        _signature: &[u8],
    ) -> Result<[u8; 4], WalletCallError> {
        Err(WalletCallError(format!("no contract wallet at {wallet}")))
    }
}
