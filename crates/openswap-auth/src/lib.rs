//! # openswap-auth
//!
//! **Authenticity Envelope**: everything the engine needs to decide whether a
//! signed order is genuine, before any state is touched.
//!
//! ## Architecture
//!
//! 1. **OrderEncoder**: domain-separated, deterministic digest of an order
//! 2. **SignatureVerifier**: checks a signature blob against a signer and a
//!    digest, dispatching on the trailing scheme byte
//! 3. **ContractWallet**: the read-only capability contract accounts use to
//!    certify signatures on their own behalf
//!
//! ## Flow
//!
//! ```text
//! Order → OrderEncoder.hash() → OrderHash
//!       → SignatureVerifier.is_valid(seller, hash, signature) → bool
//! ```
//!
//! Both components are pure with respect to engine state: they never read or
//! write order status.

pub mod encoder;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
pub mod verifier;
pub mod wallet;

pub use encoder::OrderEncoder;
pub use verifier::{SignatureRejection, SignatureVerifier};
pub use wallet::{ContractWallet, NoContractWallets, WalletCallError};
