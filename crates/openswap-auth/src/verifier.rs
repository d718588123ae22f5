//! Signature verifier: decides whether a signature blob authorizes a digest
//! for a given signer.
//!
//! Blob layout: `payload ‖ scheme`, where the trailing byte is a
//! [`SignatureKind`]. ECDSA payloads are exactly `r ‖ s ‖ v` (65 bytes).
//!
//! Every failure is a rejection. Nothing here returns an error the caller
//! must propagate: a reverting contract wallet, a malformed blob, and a
//! wrong signer all produce the same `false` from [`SignatureVerifier::is_valid`],
//! with the cause available from [`SignatureVerifier::verify`] for logging.

use alloy_primitives::{Address, B256, Signature, U256, keccak256};
use openswap_types::{MalformedSignature, SignatureKind, constants};
use thiserror::Error;

use crate::wallet::{ContractWallet, NoContractWallets};

/// Personal-message prefix for a 32-byte message.
const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Why a signature was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureRejection {
    #[error("signature is empty")]
    Empty,
    #[error("signer is the zero address")]
    ZeroSigner,
    #[error("unknown signature scheme {0}")]
    UnknownScheme(u8),
    #[error("illegal signature scheme")]
    IllegalScheme,
    #[error("ECDSA payload must be {expected} bytes, got {actual}")]
    BadLength { expected: usize, actual: usize },
    #[error("recovery byte must be 27 or 28, got {0}")]
    BadRecoveryByte(u8),
    #[error("s value in upper half order")]
    HighS,
    #[error("public key not recoverable")]
    Unrecoverable,
    #[error("recovered {recovered}, expected {expected}")]
    SignerMismatch { recovered: Address, expected: Address },
    #[error("{0}")]
    WalletCall(String),
    #[error("contract wallet answered 0x{}", hex::encode(.0))]
    WalletRefused([u8; 4]),
}

impl From<MalformedSignature> for SignatureRejection {
    fn from(err: MalformedSignature) -> Self {
        match err {
            MalformedSignature::Empty => Self::Empty,
            MalformedSignature::UnknownScheme(b) => Self::UnknownScheme(b),
        }
    }
}

/// Multi-scheme signature verifier.
#[derive(Debug, Clone, Default)]
pub struct SignatureVerifier<W = NoContractWallets> {
    wallets: W,
}

impl<W: ContractWallet> SignatureVerifier<W> {
    /// Verifier that consults `wallets` for contract-wallet signatures.
    #[must_use]
    pub fn new(wallets: W) -> Self {
        Self { wallets }
    }

    /// `true` iff `signature` authorizes `digest` for `signer`.
    pub fn is_valid(&self, signer: Address, digest: &B256, signature: &[u8]) -> bool {
        match self.verify(signer, digest, signature) {
            Ok(()) => true,
            Err(reason) => {
                tracing::warn!(
                    signer = %signer,
                    digest = %digest,
                    reason = %reason,
                    "Signature rejected"
                );
                false
            }
        }
    }

    /// Like [`is_valid`](Self::is_valid), naming the cause of a rejection.
    pub fn verify(
        &self,
        signer: Address,
        digest: &B256,
        signature: &[u8],
    ) -> Result<(), SignatureRejection> {
        if signer.is_zero() {
            return Err(SignatureRejection::ZeroSigner);
        }
        let (payload, kind) = SignatureKind::split(signature)?;

        match kind {
            SignatureKind::Illegal => Err(SignatureRejection::IllegalScheme),
            SignatureKind::RawDigest => expect_signer(signer, recover(digest, payload)?),
            SignatureKind::PrefixedMessage => {
                expect_signer(signer, recover(&personal_message_hash(digest), payload)?)
            }
            SignatureKind::ContractWallet => {
                let answer = self
                    .wallets
                    .is_valid_signature(signer, *digest, payload)
                    .map_err(|e| SignatureRejection::WalletCall(e.to_string()))?;
                if answer == constants::EIP1271_MAGIC_VALUE {
                    Ok(())
                } else {
                    Err(SignatureRejection::WalletRefused(answer))
                }
            }
        }
    }

    /// The contract-wallet capability this verifier consults.
    #[must_use]
    pub fn wallets(&self) -> &W {
        &self.wallets
    }
}

/// `keccak256("\x19Ethereum Signed Message:\n32" ‖ digest)`.
#[must_use]
pub fn personal_message_hash(digest: &B256) -> B256 {
    let mut preimage = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + 32);
    preimage.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
    preimage.extend_from_slice(digest.as_slice());
    keccak256(&preimage)
}

fn expect_signer(expected: Address, recovered: Address) -> Result<(), SignatureRejection> {
    if recovered == expected {
        Ok(())
    } else {
        Err(SignatureRejection::SignerMismatch {
            recovered,
            expected,
        })
    }
}

/// Recover the signing address of an `r ‖ s ‖ v` payload over `prehash`.
fn recover(prehash: &B256, payload: &[u8]) -> Result<Address, SignatureRejection> {
    if payload.len() != constants::ECDSA_PAYLOAD_LEN {
        return Err(SignatureRejection::BadLength {
            expected: constants::ECDSA_PAYLOAD_LEN,
            actual: payload.len(),
        });
    }
    let r = U256::from_be_slice(&payload[..32]);
    let s = U256::from_be_slice(&payload[32..64]);
    let y_parity = match payload[64] {
        27 => false,
        28 => true,
        other => return Err(SignatureRejection::BadRecoveryByte(other)),
    };
    if s > U256::from_be_bytes(constants::SECP256K1_HALF_ORDER) {
        return Err(SignatureRejection::HighS);
    }
    Signature::new(r, s, y_parity)
        .recover_address_from_prehash(prehash)
        .map_err(|_| SignatureRejection::Unrecoverable)
}
