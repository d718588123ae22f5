//! Signature scheme discriminants.
//!
//! A signature is an opaque byte blob whose **last** byte selects the scheme.
//! The scheme set is closed: adding a scheme means adding a variant here and
//! handling it in every exhaustive match.

use serde::{Deserialize, Serialize};

/// How a signature blob is to be checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SignatureKind {
    /// Always rejected. Guards against zero-initialized blobs.
    Illegal = 0,
    /// secp256k1 recovery over the raw digest.
    RawDigest = 1,
    /// secp256k1 recovery over the personal-message-prefixed digest.
    PrefixedMessage = 2,
    /// The signer is a contract account that certifies the signature itself.
    ContractWallet = 3,
}

/// A blob with no usable scheme byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedSignature {
    Empty,
    UnknownScheme(u8),
}

impl SignatureKind {
    /// Split a blob into its payload and scheme.
    ///
    /// # Errors
    /// [`MalformedSignature`] for an empty blob or an out-of-range
    /// discriminant.
    pub fn split(signature: &[u8]) -> Result<(&[u8], Self), MalformedSignature> {
        let (last, payload) = signature
            .split_last()
            .ok_or(MalformedSignature::Empty)?;
        let kind = Self::try_from(*last).map_err(MalformedSignature::UnknownScheme)?;
        Ok((payload, kind))
    }
}

impl TryFrom<u8> for SignatureKind {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Illegal),
            1 => Ok(Self::RawDigest),
            2 => Ok(Self::PrefixedMessage),
            3 => Ok(Self::ContractWallet),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for SignatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Illegal => write!(f, "ILLEGAL"),
            Self::RawDigest => write!(f, "RAW_DIGEST"),
            Self::PrefixedMessage => write!(f, "PREFIXED_MESSAGE"),
            Self::ContractWallet => write!(f, "CONTRACT_WALLET"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminant_range() {
        for v in 0u8..=3 {
            let kind = SignatureKind::try_from(v).unwrap();
            assert_eq!(kind as u8, v);
        }
        for v in 4u8..=255 {
            assert_eq!(SignatureKind::try_from(v), Err(v));
        }
    }

    #[test]
    fn split_empty_is_malformed() {
        assert_eq!(SignatureKind::split(&[]), Err(MalformedSignature::Empty));
    }

    #[test]
    fn split_discriminant_only() {
        let (payload, kind) = SignatureKind::split(&[3]).unwrap();
        assert!(payload.is_empty());
        assert_eq!(kind, SignatureKind::ContractWallet);
    }

    #[test]
    fn split_uses_trailing_byte() {
        let (payload, kind) = SignatureKind::split(&[9, 9, 2]).unwrap();
        assert_eq!(payload, &[9, 9]);
        assert_eq!(kind, SignatureKind::PrefixedMessage);
        assert_eq!(
            SignatureKind::split(&[1, 1, 4]),
            Err(MalformedSignature::UnknownScheme(4))
        );
    }
}
