//! Protocol-wide constants for the OpenSwap settlement engine.

/// Default EIP-712 domain name.
pub const DEFAULT_PROTOCOL_NAME: &str = "OpenSwap";

/// Default EIP-712 domain version.
pub const DEFAULT_PROTOCOL_VERSION: &str = "1";

/// EIP-712 domain type string.
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// EIP-712 order type string. Field order here is the encoding order.
pub const ORDER_TYPE: &str = "Order(address seller,uint8 orderType,address askToken,uint256 askValue,address sellToken,uint256 sellValue,address[] feeRecipients,uint256[] feeAmounts,uint256 expiration,uint256 salt)";

/// Prefix of a typed-data digest preimage.
pub const EIP712_PREFIX: [u8; 2] = [0x19, 0x01];

/// Return value of a contract wallet that accepts a signature
/// (`bytes4(keccak256("isValidSignature(bytes32,bytes)"))`).
pub const EIP1271_MAGIC_VALUE: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];

/// Length of an `r ‖ s ‖ v` ECDSA payload.
pub const ECDSA_PAYLOAD_LEN: usize = 65;

/// Length of a complete ECDSA signature blob including the scheme byte.
pub const ECDSA_SIGNATURE_LEN: usize = ECDSA_PAYLOAD_LEN + 1;

/// Upper bound (inclusive) of a non-malleable secp256k1 `s` value:
/// `n / 2`, big-endian.
pub const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];
