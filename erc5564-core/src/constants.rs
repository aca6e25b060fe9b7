//! Protocol constants for ERC-5564 on secp256k1.
//!
//! Sizes follow SEC1 point encoding and the Ethereum address scheme.
//! Offsets describe the 57-byte announcement metadata layout.

// ═══════════════════════════════════════════════════════════════════════════════
// SECP256K1 SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a secp256k1 secret scalar in bytes.
pub const SECRET_KEY_SIZE: usize = 32;

/// Size of a SEC1 compressed public key (parity byte + x coordinate).
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

/// Size of a SEC1 uncompressed public key (0x04 + x + y).
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;

/// Length of a compressed public key in lowercase hex.
pub const COMPRESSED_PUBLIC_KEY_HEX_LEN: usize = COMPRESSED_PUBLIC_KEY_SIZE * 2;

/// Size of the SHA-256 digest of the shared secret point.
pub const SHARED_SECRET_DIGEST_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Prefix of every stealth meta-address on Ethereum.
pub const STEALTH_META_ADDRESS_PREFIX: &str = "st:eth:0x";

/// Total length of an encoded meta-address.
/// 9 + 66 + 66 = 141 characters
pub const META_ADDRESS_LEN: usize =
    STEALTH_META_ADDRESS_PREFIX.len() + 2 * COMPRESSED_PUBLIC_KEY_HEX_LEN;

/// ERC-5564 scheme identifier for secp256k1 with view tags.
pub const SCHEME_ID_SECP256K1: u64 = 1;

// ═══════════════════════════════════════════════════════════════════════════════
// VIEW TAG CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of view tag in bytes.
/// Using 1 byte gives 99.6% filtering efficiency (1/256 false positive rate).
pub const VIEW_TAG_SIZE: usize = 1;

/// Number of possible view tag values (2^8 = 256).
pub const VIEW_TAG_SPACE: usize = 256;

/// Expected filtering efficiency as a percentage.
pub const VIEW_TAG_EFFICIENCY: f64 = 99.609375; // (255/256) * 100

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of Ethereum address in bytes (20 bytes = 160 bits).
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Size of keccak256 hash output.
pub const KECCAK256_SIZE: usize = 32;

/// Size of an ABI function selector.
pub const FUNCTION_SELECTOR_SIZE: usize = 4;

/// Selector of ERC-20 `transfer(address,uint256)`.
pub const ERC20_TRANSFER_SELECTOR: [u8; FUNCTION_SELECTOR_SIZE] = [0xa9, 0x05, 0x9c, 0xbb];

/// Size of a uint256 amount in bytes.
pub const AMOUNT_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// ANNOUNCEMENT METADATA LAYOUT
// ═══════════════════════════════════════════════════════════════════════════════
//
// native: view_tag (1) || marker (24)                  || amount (32)
// token:  view_tag (1) || selector (4) || token (20)   || amount (32)

/// Byte repeated in the native-transfer marker region.
pub const NATIVE_TRANSFER_MARKER: u8 = 0x0e;

/// Length of the marker region (selector + token address slots).
pub const NATIVE_TRANSFER_MARKER_LEN: usize = FUNCTION_SELECTOR_SIZE + ETH_ADDRESS_SIZE;

/// Offset of the function selector in token metadata.
pub const METADATA_SELECTOR_OFFSET: usize = VIEW_TAG_SIZE;

/// Offset of the token address in token metadata.
pub const METADATA_TOKEN_OFFSET: usize = METADATA_SELECTOR_OFFSET + FUNCTION_SELECTOR_SIZE;

/// Offset of the amount in both metadata shapes.
pub const METADATA_AMOUNT_OFFSET: usize = METADATA_TOKEN_OFFSET + ETH_ADDRESS_SIZE;

/// Total size of announcement metadata.
/// 1 + 24 + 32 = 57 bytes
pub const ANNOUNCEMENT_METADATA_SIZE: usize = METADATA_AMOUNT_OFFSET + AMOUNT_SIZE;
