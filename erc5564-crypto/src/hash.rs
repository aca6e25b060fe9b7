//! Hash functions used by the protocol.
//!
//! Two hashes appear in ERC-5564 on secp256k1:
//!
//! - **SHA-256** over the shared secret point, producing the digest that
//!   yields both the view tag and the stealth scalar
//! - **Keccak256** over an uncompressed public key, producing the Ethereum
//!   address
//!
//! ## Point Encoding
//!
//! The shared point is hashed as `x || y`, where each coordinate is its
//! minimal big-endian encoding (leading zero bytes stripped):
//!
//! ```text
//! digest = SHA-256(minimal_be(x) || minimal_be(y))
//! ```
//!
//! This matches deployed ERC-5564 implementations that serialize coordinates
//! as arbitrary-precision integers. Roughly one point in 256 has a coordinate
//! with a leading zero byte, so the distinction is observable.

use sha2::{Digest, Sha256};
use sha3::Keccak256;

use erc5564_core::constants::{KECCAK256_SIZE, SHARED_SECRET_DIGEST_SIZE};

// ═══════════════════════════════════════════════════════════════════════════════
// SHARED SECRET HASH
// ═══════════════════════════════════════════════════════════════════════════════

/// Hashes the affine coordinates of a shared secret point.
///
/// Both coordinates are taken as big-endian bytes of any width; leading zero
/// bytes are stripped before hashing.
///
/// # Example
///
/// ```rust,ignore
/// use erc5564_crypto::hash_shared_point;
///
/// let digest = hash_shared_point(&x_bytes, &y_bytes);
/// let view_tag = digest[0];
/// ```
pub fn hash_shared_point(x: &[u8], y: &[u8]) -> [u8; SHARED_SECRET_DIGEST_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(strip_leading_zeros(x));
    hasher.update(strip_leading_zeros(y));
    hasher.finalize().into()
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

// ═══════════════════════════════════════════════════════════════════════════════
// KECCAK256 (for Ethereum addresses)
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes Keccak256 hash (used for Ethereum addresses).
///
/// Note: Keccak256 is NOT SHA3-256. They use different padding.
pub fn keccak256(input: &[u8]) -> [u8; KECCAK256_SIZE] {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    hasher.finalize().into()
}
