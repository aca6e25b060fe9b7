//! The shared-secret rule.
//!
//! Sender and recipient each combine one secret scalar with the other
//! party's public point and arrive at the same curve point:
//!
//! ```text
//! sender:    S = ephemeral_sk · viewing_pk
//! recipient: S = viewing_sk   · ephemeral_pk
//! digest     = SHA-256(minimal_be(S.x) || minimal_be(S.y))
//! ```
//!
//! The digest feeds both the view tag (its first byte) and the stealth
//! scalar (the whole digest reduced mod n).

use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{FieldBytes, Scalar, U256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use erc5564_core::constants::SHARED_SECRET_DIGEST_SIZE;
use erc5564_core::error::{Result, StealthError};
use erc5564_core::types::{PublicKey, SecretKey};

use crate::hash::hash_shared_point;

/// SHA-256 digest of a shared secret point.
///
/// Knowledge of this digest plus the spending public key locates the stealth
/// address; plus the spending secret key, it yields the stealth secret key.
/// It is zeroized when dropped and never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretDigest {
    bytes: [u8; SHARED_SECRET_DIGEST_SIZE],
}

impl SharedSecretDigest {
    /// Wraps a raw 32-byte digest.
    pub fn from_bytes(bytes: [u8; SHARED_SECRET_DIGEST_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_DIGEST_SIZE] {
        &self.bytes
    }

    /// Returns the view tag: the first byte of the digest.
    pub fn view_tag(&self) -> u8 {
        self.bytes[0]
    }

    /// Interprets the digest as a big-endian integer reduced mod n.
    pub fn to_scalar(&self) -> Scalar {
        <Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(&self.bytes))
    }
}

impl std::fmt::Debug for SharedSecretDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedSecretDigest([REDACTED])")
    }
}

/// Computes the shared secret digest between a secret scalar and a public point.
///
/// Symmetric by construction: `compute_shared_secret(&a, &B)` equals
/// `compute_shared_secret(&b, &A)` whenever `A = a·G` and `B = b·G`.
///
/// # Errors
/// Returns `InvalidPoint` if the product is the point at infinity. This cannot
/// happen for a valid scalar and a valid point on a prime-order curve.
pub fn compute_shared_secret(secret: &SecretKey, public: &PublicKey) -> Result<SharedSecretDigest> {
    let scalar = secret.to_scalar();
    let shared = (public.to_projective() * *scalar).to_affine();

    let encoded = shared.to_encoded_point(false);
    let (x, y) = match (encoded.x(), encoded.y()) {
        (Some(x), Some(y)) => (x, y),
        _ => {
            return Err(StealthError::InvalidPoint(
                "shared secret is the point at infinity".into(),
            ))
        }
    };

    Ok(SharedSecretDigest::from_bytes(hash_shared_point(x, y)))
}
