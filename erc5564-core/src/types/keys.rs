//! Key types for ERC-5564.
//!
//! This module defines the key structures used in the protocol:
//!
//! - [`PublicKey`]: A validated secp256k1 point (never the identity)
//! - [`SecretKey`]: A scalar in `[1, n-1]`, zeroized on drop
//! - [`KeyPair`]: Combined secret + public key
//! - [`RecipientKeys`]: Spending and viewing key pairs of one recipient

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{AffinePoint, FieldBytes, NonZeroScalar, ProjectivePoint};
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

use crate::constants::{COMPRESSED_PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE};
use crate::error::{Result, StealthError};

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// A secp256k1 public key.
///
/// Construction always validates that the point lies on the curve and is not
/// the point at infinity.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    inner: k256::PublicKey,
}

impl PublicKey {
    /// Parses a SEC1-encoded point (compressed or uncompressed).
    ///
    /// # Errors
    /// Returns `InvalidPoint` if the bytes are not a valid curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        k256::PublicKey::from_sec1_bytes(bytes)
            .map(|inner| Self { inner })
            .map_err(|_| StealthError::InvalidPoint(format!("{} bytes are not a valid secp256k1 point", bytes.len())))
    }

    /// Parses a 33-byte SEC1 compressed point.
    ///
    /// # Errors
    /// Returns `InvalidKeySize` for any other length and `InvalidPoint` if
    /// the parity byte is wrong or no y coordinate exists for x.
    pub fn from_compressed(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != COMPRESSED_PUBLIC_KEY_SIZE {
            return Err(StealthError::InvalidKeySize {
                expected: COMPRESSED_PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(StealthError::InvalidPoint(format!(
                "compressed point must start with 0x02 or 0x03, got {:#04x}",
                bytes[0]
            )));
        }
        Self::from_bytes(bytes)
    }

    /// Creates a public key from an affine point.
    ///
    /// # Errors
    /// Returns `InvalidPoint` for the identity.
    pub fn from_affine(point: AffinePoint) -> Result<Self> {
        k256::PublicKey::from_affine(point)
            .map(|inner| Self { inner })
            .map_err(|_| StealthError::InvalidPoint("point at infinity".into()))
    }

    /// Creates a public key from a projective point.
    pub fn from_projective(point: ProjectivePoint) -> Result<Self> {
        Self::from_affine(point.to_affine())
    }

    /// Returns the affine point.
    pub fn as_affine(&self) -> &AffinePoint {
        self.inner.as_affine()
    }

    /// Returns the point in projective form for arithmetic.
    pub fn to_projective(&self) -> ProjectivePoint {
        self.inner.to_projective()
    }

    /// Returns the 33-byte SEC1 compressed encoding.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        let encoded = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_PUBLIC_KEY_SIZE];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// Returns the 65-byte SEC1 uncompressed encoding (0x04 || x || y).
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
        let encoded = self.inner.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// Returns the lowercase hex of the compressed encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Parses a public key from hex (with or without `0x`).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl From<k256::PublicKey> for PublicKey {
    fn from(inner: k256::PublicKey) -> Self {
        Self { inner }
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECRET KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// A secp256k1 secret scalar.
///
/// This key is sensitive and is zeroized when dropped.
/// Never expose it in logs or error messages.
#[derive(Clone)]
pub struct SecretKey {
    inner: k256::SecretKey,
}

impl SecretKey {
    /// Creates a secret key from 32 big-endian bytes.
    ///
    /// # Errors
    /// Returns `InvalidKeySize` if the length is not 32 and `InvalidScalar`
    /// if the value is zero or not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SECRET_KEY_SIZE {
            return Err(StealthError::InvalidKeySize {
                expected: SECRET_KEY_SIZE,
                actual: bytes.len(),
            });
        }

        k256::SecretKey::from_bytes(FieldBytes::from_slice(bytes))
            .map(|inner| Self { inner })
            .map_err(|_| StealthError::InvalidScalar("scalar must be in [1, n-1]".into()))
    }

    /// Creates a secret key from a non-zero scalar.
    pub fn from_scalar(scalar: NonZeroScalar) -> Self {
        Self {
            inner: k256::SecretKey::from(scalar),
        }
    }

    /// Returns the scalar for arithmetic.
    pub fn to_scalar(&self) -> NonZeroScalar {
        self.inner.to_nonzero_scalar()
    }

    /// Computes the matching public key (`s·G`).
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from(self.inner.public_key())
    }

    /// Returns the 32 big-endian bytes.
    ///
    /// # Security
    /// Handle the returned bytes carefully - do not log or expose them.
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_SIZE] {
        self.inner.to_bytes().into()
    }

    /// Returns the lowercase hex of the scalar. Explicit export only.
    pub fn to_hex(&self) -> String {
        hex::encode(self.inner.to_bytes())
    }

    /// Parses a secret key from hex (with or without `0x`).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = zeroize::Zeroizing::new(hex::decode(s)?);
        Self::from_bytes(&bytes)
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for SecretKey {}

// k256::SecretKey zeroizes itself on drop.
impl ZeroizeOnDrop for SecretKey {}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey([REDACTED])")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY PAIR
// ═══════════════════════════════════════════════════════════════════════════════

/// A secp256k1 key pair where `public == secret·G`.
#[derive(Clone)]
pub struct KeyPair {
    /// Public key (safe to share)
    pub public: PublicKey,
    /// Secret key (keep private, auto-zeroized)
    pub secret: SecretKey,
}

impl KeyPair {
    /// Builds a key pair from a secret key.
    pub fn from_secret(secret: SecretKey) -> Self {
        Self {
            public: secret.public_key(),
            secret,
        }
    }

    /// Parses a key pair from a hex-encoded secret key.
    pub fn from_secret_hex(s: &str) -> Result<Self> {
        SecretKey::from_hex(s).map(Self::from_secret)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Spending key pair - controls funds at every derived stealth address.
///
/// The spending public key is the first half of the meta-address.
pub type SpendingKeyPair = KeyPair;

/// Viewing key pair - used to scan announcements.
///
/// The viewing secret key can be shared with auditors: it detects payments
/// but cannot spend them.
pub type ViewingKeyPair = KeyPair;

/// Complete recipient key set (spending + viewing).
#[derive(Clone)]
pub struct RecipientKeys {
    /// Keys for spending from stealth addresses
    pub spending: SpendingKeyPair,
    /// Keys for viewing/scanning announcements
    pub viewing: ViewingKeyPair,
}

impl RecipientKeys {
    /// Creates a new recipient key set.
    pub fn new(spending: SpendingKeyPair, viewing: ViewingKeyPair) -> Self {
        Self { spending, viewing }
    }
}

impl std::fmt::Debug for RecipientKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipientKeys")
            .field("spending", &self.spending)
            .field("viewing", &self.viewing)
            .finish()
    }
}
