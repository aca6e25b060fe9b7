//! Address types for ERC-5564.
//!
//! - [`MetaAddress`]: The public identifier a recipient publishes once
//! - [`EthAddress`]: A 20-byte Ethereum address (stealth addresses included)

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::PublicKey;
use crate::constants::{
    COMPRESSED_PUBLIC_KEY_HEX_LEN, ETH_ADDRESS_SIZE, META_ADDRESS_LEN, STEALTH_META_ADDRESS_PREFIX,
};
use crate::error::{Result, StealthError};

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A stealth meta-address: the spending and viewing public keys of a recipient.
///
/// Senders use this to create stealth addresses.
///
/// # Text Format
/// ```text
/// st:eth:0x || hex(compressed spending_pk) (66) || hex(compressed viewing_pk) (66)
/// ```
///
/// Always exactly 141 characters, lowercase hex, no separators.
///
/// # Example
/// ```ignore
/// use erc5564_core::MetaAddress;
///
/// let meta = MetaAddress::new(spending_pk, viewing_pk);
/// let encoded = meta.encode();
/// assert_eq!(MetaAddress::decode(&encoded)?, meta);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetaAddress {
    /// Spending public key - stealth public keys are offsets of this point
    pub spending_pk: PublicKey,
    /// Viewing public key - senders derive the shared secret against it
    pub viewing_pk: PublicKey,
}

impl MetaAddress {
    /// Creates a meta-address from the two public keys.
    pub fn new(spending_pk: PublicKey, viewing_pk: PublicKey) -> Self {
        Self {
            spending_pk,
            viewing_pk,
        }
    }

    /// Encodes to the `st:eth:0x` text form.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(META_ADDRESS_LEN);
        out.push_str(STEALTH_META_ADDRESS_PREFIX);
        out.push_str(&self.spending_pk.to_hex());
        out.push_str(&self.viewing_pk.to_hex());
        out
    }

    /// Decodes the `st:eth:0x` text form.
    ///
    /// # Errors
    /// - `InvalidMetaAddress` if the length or prefix is wrong, or a segment
    ///   is not hex
    /// - `InvalidPoint` if a segment is not a valid compressed curve point
    pub fn decode(s: &str) -> Result<Self> {
        if s.len() != META_ADDRESS_LEN {
            return Err(StealthError::InvalidMetaAddress(format!(
                "expected {} characters, got {}",
                META_ADDRESS_LEN,
                s.len()
            )));
        }

        let keys = s.strip_prefix(STEALTH_META_ADDRESS_PREFIX).ok_or_else(|| {
            StealthError::InvalidMetaAddress(format!(
                "missing '{}' prefix",
                STEALTH_META_ADDRESS_PREFIX
            ))
        })?;

        // `get` keeps non-ASCII input from panicking on a char boundary.
        let spending_hex = keys
            .get(..COMPRESSED_PUBLIC_KEY_HEX_LEN)
            .ok_or_else(|| StealthError::InvalidMetaAddress("spending key is not hex".into()))?;
        let viewing_hex = keys
            .get(COMPRESSED_PUBLIC_KEY_HEX_LEN..)
            .ok_or_else(|| StealthError::InvalidMetaAddress("viewing key is not hex".into()))?;

        let spending_pk = decode_segment("spending", spending_hex)?;
        let viewing_pk = decode_segment("viewing", viewing_hex)?;

        Ok(Self::new(spending_pk, viewing_pk))
    }
}

fn decode_segment(role: &str, segment: &str) -> Result<PublicKey> {
    let bytes = hex::decode(segment)
        .map_err(|e| StealthError::InvalidMetaAddress(format!("{} key is not hex: {}", role, e)))?;
    PublicKey::from_compressed(&bytes).map_err(|e| match e {
        StealthError::InvalidPoint(reason) => {
            StealthError::InvalidPoint(format!("{} key: {}", role, reason))
        }
        other => other,
    })
}

impl std::fmt::Display for MetaAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for MetaAddress {
    type Err = StealthError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl Serialize for MetaAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for MetaAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A 20-byte Ethereum address.
///
/// Stealth addresses are ordinary addresses: the last 20 bytes of the
/// keccak256 of an uncompressed public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EthAddress {
    bytes: [u8; ETH_ADDRESS_SIZE],
}

impl EthAddress {
    /// Creates an address from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ETH_ADDRESS_SIZE {
            return Err(StealthError::InvalidEthAddress(format!(
                "expected {} bytes, got {}",
                ETH_ADDRESS_SIZE,
                bytes.len()
            )));
        }

        let mut arr = [0u8; ETH_ADDRESS_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates from a fixed-size array.
    pub fn from_array(bytes: [u8; ETH_ADDRESS_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the address as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; ETH_ADDRESS_SIZE] {
        &self.bytes
    }

    /// Returns the EIP-55 checksummed hex string.
    pub fn to_checksum_string(&self) -> String {
        use sha3::{Digest, Keccak256};

        let lower = hex::encode(self.bytes);
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(2 + 2 * ETH_ADDRESS_SIZE);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (hash[i / 2] >> if i % 2 == 0 { 4 } else { 0 }) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Parses from hex string (with or without 0x prefix, any case).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }

    /// Returns the zero address.
    pub fn zero() -> Self {
        Self {
            bytes: [0u8; ETH_ADDRESS_SIZE],
        }
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

impl std::fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EthAddress({})", self.to_checksum_string())
    }
}

impl std::fmt::Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_checksum_string())
    }
}

impl FromStr for EthAddress {
    type Err = StealthError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for EthAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_checksum_string())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
