//! Announcement metadata payloads.
//!
//! ERC-5564 announcements carry a metadata blob whose first byte is the view
//! tag. The remaining bytes describe what was sent:
//!
//! ```text
//! native: view_tag (1) || 0x0e × 24                        || amount (32, BE)
//! token:  view_tag (1) || selector (4) || token address (20) || amount (32, BE)
//! ```
//!
//! Both shapes are exactly 57 bytes. No cryptography happens here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EthAddress;
use crate::constants::{
    AMOUNT_SIZE, ANNOUNCEMENT_METADATA_SIZE, ETH_ADDRESS_SIZE, FUNCTION_SELECTOR_SIZE,
    METADATA_AMOUNT_OFFSET, METADATA_SELECTOR_OFFSET, METADATA_TOKEN_OFFSET,
    NATIVE_TRANSFER_MARKER, NATIVE_TRANSFER_MARKER_LEN,
};
use crate::error::{Result, StealthError};

// ═══════════════════════════════════════════════════════════════════════════════
// AMOUNT
// ═══════════════════════════════════════════════════════════════════════════════

/// A uint256 amount stored as 32 big-endian bytes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount {
    bytes: [u8; AMOUNT_SIZE],
}

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self {
        bytes: [0u8; AMOUNT_SIZE],
    };

    /// Creates an amount from its 32-byte big-endian form.
    pub fn from_be_bytes(bytes: [u8; AMOUNT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates an amount from a big-endian slice of at most 32 bytes,
    /// left-padding with zeros.
    ///
    /// # Errors
    /// Returns `InvalidAmount` if the slice is longer than 32 bytes.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > AMOUNT_SIZE {
            return Err(StealthError::InvalidAmount(format!(
                "{} bytes does not fit in uint256",
                bytes.len()
            )));
        }

        let mut out = [0u8; AMOUNT_SIZE];
        out[AMOUNT_SIZE - bytes.len()..].copy_from_slice(bytes);
        Ok(Self { bytes: out })
    }

    /// Returns the 32-byte big-endian form.
    pub fn to_be_bytes(&self) -> [u8; AMOUNT_SIZE] {
        self.bytes
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    /// Parses a decimal string.
    ///
    /// # Errors
    /// Returns `InvalidAmount` for empty input, non-digits, or overflow.
    pub fn from_dec_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(StealthError::InvalidAmount("empty string".into()));
        }

        let mut bytes = [0u8; AMOUNT_SIZE];
        for c in s.chars() {
            let digit = c
                .to_digit(10)
                .ok_or_else(|| StealthError::InvalidAmount(format!("'{}' is not a digit", c)))?;

            // bytes = bytes * 10 + digit
            let mut carry = digit;
            for byte in bytes.iter_mut().rev() {
                let v = u32::from(*byte) * 10 + carry;
                *byte = (v & 0xff) as u8;
                carry = v >> 8;
            }
            if carry != 0 {
                return Err(StealthError::InvalidAmount(format!(
                    "{} overflows uint256",
                    s
                )));
            }
        }

        Ok(Self { bytes })
    }

    /// Formats the amount as a decimal string.
    pub fn to_dec_string(&self) -> String {
        if self.is_zero() {
            return "0".into();
        }

        let mut value = self.bytes;
        let mut digits = Vec::new();
        while value.iter().any(|&b| b != 0) {
            // value, remainder = value / 10, value % 10
            let mut rem = 0u32;
            for byte in value.iter_mut() {
                let cur = (rem << 8) | u32::from(*byte);
                *byte = (cur / 10) as u8;
                rem = cur % 10;
            }
            digits.push(char::from(b'0' + rem as u8));
        }
        digits.iter().rev().collect()
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self::from(u128::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; AMOUNT_SIZE];
        bytes[AMOUNT_SIZE - 16..].copy_from_slice(&value.to_be_bytes());
        Self { bytes }
    }
}

impl FromStr for Amount {
    type Err = StealthError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_dec_str(s)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_dec_string())
    }
}

impl std::fmt::Debug for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Amount({})", self.to_dec_string())
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_dec_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_dec_str(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// METADATA
// ═══════════════════════════════════════════════════════════════════════════════

/// What an announcement's metadata says was transferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetadataKind {
    /// Native ether transfer.
    NativeTransfer {
        /// Amount in wei.
        amount: Amount,
    },
    /// Token transfer through a contract call.
    TokenTransfer {
        /// ABI selector of the transfer function.
        selector: [u8; FUNCTION_SELECTOR_SIZE],
        /// Token contract address.
        token: EthAddress,
        /// Amount in token base units.
        amount: Amount,
    },
}

/// A 57-byte announcement metadata payload.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AnnouncementMetadata {
    bytes: [u8; ANNOUNCEMENT_METADATA_SIZE],
}

/// Builds metadata for a native ether transfer.
///
/// Layout: `view_tag || 0x0e × 24 || amount (32, BE)`.
pub fn build_native_transfer_metadata(view_tag: u8, amount: Amount) -> AnnouncementMetadata {
    let mut bytes = [0u8; ANNOUNCEMENT_METADATA_SIZE];
    bytes[0] = view_tag;
    bytes[METADATA_SELECTOR_OFFSET..METADATA_AMOUNT_OFFSET].fill(NATIVE_TRANSFER_MARKER);
    bytes[METADATA_AMOUNT_OFFSET..].copy_from_slice(&amount.to_be_bytes());
    AnnouncementMetadata { bytes }
}

/// Builds metadata for a token transfer.
///
/// Layout: `view_tag || selector (4) || token (20) || amount (32, BE)`.
///
/// # Errors
/// Returns `InvalidMetadataField` if `selector` is not 4 bytes or `token`
/// is not 20 bytes.
pub fn build_token_transfer_metadata(
    view_tag: u8,
    selector: &[u8],
    token: &[u8],
    amount: Amount,
) -> Result<AnnouncementMetadata> {
    if selector.len() != FUNCTION_SELECTOR_SIZE {
        return Err(StealthError::InvalidMetadataField {
            field: "function_selector",
            expected: FUNCTION_SELECTOR_SIZE,
            actual: selector.len(),
        });
    }
    if token.len() != ETH_ADDRESS_SIZE {
        return Err(StealthError::InvalidMetadataField {
            field: "token_address",
            expected: ETH_ADDRESS_SIZE,
            actual: token.len(),
        });
    }

    let mut bytes = [0u8; ANNOUNCEMENT_METADATA_SIZE];
    bytes[0] = view_tag;
    bytes[METADATA_SELECTOR_OFFSET..METADATA_TOKEN_OFFSET].copy_from_slice(selector);
    bytes[METADATA_TOKEN_OFFSET..METADATA_AMOUNT_OFFSET].copy_from_slice(token);
    bytes[METADATA_AMOUNT_OFFSET..].copy_from_slice(&amount.to_be_bytes());
    Ok(AnnouncementMetadata { bytes })
}

impl AnnouncementMetadata {
    /// Parses a 57-byte payload.
    ///
    /// # Errors
    /// Returns `InvalidMetadataField` if the length is not 57.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ANNOUNCEMENT_METADATA_SIZE {
            return Err(StealthError::InvalidMetadataField {
                field: "metadata",
                expected: ANNOUNCEMENT_METADATA_SIZE,
                actual: bytes.len(),
            });
        }

        let mut arr = [0u8; ANNOUNCEMENT_METADATA_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Parses a hex payload (with or without `0x`).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::parse(&bytes)
    }

    /// Returns the raw payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the payload as a vector, ready for an announcement call.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Returns the lowercase hex of the payload.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Returns the view tag (first byte).
    pub fn view_tag(&self) -> u8 {
        self.bytes[0]
    }

    /// Returns the transferred amount (last 32 bytes).
    pub fn amount(&self) -> Amount {
        let mut amount = [0u8; AMOUNT_SIZE];
        amount.copy_from_slice(&self.bytes[METADATA_AMOUNT_OFFSET..]);
        Amount::from_be_bytes(amount)
    }

    /// Decodes the transfer description.
    ///
    /// A marker region of 24 × `0x0e` means a native transfer.
    pub fn kind(&self) -> MetadataKind {
        let marker = &self.bytes[METADATA_SELECTOR_OFFSET..METADATA_AMOUNT_OFFSET];
        debug_assert_eq!(marker.len(), NATIVE_TRANSFER_MARKER_LEN);

        if marker.iter().all(|&b| b == NATIVE_TRANSFER_MARKER) {
            return MetadataKind::NativeTransfer {
                amount: self.amount(),
            };
        }

        let mut selector = [0u8; FUNCTION_SELECTOR_SIZE];
        selector.copy_from_slice(&self.bytes[METADATA_SELECTOR_OFFSET..METADATA_TOKEN_OFFSET]);
        let mut token = [0u8; ETH_ADDRESS_SIZE];
        token.copy_from_slice(&self.bytes[METADATA_TOKEN_OFFSET..METADATA_AMOUNT_OFFSET]);

        MetadataKind::TokenTransfer {
            selector,
            token: EthAddress::from_array(token),
            amount: self.amount(),
        }
    }
}

impl std::fmt::Debug for AnnouncementMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AnnouncementMetadata(0x{})", self.to_hex())
    }
}

impl Serialize for AnnouncementMetadata {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("0x{}", self.to_hex()))
    }
}

impl<'de> Deserialize<'de> for AnnouncementMetadata {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
