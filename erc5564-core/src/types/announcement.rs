//! Stealth announcements.
//!
//! A sender publishes one announcement per payment. Every potential recipient
//! reads it during scanning.

use serde::{Deserialize, Serialize};

use super::{AnnouncementMetadata, EthAddress, PublicKey};
use crate::constants::SCHEME_ID_SECP256K1;
use crate::error::{Result, StealthError};

/// An ERC-5564 announcement.
///
/// Mirrors the fields of the on-chain `Announcement` event that matter to a
/// scanner: where the funds went, the ephemeral public key, and the view tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Scheme identifier (1 = secp256k1 with view tags)
    pub scheme_id: u64,
    /// The one-time address that received funds
    pub stealth_address: EthAddress,
    /// Sender's ephemeral public key
    pub ephemeral_pk: PublicKey,
    /// View tag for efficient filtering (first byte of the shared secret hash)
    pub view_tag: u8,
    /// Optional transfer metadata; its first byte equals `view_tag`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AnnouncementMetadata>,
}

impl Announcement {
    /// Creates an announcement without metadata.
    pub fn new(stealth_address: EthAddress, ephemeral_pk: PublicKey, view_tag: u8) -> Self {
        Self {
            scheme_id: SCHEME_ID_SECP256K1,
            stealth_address,
            ephemeral_pk,
            view_tag,
            metadata: None,
        }
    }

    /// Attaches transfer metadata.
    ///
    /// # Errors
    /// Returns `InvalidAnnouncement` if the metadata carries a different view tag.
    pub fn with_metadata(mut self, metadata: AnnouncementMetadata) -> Result<Self> {
        self.metadata = Some(metadata);
        self.validate()?;
        Ok(self)
    }

    /// Validates the announcement structure.
    pub fn validate(&self) -> Result<()> {
        if self.scheme_id != SCHEME_ID_SECP256K1 {
            return Err(StealthError::InvalidAnnouncement(format!(
                "unsupported scheme id {}",
                self.scheme_id
            )));
        }

        if self.stealth_address.is_zero() {
            return Err(StealthError::InvalidAnnouncement(
                "stealth address is the zero address".into(),
            ));
        }

        if let Some(metadata) = &self.metadata {
            if metadata.view_tag() != self.view_tag {
                return Err(StealthError::InvalidAnnouncement(format!(
                    "metadata view tag {} does not match announcement view tag {}",
                    metadata.view_tag(),
                    self.view_tag
                )));
            }
        }

        Ok(())
    }

    /// Returns the raw metadata bytes, empty when none was attached.
    pub fn metadata_bytes(&self) -> Vec<u8> {
        self.metadata.map(|m| m.to_vec()).unwrap_or_default()
    }
}
