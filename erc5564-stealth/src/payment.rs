//! Stealth payment creation (sender side).

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use erc5564_core::constants::ERC20_TRANSFER_SELECTOR;
use erc5564_core::error::{Result, StealthError};
use erc5564_core::types::{
    build_native_transfer_metadata, build_token_transfer_metadata, Amount, Announcement,
    EthAddress, MetaAddress, PublicKey,
};
use erc5564_crypto::{
    compute_shared_secret, compute_view_tag, derive_stealth_address, generate_keypair_with_rng,
};

/// Stealth payment: where to send funds and what to announce.
///
/// The ephemeral secret key is discarded once the payment is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthPayment {
    /// The one-time Ethereum address to send funds to
    pub stealth_address: EthAddress,
    /// Ephemeral public key to publish
    pub ephemeral_pk: PublicKey,
    /// View tag to publish
    pub view_tag: u8,
}

impl StealthPayment {
    /// Builds the announcement for this payment, without metadata.
    pub fn to_announcement(&self) -> Announcement {
        Announcement::new(self.stealth_address, self.ephemeral_pk, self.view_tag)
    }
}

/// Generates a stealth address for the recipient of `meta_address`.
///
/// Draws a fresh ephemeral key from the OS random source.
///
/// # Errors
/// Returns `EntropyError` if the random source fails and `InvalidPoint` if
/// the stealth point is the identity.
///
/// # Example
///
/// ```rust,ignore
/// use erc5564_stealth::generate_stealth_address;
///
/// let payment = generate_stealth_address(&meta_address)?;
/// // Send funds to payment.stealth_address
/// // Publish payment.ephemeral_pk and payment.view_tag
/// ```
pub fn generate_stealth_address(meta_address: &MetaAddress) -> Result<StealthPayment> {
    generate_stealth_address_with_rng(meta_address, &mut OsRng)
}

/// Generates a stealth address using the supplied random source for the
/// ephemeral key.
#[instrument(skip_all)]
pub fn generate_stealth_address_with_rng<R>(
    meta_address: &MetaAddress,
    rng: &mut R,
) -> Result<StealthPayment>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let ephemeral = generate_keypair_with_rng(rng)?;

    let digest = compute_shared_secret(&ephemeral.secret, &meta_address.viewing_pk)?;
    let view_tag = compute_view_tag(&digest);
    let stealth_address = derive_stealth_address(&meta_address.spending_pk, &digest)?;

    debug!(%stealth_address, view_tag, "Generated stealth address");

    Ok(StealthPayment {
        stealth_address,
        ephemeral_pk: ephemeral.public,
        view_tag,
    })
}

/// Decodes a meta-address string and generates a stealth address for it.
///
/// # Errors
/// Fails with the meta-address decode error before any randomness is drawn.
pub fn generate_stealth_address_from_str(meta_address: &str) -> Result<StealthPayment> {
    let meta_address = MetaAddress::decode(meta_address)?;
    generate_stealth_address(&meta_address)
}

// ═══════════════════════════════════════════════════════════════════════════════
// BUILDER
// ═══════════════════════════════════════════════════════════════════════════════

/// Transfer carried in an announcement's metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Transfer {
    Native {
        amount: Amount,
    },
    Token {
        selector: Vec<u8>,
        token: Vec<u8>,
        amount: Amount,
    },
}

/// A stealth payment together with the announcement to publish.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedPayment {
    /// Where to send funds
    pub payment: StealthPayment,
    /// Announcement carrying the ephemeral key, view tag and metadata
    pub announcement: Announcement,
}

/// Builds a stealth payment and its announcement in one step.
///
/// ```rust,ignore
/// let prepared = StealthPaymentBuilder::new()
///     .recipient(meta_address)
///     .native_transfer(Amount::from(542u64))
///     .build()?;
/// ```
#[derive(Default)]
pub struct StealthPaymentBuilder {
    meta_address: Option<MetaAddress>,
    transfer: Option<Transfer>,
}

impl StealthPaymentBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recipient.
    pub fn recipient(mut self, meta_address: MetaAddress) -> Self {
        self.meta_address = Some(meta_address);
        self
    }

    /// Attaches native-asset transfer metadata.
    pub fn native_transfer(mut self, amount: Amount) -> Self {
        self.transfer = Some(Transfer::Native { amount });
        self
    }

    /// Attaches token transfer metadata with an arbitrary function selector.
    ///
    /// Field lengths are checked by [`build`](Self::build).
    pub fn token_transfer(mut self, selector: &[u8], token: &[u8], amount: Amount) -> Self {
        self.transfer = Some(Transfer::Token {
            selector: selector.to_vec(),
            token: token.to_vec(),
            amount,
        });
        self
    }

    /// Attaches an ERC-20 `transfer` with the standard selector.
    pub fn erc20_transfer(self, token: EthAddress, amount: Amount) -> Self {
        self.token_transfer(&ERC20_TRANSFER_SELECTOR, token.as_bytes(), amount)
    }

    /// Builds the payment using the OS random source.
    pub fn build(self) -> Result<PreparedPayment> {
        self.build_with_rng(&mut OsRng)
    }

    /// Builds the payment using the supplied random source.
    ///
    /// # Errors
    /// Returns `InvalidMetaAddress` if no recipient was set and
    /// `InvalidMetadataField` for a malformed token transfer.
    pub fn build_with_rng<R>(self, rng: &mut R) -> Result<PreparedPayment>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let meta_address = self.meta_address.ok_or_else(|| {
            StealthError::InvalidMetaAddress("recipient meta-address is required".into())
        })?;

        // Validate metadata fields before spending entropy
        if let Some(Transfer::Token { selector, token, .. }) = &self.transfer {
            build_token_transfer_metadata(0, selector, token, Amount::ZERO)?;
        }

        let payment = generate_stealth_address_with_rng(&meta_address, rng)?;
        let mut announcement = payment.to_announcement();

        if let Some(transfer) = self.transfer {
            let metadata = match transfer {
                Transfer::Native { amount } => {
                    build_native_transfer_metadata(payment.view_tag, amount)
                }
                Transfer::Token {
                    selector,
                    token,
                    amount,
                } => build_token_transfer_metadata(payment.view_tag, &selector, &token, amount)?,
            };
            announcement = announcement.with_metadata(metadata)?;
        }

        Ok(PreparedPayment {
            payment,
            announcement,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erc5564_core::types::MetadataKind;
    use erc5564_crypto::generate_keypair;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use test_case::test_case;

    fn create_test_meta_address() -> MetaAddress {
        let spending = generate_keypair().unwrap();
        let viewing = generate_keypair().unwrap();
        MetaAddress::new(spending.public, viewing.public)
    }

    #[test]
    fn test_generate_stealth_address() {
        let meta = create_test_meta_address();
        let payment = generate_stealth_address(&meta).unwrap();

        assert!(!payment.stealth_address.is_zero());
        assert_ne!(payment.ephemeral_pk, meta.viewing_pk);
        assert!(payment.to_announcement().validate().is_ok());
    }

    #[test]
    fn test_each_payment_is_unlinkable() {
        // Fresh ephemeral key per call
        let meta = create_test_meta_address();

        let payment1 = generate_stealth_address(&meta).unwrap();
        let payment2 = generate_stealth_address(&meta).unwrap();

        assert_ne!(payment1.stealth_address, payment2.stealth_address);
        assert_ne!(payment1.ephemeral_pk, payment2.ephemeral_pk);
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let meta = create_test_meta_address();

        let p1 = generate_stealth_address_with_rng(&meta, &mut ChaCha20Rng::seed_from_u64(1)).unwrap();
        let p2 = generate_stealth_address_with_rng(&meta, &mut ChaCha20Rng::seed_from_u64(1)).unwrap();
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_generate_from_str() {
        let meta = create_test_meta_address();
        let payment = generate_stealth_address_from_str(&meta.encode()).unwrap();
        assert!(!payment.stealth_address.is_zero());
    }

    #[test_case("" ; "empty")]
    #[test_case("st:eth:0x1234" ; "truncated")]
    #[test_case("not a meta-address" ; "garbage")]
    fn test_generate_from_str_rejects(input: &str) {
        let err = generate_stealth_address_from_str(input).unwrap_err();
        assert!(matches!(err, StealthError::InvalidMetaAddress(_)));
    }

    #[test]
    fn test_builder_native_transfer() {
        let meta = create_test_meta_address();

        let prepared = StealthPaymentBuilder::new()
            .recipient(meta)
            .native_transfer(Amount::from(542u64))
            .build()
            .unwrap();

        let metadata = prepared.announcement.metadata.unwrap();
        assert_eq!(metadata.view_tag(), prepared.payment.view_tag);
        assert_eq!(
            metadata.kind(),
            MetadataKind::NativeTransfer {
                amount: Amount::from(542u64)
            }
        );
        assert_eq!(prepared.announcement.stealth_address, prepared.payment.stealth_address);
    }

    #[test]
    fn test_builder_erc20_transfer() {
        let meta = create_test_meta_address();
        let token = EthAddress::from_hex("0x21BbDf979CE87886641a7875D2C7F26513D39542").unwrap();

        let prepared = StealthPaymentBuilder::new()
            .recipient(meta)
            .erc20_transfer(token, Amount::from(1_000_000u64))
            .build()
            .unwrap();

        match prepared.announcement.metadata.unwrap().kind() {
            MetadataKind::TokenTransfer {
                selector,
                token: parsed,
                amount,
            } => {
                assert_eq!(selector, ERC20_TRANSFER_SELECTOR);
                assert_eq!(parsed, token);
                assert_eq!(amount, Amount::from(1_000_000u64));
            }
            other => panic!("unexpected metadata kind: {:?}", other),
        }
    }

    #[test]
    fn test_builder_without_metadata() {
        let meta = create_test_meta_address();
        let prepared = StealthPaymentBuilder::new().recipient(meta).build().unwrap();

        assert!(prepared.announcement.metadata.is_none());
        assert_eq!(prepared.announcement, prepared.payment.to_announcement());
    }

    #[test]
    fn test_builder_missing_recipient() {
        let result = StealthPaymentBuilder::new()
            .native_transfer(Amount::from(1u64))
            .build();

        assert!(matches!(result, Err(StealthError::InvalidMetaAddress(_))));
    }

    #[test_case(3, 20, "function_selector" ; "short selector")]
    #[test_case(4, 19, "token_address" ; "short token")]
    fn test_builder_rejects_bad_token_fields(selector_len: usize, token_len: usize, field: &str) {
        let meta = create_test_meta_address();

        let result = StealthPaymentBuilder::new()
            .recipient(meta)
            .token_transfer(&vec![0xf1; selector_len], &vec![0x21; token_len], Amount::from(1u64))
            .build();

        match result {
            Err(StealthError::InvalidMetadataField { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected InvalidMetadataField, got {:?}", other),
        }
    }

    #[test]
    fn test_payment_serialization() {
        let meta = create_test_meta_address();
        let payment = generate_stealth_address(&meta).unwrap();

        let json = serde_json::to_string(&payment).unwrap();
        let restored: StealthPayment = serde_json::from_str(&json).unwrap();
        assert_eq!(payment, restored);
    }
}
