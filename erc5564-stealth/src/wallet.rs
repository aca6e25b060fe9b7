//! Recipient wallet.
//!
//! The wallet holds a spending and a viewing key pair and provides the
//! recipient side of the protocol: publish a meta-address, check and scan
//! announcements, recover stealth keys.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::info;

use erc5564_core::error::Result;
use erc5564_core::types::{
    Announcement, KeyPair, MetaAddress, PublicKey, RecipientKeys, SecretKey,
};
use erc5564_crypto::{derive_eth_address, generate_keypair_with_rng, generate_recipient_keys, StealthKeys};

use crate::discovery::{check_stealth_address, scan_announcements_with_stats, DiscoveredPayment, ScanStats};
use crate::recovery::compute_stealth_key;

/// An ERC-5564 wallet containing keys for receiving private payments.
///
/// The wallet holds:
/// - Spending keys: For deriving stealth secret keys and spending funds
/// - Viewing keys: For scanning announcements (can be shared with auditors)
pub struct StealthWallet {
    /// The complete key set (spending + viewing)
    keys: RecipientKeys,
    /// Cached meta-address
    meta_address: MetaAddress,
}

impl StealthWallet {
    /// Generates a new wallet with random keys.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use erc5564_stealth::StealthWallet;
    ///
    /// let wallet = StealthWallet::generate()?;
    /// println!("Meta-address: {}", wallet.meta_address());
    /// ```
    pub fn generate() -> Result<Self> {
        Ok(Self::from_keys(generate_recipient_keys()?))
    }

    /// Generates a new wallet from the supplied random source.
    pub fn generate_with_rng<R>(rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let spending = generate_keypair_with_rng(rng)?;
        let viewing = generate_keypair_with_rng(rng)?;
        Ok(Self::from_keys(RecipientKeys::new(spending, viewing)))
    }

    /// Creates a wallet from existing keys.
    pub fn from_keys(keys: RecipientKeys) -> Self {
        let meta_address = MetaAddress::new(keys.spending.public, keys.viewing.public);
        Self { keys, meta_address }
    }

    /// Creates a wallet from hex-encoded spending and viewing secret keys.
    pub fn from_secret_hex(spending_sk: &str, viewing_sk: &str) -> Result<Self> {
        let spending = KeyPair::from_secret_hex(spending_sk)?;
        let viewing = KeyPair::from_secret_hex(viewing_sk)?;
        Ok(Self::from_keys(RecipientKeys::new(spending, viewing)))
    }

    /// Returns the meta-address for publishing.
    ///
    /// This is what recipients share so others can send them payments.
    pub fn meta_address(&self) -> &MetaAddress {
        &self.meta_address
    }

    /// Returns the key set. Handle with care: it includes both secret keys.
    pub fn keys(&self) -> &RecipientKeys {
        &self.keys
    }

    /// Returns the spending public key.
    pub fn spending_public_key(&self) -> &PublicKey {
        &self.keys.spending.public
    }

    /// Returns the viewing public key.
    pub fn viewing_public_key(&self) -> &PublicKey {
        &self.keys.viewing.public
    }

    /// Checks whether an announcement pays this wallet.
    ///
    /// # Errors
    /// Returns `InvalidAnnouncement` for a malformed announcement.
    pub fn check(&self, announcement: &Announcement) -> Result<bool> {
        announcement.validate()?;
        check_stealth_address(
            &announcement.stealth_address,
            &announcement.ephemeral_pk,
            &self.keys.viewing.secret,
            &self.keys.spending.public,
            announcement.view_tag,
        )
    }

    /// Recovers the stealth keys for an announcement that pays this wallet.
    ///
    /// # Errors
    /// Returns `StealthAddressMismatch` if the announcement is not ours.
    pub fn recover(&self, announcement: &Announcement) -> Result<StealthKeys> {
        announcement.validate()?;
        let secret_key = compute_stealth_key(
            &announcement.stealth_address,
            &announcement.ephemeral_pk,
            &self.keys.viewing.secret,
            &self.keys.spending.secret,
        )?;

        let public_key = secret_key.public_key();
        Ok(StealthKeys {
            address: derive_eth_address(&public_key),
            public_key,
            secret_key,
        })
    }

    /// Scans announcements and returns the ones paying this wallet, with their indices.
    pub fn scan(&self, announcements: &[Announcement]) -> Vec<(usize, DiscoveredPayment)> {
        self.scan_with_stats(announcements).0
    }

    /// Scans announcements and also reports per-outcome counts.
    pub fn scan_with_stats(
        &self,
        announcements: &[Announcement],
    ) -> (Vec<(usize, DiscoveredPayment)>, ScanStats) {
        scan_announcements_with_stats(
            announcements,
            &self.keys.viewing.secret,
            &self.keys.spending.public,
        )
    }

    /// Exports the viewing key for third-party auditing.
    ///
    /// The export lets its holder detect payments to this wallet but not
    /// spend them.
    pub fn export_viewing_key(&self) -> ViewingKeyExport {
        info!(meta_address = %self.meta_address, "Exporting viewing key");
        ViewingKeyExport {
            meta_address: self.meta_address,
            viewing_secret_key: self.keys.viewing.secret.to_hex(),
        }
    }
}

impl std::fmt::Debug for StealthWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StealthWallet")
            .field("meta_address", &self.meta_address)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

/// Exported viewing key information.
///
/// Holds the viewing secret key and both public keys. The spending secret key
/// is not included.
#[derive(Clone, Serialize, Deserialize)]
pub struct ViewingKeyExport {
    /// The wallet's meta-address (spending and viewing public keys)
    pub meta_address: MetaAddress,
    /// Viewing secret key (hex)
    pub viewing_secret_key: String,
}

impl ViewingKeyExport {
    /// Checks whether an announcement pays the exporting wallet.
    pub fn check(&self, announcement: &Announcement) -> Result<bool> {
        announcement.validate()?;
        let viewing_sk = SecretKey::from_hex(&self.viewing_secret_key)?;
        check_stealth_address(
            &announcement.stealth_address,
            &announcement.ephemeral_pk,
            &viewing_sk,
            &self.meta_address.spending_pk,
            announcement.view_tag,
        )
    }
}

impl std::fmt::Debug for ViewingKeyExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewingKeyExport")
            .field("meta_address", &self.meta_address)
            .field("viewing_secret_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{generate_stealth_address, StealthPaymentBuilder};
    use erc5564_core::error::StealthError;
    use erc5564_core::types::{Amount, MetadataKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_wallet_generation() {
        let wallet = StealthWallet::generate().unwrap();
        let meta = wallet.meta_address();

        assert_eq!(&meta.spending_pk, wallet.spending_public_key());
        assert_eq!(&meta.viewing_pk, wallet.viewing_public_key());
        assert_ne!(meta.spending_pk, meta.viewing_pk);
    }

    #[test]
    fn test_wallet_seeded_generation() {
        let w1 = StealthWallet::generate_with_rng(&mut ChaCha20Rng::seed_from_u64(3)).unwrap();
        let w2 = StealthWallet::generate_with_rng(&mut ChaCha20Rng::seed_from_u64(3)).unwrap();
        assert_eq!(w1.meta_address(), w2.meta_address());
    }

    #[test]
    fn test_wallet_from_secret_hex() {
        let original = StealthWallet::generate().unwrap();
        let restored = StealthWallet::from_secret_hex(
            &original.keys().spending.secret.to_hex(),
            &original.keys().viewing.secret.to_hex(),
        )
        .unwrap();

        assert_eq!(original.meta_address(), restored.meta_address());
    }

    #[test]
    fn test_wallet_check_and_recover() {
        let wallet = StealthWallet::generate().unwrap();
        let payment = generate_stealth_address(wallet.meta_address()).unwrap();
        let announcement = payment.to_announcement();

        assert!(wallet.check(&announcement).unwrap());

        let keys = wallet.recover(&announcement).unwrap();
        assert_eq!(keys.address, payment.stealth_address);
        assert_eq!(keys.secret_key.public_key(), keys.public_key);
    }

    #[test]
    fn test_wallet_rejects_foreign_announcement() {
        let alice = StealthWallet::generate().unwrap();
        let bob = StealthWallet::generate().unwrap();
        let announcement = generate_stealth_address(bob.meta_address())
            .unwrap()
            .to_announcement();

        assert!(!alice.check(&announcement).unwrap());
        assert!(matches!(
            alice.recover(&announcement),
            Err(StealthError::StealthAddressMismatch { .. })
        ));
    }

    #[test]
    fn test_wallet_scan_reports_metadata() {
        let wallet = StealthWallet::generate().unwrap();
        let other = StealthWallet::generate().unwrap();

        let ours = StealthPaymentBuilder::new()
            .recipient(*wallet.meta_address())
            .native_transfer(Amount::from(542u64))
            .build()
            .unwrap();
        let theirs = StealthPaymentBuilder::new()
            .recipient(*other.meta_address())
            .build()
            .unwrap();

        let announcements = vec![theirs.announcement, ours.announcement.clone()];
        let (found, stats) = wallet.scan_with_stats(&announcements);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 1);
        assert_eq!(found[0].1.stealth_address, ours.payment.stealth_address);
        assert_eq!(
            found[0].1.transfer,
            Some(MetadataKind::NativeTransfer {
                amount: Amount::from(542u64)
            })
        );
        assert_eq!(stats.discoveries, 1);
        assert_eq!(wallet.scan(&announcements).len(), 1);
    }

    #[test]
    fn test_viewing_key_export_can_check() {
        let wallet = StealthWallet::generate().unwrap();
        let export = wallet.export_viewing_key();

        let ours = generate_stealth_address(wallet.meta_address()).unwrap().to_announcement();
        let theirs = generate_stealth_address(StealthWallet::generate().unwrap().meta_address())
            .unwrap()
            .to_announcement();

        assert!(export.check(&ours).unwrap());
        assert!(!export.check(&theirs).unwrap());

        // The export round-trips through JSON and never carries the spending secret
        let json = serde_json::to_string(&export).unwrap();
        assert!(!json.contains(&wallet.keys().spending.secret.to_hex()));
        let restored: ViewingKeyExport = serde_json::from_str(&json).unwrap();
        assert!(restored.check(&ours).unwrap());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let wallet = StealthWallet::generate().unwrap();
        let viewing_hex = wallet.keys().viewing.secret.to_hex();

        let wallet_debug = format!("{:?}", wallet);
        let export_debug = format!("{:?}", wallet.export_viewing_key());

        assert!(wallet_debug.contains("REDACTED"));
        assert!(!wallet_debug.contains(&viewing_hex));
        assert!(!export_debug.contains(&viewing_hex));
    }
}
