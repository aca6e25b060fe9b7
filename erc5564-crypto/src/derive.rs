//! Stealth key and address derivation.
//!
//! This module implements the core cryptographic operations for deriving
//! stealth public/secret keys and Ethereum addresses.
//!
//! ## Derivation Flow
//!
//! ```text
//! digest (from ECDH)
//!       ↓
//! h = digest mod n
//!       ↓
//! stealth_pk = spending_pk + h·G
//!       ↓
//! eth_address = keccak256(uncompressed(stealth_pk)[1..])[12..32]
//! ```
//!
//! ## Secret Key Derivation
//!
//! The recipient derives the matching secret key:
//!
//! ```text
//! stealth_sk = (spending_sk + h) mod n
//! ```
//!
//! so that `stealth_sk·G == stealth_pk`.

use k256::{NonZeroScalar, ProjectivePoint};
use subtle::ConstantTimeEq;

use erc5564_core::constants::{ETH_ADDRESS_SIZE, KECCAK256_SIZE};
use erc5564_core::error::{Result, StealthError};
use erc5564_core::types::{EthAddress, KeyPair, PublicKey, SecretKey};

use crate::ecdh::SharedSecretDigest;
use crate::hash::keccak256;

/// Result of stealth key derivation.
#[derive(Debug, Clone)]
pub struct StealthKeys {
    /// The stealth public key
    pub public_key: PublicKey,
    /// The stealth secret key (zeroized on drop)
    pub secret_key: SecretKey,
    /// The derived Ethereum address
    pub address: EthAddress,
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH PUBLIC KEY DERIVATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives a stealth public key from the spending public key and shared secret digest.
///
/// # Algorithm
///
/// ```text
/// stealth_pk = spending_pk + (digest mod n)·G
/// ```
///
/// # Errors
/// Returns `InvalidPoint` if the sum is the point at infinity, which happens
/// only when `digest mod n` equals the negated spending secret.
pub fn derive_stealth_public_key(
    spending_pk: &PublicKey,
    digest: &SharedSecretDigest,
) -> Result<PublicKey> {
    let offset = ProjectivePoint::GENERATOR * digest.to_scalar();
    PublicKey::from_projective(spending_pk.to_projective() + offset)
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH SECRET KEY DERIVATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives a stealth secret key from the spending secret key and shared secret digest.
///
/// # Algorithm
///
/// ```text
/// stealth_sk = (spending_sk + digest mod n) mod n
/// ```
///
/// # Security
///
/// This function handles sensitive key material. The output is automatically
/// zeroized when dropped.
///
/// # Errors
/// Returns `InvalidScalar` if the sum is zero mod n.
pub fn derive_stealth_secret_key(
    spending_sk: &SecretKey,
    digest: &SharedSecretDigest,
) -> Result<SecretKey> {
    let sum = *spending_sk.to_scalar() + digest.to_scalar();

    Option::<NonZeroScalar>::from(NonZeroScalar::new(sum))
        .map(SecretKey::from_scalar)
        .ok_or_else(|| StealthError::InvalidScalar("stealth secret key is zero".into()))
}

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM ADDRESS DERIVATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives an Ethereum address from a public key.
///
/// # Algorithm
///
/// ```text
/// address = keccak256(x || y)[12..32]
/// ```
///
/// where `x || y` is the 64-byte uncompressed encoding without its `0x04` tag.
pub fn derive_eth_address(public_key: &PublicKey) -> EthAddress {
    let uncompressed = public_key.to_uncompressed();
    let hash = keccak256(&uncompressed[1..]);

    // Take last 20 bytes as Ethereum address
    let mut address_bytes = [0u8; ETH_ADDRESS_SIZE];
    address_bytes.copy_from_slice(&hash[KECCAK256_SIZE - ETH_ADDRESS_SIZE..]);

    EthAddress::from_array(address_bytes)
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMBINED DERIVATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives complete stealth keys (public, secret, and address).
///
/// This is the function used by recipients once an announcement has been
/// confirmed as theirs.
pub fn derive_stealth_keys(spending: &KeyPair, digest: &SharedSecretDigest) -> Result<StealthKeys> {
    let public_key = derive_stealth_public_key(&spending.public, digest)?;
    let secret_key = derive_stealth_secret_key(&spending.secret, digest)?;
    let address = derive_eth_address(&public_key);

    Ok(StealthKeys {
        public_key,
        secret_key,
        address,
    })
}

/// Derives only the address (for senders who don't need the secret key).
pub fn derive_stealth_address(
    spending_pk: &PublicKey,
    digest: &SharedSecretDigest,
) -> Result<EthAddress> {
    let stealth_pk = derive_stealth_public_key(spending_pk, digest)?;
    Ok(derive_eth_address(&stealth_pk))
}

// ═══════════════════════════════════════════════════════════════════════════════
// VERIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Verifies that a stealth address was derived from this spending key and digest.
///
/// Uses a constant-time comparison of the 20 address bytes.
pub fn verify_stealth_address(
    spending_pk: &PublicKey,
    digest: &SharedSecretDigest,
    expected_address: &EthAddress,
) -> Result<bool> {
    let derived = derive_stealth_address(spending_pk, digest)?;
    Ok(derived.as_bytes().ct_eq(expected_address.as_bytes()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecdh::compute_shared_secret;
    use crate::keys::generate_keypair;

    fn scalar_key(v: u8) -> SecretKey {
        let mut bytes = [0u8; 32];
        bytes[31] = v;
        SecretKey::from_bytes(&bytes).unwrap()
    }

    /// Digest for ephemeral scalar 5 against viewing scalar 3.
    fn vector_digest() -> SharedSecretDigest {
        compute_shared_secret(&scalar_key(5), &scalar_key(3).public_key()).unwrap()
    }

    #[test]
    fn test_derive_eth_address_known_keys() {
        assert_eq!(
            derive_eth_address(&scalar_key(1).public_key()).to_string(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
        assert_eq!(
            derive_eth_address(&scalar_key(2).public_key()).to_string(),
            "0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF"
        );
    }

    #[test]
    fn test_derive_stealth_address_vector() {
        let spending = KeyPair::from_secret(scalar_key(2));
        let digest = vector_digest();

        let address = derive_stealth_address(&spending.public, &digest).unwrap();
        assert_eq!(
            hex::encode(address.as_bytes()),
            "2b6a63a62c22e4a49605bf2dcbe55e550ef2377c"
        );

        let secret = derive_stealth_secret_key(&spending.secret, &digest).unwrap();
        assert_eq!(
            secret.to_hex(),
            "6a2c4691c547c43924650dbd30620b184b5fe3fb6dbe5c4446110b08f6f405c1"
        );
    }

    #[test]
    fn test_secret_key_matches_public_key() {
        let spending = generate_keypair().unwrap();
        let viewing = generate_keypair().unwrap();
        let ephemeral = generate_keypair().unwrap();
        let digest = compute_shared_secret(&ephemeral.secret, &viewing.public).unwrap();

        let stealth_pk = derive_stealth_public_key(&spending.public, &digest).unwrap();
        let stealth_sk = derive_stealth_secret_key(&spending.secret, &digest).unwrap();

        assert_eq!(stealth_sk.public_key(), stealth_pk);
        assert_ne!(stealth_pk, spending.public);
    }

    #[test]
    fn test_derive_stealth_keys() {
        let spending = generate_keypair().unwrap();
        let digest = vector_digest();

        let keys = derive_stealth_keys(&spending, &digest).unwrap();

        assert_eq!(keys.secret_key.public_key(), keys.public_key);
        assert_eq!(keys.address, derive_eth_address(&keys.public_key));
        assert_eq!(
            keys.address,
            derive_stealth_address(&spending.public, &digest).unwrap()
        );
    }

    #[test]
    fn test_derive_stealth_public_key_different_digests() {
        let spending = generate_keypair().unwrap();
        let d1 = SharedSecretDigest::from_bytes([1u8; 32]);
        let d2 = SharedSecretDigest::from_bytes([2u8; 32]);

        let pk1 = derive_stealth_public_key(&spending.public, &d1).unwrap();
        let pk2 = derive_stealth_public_key(&spending.public, &d2).unwrap();
        assert_ne!(pk1, pk2);
    }

    #[test]
    fn test_stealth_sum_at_infinity() {
        // spending_sk = n - 1 and h = 1 cancel out
        let n_minus_one = hex::decode(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140",
        )
        .unwrap();
        let spending = KeyPair::from_secret(SecretKey::from_bytes(&n_minus_one).unwrap());

        let mut one = [0u8; 32];
        one[31] = 1;
        let digest = SharedSecretDigest::from_bytes(one);

        let pk = derive_stealth_public_key(&spending.public, &digest);
        assert!(matches!(pk, Err(StealthError::InvalidPoint(_))));

        let sk = derive_stealth_secret_key(&spending.secret, &digest);
        assert!(matches!(sk, Err(StealthError::InvalidScalar(_))));
    }

    #[test]
    fn test_verify_stealth_address() {
        let spending = generate_keypair().unwrap();
        let digest = vector_digest();

        let address = derive_stealth_address(&spending.public, &digest).unwrap();
        assert!(verify_stealth_address(&spending.public, &digest, &address).unwrap());

        // Wrong address should fail
        let wrong_address = EthAddress::from_array([0xFF; ETH_ADDRESS_SIZE]);
        assert!(!verify_stealth_address(&spending.public, &digest, &wrong_address).unwrap());
    }

    #[test]
    fn test_stealth_keys_debug_redacts_secret() {
        let spending = KeyPair::from_secret(scalar_key(2));
        let keys = derive_stealth_keys(&spending, &vector_digest()).unwrap();

        let debug = format!("{:?}", keys);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&keys.secret_key.to_hex()));
    }
}
