//! secp256k1 key pair generation.
//!
//! Secret scalars are drawn from the operating system's secure random source
//! and rejection-sampled into `[1, n-1]`. A failing random source is reported
//! as [`StealthError::EntropyError`]; no weaker source is ever substituted.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use erc5564_core::constants::SECRET_KEY_SIZE;
use erc5564_core::error::{Result, StealthError};
use erc5564_core::types::{KeyPair, RecipientKeys, SecretKey};

/// Upper bound on rejection-sampling rounds.
///
/// A uniform source lands outside `[1, n-1]` with probability below 2^-127
/// per round, so exhausting this bound means the source is broken.
const MAX_SAMPLING_ATTEMPTS: usize = 64;

/// Generates a key pair from the operating system random source.
///
/// # Errors
/// Returns `EntropyError` if the random source fails.
///
/// # Example
///
/// ```rust,ignore
/// use erc5564_crypto::generate_keypair;
///
/// let keypair = generate_keypair()?;
/// assert_eq!(keypair.public.to_compressed().len(), 33);
/// ```
pub fn generate_keypair() -> Result<KeyPair> {
    generate_keypair_with_rng(&mut OsRng)
}

/// Generates a key pair from the supplied random source.
///
/// Intended for deterministic tests with a seeded CSPRNG. Production callers
/// should use [`generate_keypair`].
pub fn generate_keypair_with_rng<R>(rng: &mut R) -> Result<KeyPair>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut bytes = Zeroizing::new([0u8; SECRET_KEY_SIZE]);

    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        rng.try_fill_bytes(&mut bytes[..])
            .map_err(|e| StealthError::EntropyError(e.to_string()))?;

        // Zero or >= n: draw again
        if let Ok(secret) = SecretKey::from_bytes(&bytes[..]) {
            return Ok(KeyPair::from_secret(secret));
        }
    }

    Err(StealthError::EntropyError(format!(
        "no valid scalar after {} draws",
        MAX_SAMPLING_ATTEMPTS
    )))
}

/// Generates independent spending and viewing key pairs.
pub fn generate_recipient_keys() -> Result<RecipientKeys> {
    let spending = generate_keypair()?;
    let viewing = generate_keypair()?;
    Ok(RecipientKeys::new(spending, viewing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    /// Random source that always fails.
    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "entropy unavailable",
            )))
        }
    }

    impl CryptoRng for FailingRng {}

    /// Random source that fills every buffer with a constant byte.
    struct ConstantRng(u8);

    impl RngCore for ConstantRng {
        fn next_u32(&mut self) -> u32 {
            u32::from_ne_bytes([self.0; 4])
        }

        fn next_u64(&mut self) -> u64 {
            u64::from_ne_bytes([self.0; 8])
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(self.0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for ConstantRng {}

    #[test]
    fn test_keypair_generation() {
        let keypair = generate_keypair().unwrap();
        assert_eq!(keypair.public, keypair.secret.public_key());
    }

    #[test]
    fn test_keypairs_are_distinct() {
        let kp1 = generate_keypair().unwrap();
        let kp2 = generate_keypair().unwrap();
        assert_ne!(kp1.secret, kp2.secret);
        assert_ne!(kp1.public, kp2.public);
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let kp1 = generate_keypair_with_rng(&mut ChaCha20Rng::seed_from_u64(7)).unwrap();
        let kp2 = generate_keypair_with_rng(&mut ChaCha20Rng::seed_from_u64(7)).unwrap();
        let kp3 = generate_keypair_with_rng(&mut ChaCha20Rng::seed_from_u64(8)).unwrap();

        assert_eq!(kp1.secret, kp2.secret);
        assert_ne!(kp1.secret, kp3.secret);
    }

    #[test]
    fn test_entropy_failure_is_reported() {
        let result = generate_keypair_with_rng(&mut FailingRng);
        let err = result.unwrap_err();
        assert!(matches!(err, StealthError::EntropyError(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_out_of_range_draws_are_rejected() {
        // All-zero and all-0xff draws are never valid scalars
        assert!(matches!(
            generate_keypair_with_rng(&mut ConstantRng(0x00)),
            Err(StealthError::EntropyError(_))
        ));
        assert!(matches!(
            generate_keypair_with_rng(&mut ConstantRng(0xff)),
            Err(StealthError::EntropyError(_))
        ));

        // 0x42..42 is below n
        let keypair = generate_keypair_with_rng(&mut ConstantRng(0x42)).unwrap();
        assert_eq!(keypair.secret.to_bytes(), [0x42; 32]);
    }

    #[test]
    fn test_recipient_keys_are_independent() {
        let keys = generate_recipient_keys().unwrap();
        assert_ne!(keys.spending.secret, keys.viewing.secret);
    }
}
