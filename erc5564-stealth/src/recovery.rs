//! Stealth secret key recovery (owner side).

use tracing::{debug, instrument, warn};

use erc5564_core::error::{Result, StealthError};
use erc5564_core::types::{EthAddress, PublicKey, SecretKey};
use erc5564_crypto::{compute_shared_secret, derive_eth_address, derive_stealth_secret_key};

/// Recovers the secret key that controls `stealth_address`.
///
/// ```text
/// s = (hash(viewing_sk · ephemeral_pk) + spending_sk) mod n
/// ```
///
/// The result is checked against `stealth_address` before it is returned;
/// a key that does not control the address is never handed out.
///
/// # Errors
/// - `StealthAddressMismatch` if `s·G` does not derive to `stealth_address`
///   (wrong keys, or an announcement meant for someone else)
/// - `InvalidScalar` if `s` is zero
#[instrument(skip_all, fields(stealth_address = %stealth_address))]
pub fn compute_stealth_key(
    stealth_address: &EthAddress,
    ephemeral_pk: &PublicKey,
    viewing_sk: &SecretKey,
    spending_sk: &SecretKey,
) -> Result<SecretKey> {
    let digest = compute_shared_secret(viewing_sk, ephemeral_pk)?;
    let stealth_sk = derive_stealth_secret_key(spending_sk, &digest)?;

    let derived = derive_eth_address(&stealth_sk.public_key());
    if derived != *stealth_address {
        warn!(%derived, "Recovered key does not control the stealth address");
        return Err(StealthError::StealthAddressMismatch {
            expected: stealth_address.to_string(),
            derived: derived.to_string(),
        });
    }

    debug!("Recovered stealth key");
    Ok(stealth_sk)
}
