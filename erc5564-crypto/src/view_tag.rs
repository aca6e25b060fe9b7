//! View tag computation for efficient scanning.
//!
//! View tags enable recipients to quickly filter announcements:
//! - Each announcement includes a 1-byte view tag
//! - Recipients compute their expected view tag from the shared secret digest
//! - Only announcements with matching view tags require the scalar
//!   multiplication and Keccak256 that derive the stealth address
//!
//! ## Efficiency
//!
//! With 1-byte view tags (256 possible values), ~99.6% of announcements
//! can be skipped after a single ECDH.
//!
//! ## Security
//!
//! View tags leak 1 byte of the shared secret digest, reducing the security
//! of the stealth scalar from 128 to 124 bits.

use crate::ecdh::SharedSecretDigest;

/// Computes the view tag from a shared secret digest.
///
/// The view tag is the first byte of the digest.
///
/// # Example
///
/// ```rust,ignore
/// use erc5564_crypto::{compute_shared_secret, compute_view_tag};
///
/// let digest = compute_shared_secret(&ephemeral.secret, &meta.viewing_pk)?;
/// let view_tag = compute_view_tag(&digest);
/// ```
pub fn compute_view_tag(digest: &SharedSecretDigest) -> u8 {
    digest.view_tag()
}

/// Checks if a view tag matches the expected value for a digest.
///
/// Not constant-time: the announced tag is public and a mismatch is the
/// common, fast path of scanning.
pub fn view_tag_matches(digest: &SharedSecretDigest, announced_tag: u8) -> bool {
    compute_view_tag(digest) == announced_tag
}
