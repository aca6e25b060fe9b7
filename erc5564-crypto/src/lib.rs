//! # ERC-5564 Cryptography
//!
//! secp256k1 primitives for the ERC-5564 stealth address protocol.
//!
//! This crate provides:
//!
//! - **Keys**: Key pair generation from the OS random source
//! - **Hash**: SHA-256 of shared secret points, Keccak256 for addresses
//! - **ECDH**: The shared-secret rule used by sender and recipient
//! - **View Tags**: First byte of the shared secret digest
//! - **Derivation**: Stealth public/secret keys and Ethereum addresses
//!
//! ## Security Properties
//!
//! - Secret scalars and shared secret digests are zeroized on drop
//! - Random-source failures surface as errors; there is no fallback RNG
//! - Address verification uses constant-time comparison
//!
//! ## Example
//!
//! ```rust,ignore
//! use erc5564_crypto::{generate_keypair, compute_shared_secret};
//!
//! let viewing = generate_keypair()?;
//! let ephemeral = generate_keypair()?;
//!
//! // Sender and recipient arrive at the same digest
//! let sender = compute_shared_secret(&ephemeral.secret, &viewing.public)?;
//! let recipient = compute_shared_secret(&viewing.secret, &ephemeral.public)?;
//! assert_eq!(sender.view_tag(), recipient.view_tag());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod keys;
pub mod hash;
pub mod ecdh;
pub mod view_tag;
pub mod derive;

// Re-export main functions at crate root
pub use keys::{generate_keypair, generate_keypair_with_rng, generate_recipient_keys};
pub use hash::{hash_shared_point, keccak256};
pub use ecdh::{compute_shared_secret, SharedSecretDigest};
pub use view_tag::{compute_view_tag, view_tag_matches};
pub use derive::{
    derive_eth_address, derive_stealth_address, derive_stealth_keys, derive_stealth_public_key,
    derive_stealth_secret_key, verify_stealth_address, StealthKeys,
};
