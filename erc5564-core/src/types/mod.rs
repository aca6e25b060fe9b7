//! Domain types for ERC-5564.
//!
//! This module provides all the core data structures used throughout the protocol:
//!
//! - [`KeyPair`]: secp256k1 secret/public key pair
//! - [`MetaAddress`]: Published identifier for receiving private payments
//! - [`EthAddress`]: One-time stealth address (or any Ethereum address)
//! - [`Announcement`]: Published ephemeral key + view tag
//! - [`AnnouncementMetadata`]: 57-byte transfer payload

mod keys;
mod address;
mod announcement;
mod metadata;

pub use keys::*;
pub use address::*;
pub use announcement::*;
pub use metadata::*;
