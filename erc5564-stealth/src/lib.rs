//! # ERC-5564 Stealth Address Protocol
//!
//! High-level API for creating and discovering stealth addresses.
//!
//! This crate provides:
//!
//! - **Generate**: Sender derives a one-time address from a meta-address
//! - **Check**: Recipient tests an announcement with the viewing key
//! - **Recover**: Owner derives the secret key controlling a stealth address
//! - **Wallet**: Recipient facade over the three operations plus scanning
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use erc5564_stealth::{generate_stealth_address_from_str, StealthWallet};
//!
//! // Recipient: Generate keys and publish meta-address
//! let wallet = StealthWallet::generate()?;
//! let meta_address = wallet.meta_address().encode();
//!
//! // Sender: Create stealth payment
//! let payment = generate_stealth_address_from_str(&meta_address)?;
//! // Send funds to payment.stealth_address
//! // Publish payment.to_announcement()
//!
//! // Recipient: Discover and claim payments
//! for (_, found) in wallet.scan(&announcements) {
//!     println!("Found payment at: {}", found.stealth_address);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod wallet;
pub mod payment;
pub mod discovery;
pub mod recovery;

pub use wallet::{StealthWallet, ViewingKeyExport};
pub use payment::{
    generate_stealth_address, generate_stealth_address_from_str,
    generate_stealth_address_with_rng, PreparedPayment, StealthPayment, StealthPaymentBuilder,
};
pub use discovery::{
    check_stealth_address, scan_announcement, scan_announcements, scan_announcements_with_stats,
    DiscoveredPayment, ScanResult, ScanStats,
};
pub use recovery::compute_stealth_key;
