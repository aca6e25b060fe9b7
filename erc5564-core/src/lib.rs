//! # ERC-5564 Core
//!
//! Core types, errors, and constants for the ERC-5564 stealth address protocol
//! on secp256k1.
//!
//! This crate provides the foundational building blocks used by the other crates:
//!
//! - **Types**: Keys, meta-addresses, Ethereum addresses, announcements and their metadata
//! - **Errors**: A single error enum classified into protocol error kinds
//! - **Constants**: Prefixes, sizes and wire-layout offsets
//!
//! ## Example
//!
//! ```rust
//! use erc5564_core::{build_native_transfer_metadata, Amount};
//!
//! let metadata = build_native_transfer_metadata(54, Amount::from(542u64));
//! assert_eq!(metadata.as_bytes().len(), 57);
//! assert_eq!(metadata.view_tag(), 54);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{ErrorKind, Result, StealthError};
pub use types::*;
