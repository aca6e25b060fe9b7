//! Error types for ERC-5564 operations.
//!
//! Every failure is a variant of [`StealthError`]. Variants group into the
//! protocol's error kinds via [`StealthError::kind`]:
//!
//! - **Format**: malformed caller input (meta-address text, metadata fields, hex)
//! - **Curve**: bytes that do not decode to a valid point or scalar
//! - **Consistency**: recovered key does not control the expected address
//! - **Entropy**: the secure random source failed
//!
//! "Not mine" during a check is a valid `false`, never an error.

use thiserror::Error;

/// Result type alias using `StealthError`.
pub type Result<T> = std::result::Result<T, StealthError>;

/// Protocol-level classification of a [`StealthError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input; the caller can retry with valid input.
    Format,
    /// Invalid curve point or scalar.
    Curve,
    /// Mismatched keys supplied to key recovery.
    Consistency,
    /// Random source failure; fatal.
    Entropy,
}

/// Main error type for all ERC-5564 operations.
#[derive(Debug, Error)]
pub enum StealthError {
    // ═══════════════════════════════════════════════════════════════════════════
    // FORMAT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Invalid meta-address format or content.
    #[error("Invalid meta-address: {0}")]
    InvalidMetaAddress(String),

    /// A metadata payload field has the wrong length.
    #[error("Invalid metadata field '{field}': expected {expected} bytes, got {actual}")]
    InvalidMetadataField {
        /// Name of the offending field.
        field: &'static str,
        /// Required length in bytes.
        expected: usize,
        /// Supplied length in bytes.
        actual: usize,
    },

    /// Invalid key size.
    #[error("Invalid key: expected {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Required length in bytes.
        expected: usize,
        /// Supplied length in bytes.
        actual: usize,
    },

    /// Amount does not fit in a uint256 or failed to parse.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid Ethereum address.
    #[error("Invalid Ethereum address: {0}")]
    InvalidEthAddress(String),

    /// Invalid announcement format.
    #[error("Invalid announcement: {0}")]
    InvalidAnnouncement(String),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    // ═══════════════════════════════════════════════════════════════════════════
    // CURVE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Bytes do not encode a valid secp256k1 point.
    #[error("Invalid curve point: {0}")]
    InvalidPoint(String),

    /// Scalar is zero or not below the curve order.
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONSISTENCY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The recovered stealth key does not control the expected address.
    #[error("Stealth address mismatch: expected {expected}, derived {derived}")]
    StealthAddressMismatch {
        /// Address the caller asked to recover.
        expected: String,
        /// Address controlled by the recovered key.
        derived: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // ENTROPY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The operating system random source failed.
    #[error("Entropy source failure: {0}")]
    EntropyError(String),
}

impl StealthError {
    /// Returns the protocol error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StealthError::InvalidMetaAddress(_)
            | StealthError::InvalidMetadataField { .. }
            | StealthError::InvalidKeySize { .. }
            | StealthError::InvalidAmount(_)
            | StealthError::InvalidEthAddress(_)
            | StealthError::InvalidAnnouncement(_)
            | StealthError::HexError(_) => ErrorKind::Format,
            StealthError::InvalidPoint(_) | StealthError::InvalidScalar(_) => ErrorKind::Curve,
            StealthError::StealthAddressMismatch { .. } => ErrorKind::Consistency,
            StealthError::EntropyError(_) => ErrorKind::Entropy,
        }
    }

    /// Returns true if the caller can recover by supplying valid input.
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Format
    }

    /// Returns true if the error must abort the process (entropy failure).
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Entropy
    }

    /// Returns true if this is a curve error.
    pub fn is_curve_error(&self) -> bool {
        self.kind() == ErrorKind::Curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StealthError::InvalidMetadataField {
            field: "function_selector",
            expected: 4,
            actual: 3,
        };
        assert!(err.to_string().contains("function_selector"));
        assert!(err.to_string().contains('4'));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_error_classification() {
        assert_eq!(
            StealthError::InvalidMetaAddress("test".into()).kind(),
            ErrorKind::Format
        );
        assert_eq!(StealthError::InvalidPoint("test".into()).kind(), ErrorKind::Curve);
        assert_eq!(
            StealthError::StealthAddressMismatch {
                expected: "a".into(),
                derived: "b".into()
            }
            .kind(),
            ErrorKind::Consistency
        );

        assert!(StealthError::InvalidAmount("test".into()).is_recoverable());
        assert!(!StealthError::InvalidScalar("test".into()).is_recoverable());
        assert!(StealthError::EntropyError("test".into()).is_fatal());
        assert!(!StealthError::InvalidMetaAddress("test".into()).is_fatal());
    }

    #[test]
    fn test_every_kind_is_reachable() {
        let errors = [
            StealthError::InvalidAnnouncement("scheme".into()),
            StealthError::InvalidScalar("zero".into()),
            StealthError::StealthAddressMismatch {
                expected: "a".into(),
                derived: "b".into(),
            },
            StealthError::EntropyError("rng".into()),
        ];
        let kinds: Vec<ErrorKind> = errors.iter().map(StealthError::kind).collect();

        assert_eq!(
            kinds,
            vec![
                ErrorKind::Format,
                ErrorKind::Curve,
                ErrorKind::Consistency,
                ErrorKind::Entropy
            ]
        );
        // Exactly one kind is fatal and exactly one is recoverable
        assert_eq!(errors.iter().filter(|e| e.is_fatal()).count(), 1);
        assert_eq!(errors.iter().filter(|e| e.is_recoverable()).count(), 1);
    }

    #[test]
    fn test_hex_error_conversion() {
        let result: Result<Vec<u8>> = hex::decode("zz").map_err(StealthError::from);
        assert!(matches!(result, Err(StealthError::HexError(_))));
        assert!(result.unwrap_err().is_recoverable());
    }
}
