//! Error types for transaction construction, signing and decoding.
//!
//! Every fallible operation in this crate returns a [`TxError`]. Wire-format
//! problems carry the more specific [`DecodeError`] inside
//! [`TxError::Decoding`].

use thiserror::Error;

pub use crate::codec::DecodeError;

/// Errors that can occur while building, balancing, signing or decoding a
/// transaction.
#[derive(Debug, Error)]
pub enum TxError {
    /// The input bytes (or hex) are not a well-formed encoding of the
    /// requested type.
    #[error("decoding failed: {0}")]
    Decoding(#[from] DecodeError),

    /// The selected inputs cannot cover the outputs plus the minimum fee.
    /// The caller should select more inputs and try again.
    #[error("insufficient input: got {available}, need at least {required}")]
    InsufficientFunds {
        /// Sum of the selected input amounts.
        available: u64,
        /// Sum of the outputs plus the minimum fee.
        required: u64,
    },

    /// Public key, signature and input counts disagree.
    #[error("witness count mismatch ({context}): expected {expected}, got {found}")]
    WitnessCountMismatch {
        /// Which pair of counts disagreed.
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// A signature is not exactly [`crate::config::SIGNATURE_LENGTH`] bytes.
    #[error("invalid signature length at position {index}: {length} bytes")]
    InvalidSignatureLength { index: usize, length: usize },

    /// The injected clock reads a time the slot configuration cannot map.
    #[error("clock error: {0}")]
    Clock(String),

    /// Injected network configuration could not be parsed or is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Summing amounts overflowed `u64`.
    #[error("amount overflow while summing {0}")]
    AmountOverflow(&'static str),

    /// A transaction ID string is not 64 hex characters.
    #[error("invalid transaction id: {0}")]
    InvalidTransactionId(String),

    /// The builder was asked to build without a required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TxError>;
