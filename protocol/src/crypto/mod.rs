//! # Cryptographic Primitives
//!
//! The transaction pipeline needs exactly one primitive of its own: the
//! Blake2b-256 content hash behind transaction IDs and metadata hashes.
//! Signatures are produced by an external signer (see
//! [`crate::transaction::signing`]) and are never verified here.

pub mod hash;

pub use hash::{blake2b_256, blake2b_256_hex};
