//! # Hashing Utilities
//!
//! Blake2b with a 256-bit output is the ledger's content hash: a
//! transaction ID is `blake2b_256(cbor(body))` and a metadata hash is
//! `blake2b_256(cbor(metadata))`. Nothing else in the crate hashes.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

use crate::config::HASH_LENGTH;

type Blake2b256 = Blake2b<U32>;

/// Compute the Blake2b-256 digest of `data`.
///
/// # Example
///
/// ```
/// use shelley_tx::crypto::blake2b_256;
///
/// let digest = blake2b_256(b"shelley");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn blake2b_256(data: &[u8]) -> [u8; HASH_LENGTH] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; HASH_LENGTH];
    output.copy_from_slice(&result);
    output
}

/// Blake2b-256 digest rendered as lowercase hex.
pub fn blake2b_256_hex(data: &[u8]) -> String {
    hex::encode(blake2b_256(data))
}
