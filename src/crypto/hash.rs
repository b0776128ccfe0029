//! Cryptographic hashing utilities
//!
//! Provides the SHA-256 based hashing functions used for transaction
//! signing hashes and address derivation.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes double SHA-256 hash (SHA-256 of SHA-256)
///
/// Used for the transaction signing hash.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&sha256(&sha256(data)));
    out
}
