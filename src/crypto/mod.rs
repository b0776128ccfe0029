//! Cryptographic utilities
//!
//! This module provides:
//! - SHA-256 hashing
//! - ECDSA key management (secp256k1)
//! - The `Signer` capability used by the coordinator and handlers

pub mod hash;
pub mod keys;

pub use hash::{double_sha256, sha256};
pub use keys::{public_key_from_hex, sign_message, KeyError, KeyPair, Signer};
