//! Multisig account address derivation
//!
//! An M-of-N account address is a deterministic, order-sensitive
//! function of the supplied public keys: the keys are hashed exactly
//! as given, never resorted, so every participant must supply them in
//! the same agreed order or they will derive different addresses.

use secp256k1::PublicKey;
use thiserror::Error;

use crate::core::address::Address;
use crate::core::serialization::ByteWriter;

/// Most keys a multisig account may carry
pub const MAX_MULTISIG_KEYS: usize = 1024;

/// Errors deriving a multisig address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultisigError {
    #[error("Empty key set: a multisig account needs at least one key")]
    EmptyKeySet,
    #[error("Too many keys: {0} exceeds the limit of {MAX_MULTISIG_KEYS}")]
    TooManyKeys(usize),
    #[error("Signer is not part of the configured key set")]
    UnknownSigner,
    #[error("Invalid threshold {m} for {n} keys")]
    InvalidThreshold { m: u16, n: usize },
    #[error("Signature set already complete")]
    AlreadyComplete,
    #[error("Existing signature entry does not match the configured key set")]
    KeySetMismatch,
}

/// Signing threshold for an N-key account: `M = (5 * N + 6) / 7`
///
/// The platform's supermajority rule in integer arithmetic; for
/// N = 1..7 this yields 1, 2, 3, 3, 4, 5, 5.
pub fn threshold_for(n: usize) -> u16 {
    ((5 * n + 6) / 7) as u16
}

/// Derive the account address and threshold for an ordered key set
pub fn derive(pub_keys: &[PublicKey]) -> Result<(Address, u16), MultisigError> {
    if pub_keys.is_empty() {
        return Err(MultisigError::EmptyKeySet);
    }
    if pub_keys.len() > MAX_MULTISIG_KEYS {
        return Err(MultisigError::TooManyKeys(pub_keys.len()));
    }

    let m = threshold_for(pub_keys.len());
    Ok((address_for(pub_keys, m), m))
}

/// Address for an explicit key set and threshold
///
/// Hashes the multisig program: threshold, key count, then each key in
/// supplied order.
pub fn address_for(pub_keys: &[PublicKey], m: u16) -> Address {
    let mut program = ByteWriter::new();
    program.put_var_uint(m as u64);
    program.put_var_uint(pub_keys.len() as u64);
    for key in pub_keys {
        program.put_var_bytes(&key.serialize());
    }
    Address::from_script(&program.into_bytes())
}
