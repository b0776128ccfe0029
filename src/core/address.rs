//! Account addresses
//!
//! A 20-byte account identifier, derived either from a single public
//! key's script hash or from a multisig key set. The all-zero value is
//! the explicit "unset" sentinel used for a transaction payer that has
//! not been finalized yet.

use ripemd::Ripemd160;
use secp256k1::PublicKey;
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

use crate::crypto::hash::sha256;

/// Length of an address in bytes
pub const ADDR_LEN: usize = 20;

/// Version byte prepended before Base58Check encoding
const ADDR_VERSION: u8 = 0x17;

/// Address-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address length: expected {ADDR_LEN} bytes, got {0}")]
    InvalidLength(usize),
    #[error("Invalid base58 encoding")]
    InvalidBase58,
    #[error("Base58 checksum mismatch")]
    ChecksumMismatch,
}

/// A fixed-size 20-byte account identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address(pub [u8; ADDR_LEN]);

impl Address {
    /// The all-zero sentinel denoting "unset"
    pub const ZERO: Address = Address([0u8; ADDR_LEN]);

    /// Whether this address is the unset sentinel
    ///
    /// A transaction payer equal to `Address::ZERO` must be defaulted
    /// before its signing hash is computed.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Derive an address from a single public key's script hash:
    /// `RIPEMD160(SHA256(serialized key))`
    pub fn from_pub_key(public_key: &PublicKey) -> Self {
        Self::from_script(&public_key.serialize())
    }

    /// Derive an address by hashing arbitrary script bytes
    pub fn from_script(script: &[u8]) -> Self {
        let sha = sha256(script);
        let mut ripemd = Ripemd160::new();
        ripemd.update(&sha);
        let hash = ripemd.finalize();

        let mut bytes = [0u8; ADDR_LEN];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Parse an address from a raw byte slice
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != ADDR_LEN {
            return Err(AddressError::InvalidLength(bytes.len()));
        }
        let mut out = [0u8; ADDR_LEN];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Raw address bytes
    pub fn as_bytes(&self) -> &[u8; ADDR_LEN] {
        &self.0
    }

    /// Render as a Base58Check string: version byte, the 20 address
    /// bytes, then the first 4 bytes of a double SHA-256 checksum
    pub fn to_base58(&self) -> String {
        let mut data = vec![ADDR_VERSION];
        data.extend_from_slice(&self.0);

        let checksum = {
            let first = Sha256::digest(&data);
            let second = Sha256::digest(first);
            second[..4].to_vec()
        };
        data.extend_from_slice(&checksum);

        bs58::encode(data).into_string()
    }

    /// Parse a Base58Check string produced by [`Address::to_base58`]
    pub fn from_base58(s: &str) -> Result<Self, AddressError> {
        let data = bs58::decode(s)
            .into_vec()
            .map_err(|_| AddressError::InvalidBase58)?;
        if data.len() != 1 + ADDR_LEN + 4 {
            return Err(AddressError::InvalidLength(data.len()));
        }

        let (payload, checksum) = data.split_at(1 + ADDR_LEN);
        let expected = {
            let first = Sha256::digest(payload);
            let second = Sha256::digest(first);
            second[..4].to_vec()
        };
        if checksum != expected {
            return Err(AddressError::ChecksumMismatch);
        }

        Self::from_bytes(&payload[1..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    #[test]
    fn test_zero_sentinel() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());

        let kp = KeyPair::generate();
        assert!(!Address::from_pub_key(&kp.public_key).is_zero());
    }

    #[test]
    fn test_from_pub_key_deterministic() {
        let kp = KeyPair::generate();
        let a = Address::from_pub_key(&kp.public_key);
        let b = Address::from_pub_key(&kp.public_key);
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_bytes_length_check() {
        assert!(Address::from_bytes(&[0u8; 20]).is_ok());
        assert_eq!(
            Address::from_bytes(&[0u8; 19]),
            Err(AddressError::InvalidLength(19))
        );
        assert_eq!(
            Address::from_bytes(&[0u8; 21]),
            Err(AddressError::InvalidLength(21))
        );
    }

    #[test]
    fn test_base58_round_trip() {
        let kp = KeyPair::generate();
        let addr = Address::from_pub_key(&kp.public_key);

        let encoded = addr.to_base58();
        let decoded = Address::from_base58(&encoded).unwrap();
        assert_eq!(addr, decoded);
    }

    #[test]
    fn test_base58_rejects_corruption() {
        let addr = Address::from_pub_key(&KeyPair::generate().public_key);
        let mut encoded = addr.to_base58();

        // Flip the last character to something else valid in base58
        let last = encoded.pop().unwrap();
        encoded.push(if last == '2' { '3' } else { '2' });

        assert!(Address::from_base58(&encoded).is_err());
        assert!(Address::from_base58("not base58 0OIl").is_err());
    }
}
