//! ECDSA key management
//!
//! Provides key pair generation and signing using the secp256k1
//! elliptic curve. Signing is treated as an opaque operation over a
//! 32-byte digest; signature verification is out of scope for this
//! tool and lives with the node that receives the transaction.

use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

use crate::core::Address;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid digest: expected 32 bytes")]
    InvalidDigest,
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// The capability to contribute one partial signature.
///
/// Every coordinator and handler call takes the signer explicitly;
/// there is no process-wide default signer.
pub trait Signer {
    /// The signer's public key (compressed form when serialized)
    fn public_key(&self) -> PublicKey;

    /// Address derived from the public key's script hash
    fn address(&self) -> Address;

    /// Sign a 32-byte digest, returning the raw signature bytes
    fn sign(&self, digest: &[u8; 32]) -> Result<Vec<u8>, KeyError>;
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Get the private key as a hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Get the public key as a hex string (compressed format)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }
}

impl Signer for KeyPair {
    fn public_key(&self) -> PublicKey {
        self.public_key
    }

    fn address(&self) -> Address {
        Address::from_pub_key(&self.public_key)
    }

    fn sign(&self, digest: &[u8; 32]) -> Result<Vec<u8>, KeyError> {
        sign_message(&self.secret_key, digest)
    }
}

/// Sign a 32-byte message digest with a secret key
///
/// Returns the 64-byte compact signature encoding.
pub fn sign_message(secret_key: &SecretKey, digest: &[u8; 32]) -> Result<Vec<u8>, KeyError> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(digest).map_err(|_| KeyError::InvalidDigest)?;
    let signature = secp.sign_ecdsa(&message, secret_key);
    Ok(signature.serialize_compact().to_vec())
}

/// Parse a public key from hex string
pub fn public_key_from_hex(hex_key: &str) -> Result<PublicKey, KeyError> {
    let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPublicKey)?;
    PublicKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPublicKey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::double_sha256;

    #[test]
    fn test_key_pair_generation() {
        let kp = KeyPair::generate();
        assert!(!kp.private_key_hex().is_empty());
        assert_eq!(kp.public_key.serialize().len(), 33);
    }

    #[test]
    fn test_key_pair_from_hex() {
        let kp1 = KeyPair::generate();
        let private_hex = kp1.private_key_hex();

        let kp2 = KeyPair::from_private_key_hex(&private_hex).unwrap();
        assert_eq!(kp1.public_key_hex(), kp2.public_key_hex());
        assert_eq!(kp1.address(), kp2.address());
    }

    #[test]
    fn test_sign_produces_compact_signature() {
        let kp = KeyPair::generate();
        let digest = double_sha256(b"payload");

        let signature = kp.sign(&digest).unwrap();
        assert_eq!(signature.len(), 64);
    }

    #[test]
    fn test_public_key_from_hex() {
        let kp = KeyPair::generate();
        let pk = public_key_from_hex(&kp.public_key_hex()).unwrap();
        assert_eq!(pk, kp.public_key);

        assert!(public_key_from_hex("zzzz").is_err());
        assert!(public_key_from_hex("0011").is_err());
    }
}
