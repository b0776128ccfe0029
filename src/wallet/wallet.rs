//! Wallet files
//!
//! A wallet file binds one private key to its account address. The
//! signing core never touches the storage format; it only consumes the
//! derived public key and the signing capability.

use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::address::{Address, AddressError};
use crate::crypto::keys::{KeyError, KeyPair, Signer};

/// Wallet-related errors
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
    #[error("Address error: {0}")]
    AddressError(#[from] AddressError),
    #[error("Wallet {path} does not hold the expected address {expected} (derived {actual})")]
    AddressMismatch {
        path: String,
        expected: String,
        actual: String,
    },
}

/// Serializable wallet data for persistence
#[derive(Debug, Serialize, Deserialize)]
struct WalletData {
    private_key_hex: String,
    address: String,
    label: Option<String>,
}

/// A wallet holding one signing key
pub struct Wallet {
    key_pair: KeyPair,
    pub label: Option<String>,
}

impl Wallet {
    /// Create a new wallet with a fresh key pair
    pub fn new() -> Self {
        Self {
            key_pair: KeyPair::generate(),
            label: None,
        }
    }

    /// Create a wallet with a label
    pub fn with_label(label: &str) -> Self {
        Self {
            key_pair: KeyPair::generate(),
            label: Some(label.to_string()),
        }
    }

    /// Import a wallet from a private key
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, WalletError> {
        let key_pair = KeyPair::from_private_key_hex(private_key_hex)?;
        Ok(Self {
            key_pair,
            label: None,
        })
    }

    /// The wallet's account address
    pub fn address(&self) -> Address {
        Signer::address(&self.key_pair)
    }

    /// The wallet's public key (hex, compressed)
    pub fn public_key_hex(&self) -> String {
        self.key_pair.public_key_hex()
    }

    /// Save wallet to file
    pub fn save(&self, path: &Path) -> Result<(), WalletError> {
        let data = WalletData {
            private_key_hex: self.key_pair.private_key_hex(),
            address: self.address().to_base58(),
            label: self.label.clone(),
        };

        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load wallet from file, cross-checking the stored address
    /// against the one derived from the key
    pub fn load(path: &Path) -> Result<Self, WalletError> {
        let json = fs::read_to_string(path)?;
        let data: WalletData = serde_json::from_str(&json)?;

        let mut wallet = Self::from_private_key(&data.private_key_hex)?;
        wallet.label = data.label;

        let stored = Address::from_base58(&data.address)?;
        if stored != wallet.address() {
            return Err(WalletError::AddressMismatch {
                path: path.display().to_string(),
                expected: data.address,
                actual: wallet.address().to_base58(),
            });
        }
        Ok(wallet)
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}

impl Signer for Wallet {
    fn public_key(&self) -> PublicKey {
        self.key_pair.public_key
    }

    fn address(&self) -> Address {
        Wallet::address(self)
    }

    fn sign(&self, digest: &[u8; 32]) -> Result<Vec<u8>, KeyError> {
        self.key_pair.sign(digest)
    }
}
