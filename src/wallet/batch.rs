//! Batch signing configuration
//!
//! An ordered list of wallet entries plus the transfer parameters for
//! one multisig signing run. Order matters twice over: it fixes the
//! derived multisig address and the positional alignment of the
//! collected signatures.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::address::Address;
use crate::wallet::wallet::{Wallet, WalletError};

/// One key-holder entry in the batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchWallet {
    /// Path to the wallet file
    pub path: PathBuf,
    /// Credential for the key store backend; unused by the plain JSON
    /// backend but kept in the schema for encrypted stores
    #[serde(default)]
    pub password: Option<String>,
    /// Expected account address (Base58Check), checked after load
    pub address: String,
}

/// Batch configuration for one signing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Native asset name (e.g. "zpt", "gala")
    pub asset: String,
    pub amount: u64,
    #[serde(default)]
    pub gas_price: u64,
    #[serde(default)]
    pub gas_limit: u64,
    /// Key-holders in the agreed signing order
    pub wallet: Vec<BatchWallet>,
}

impl BatchConfig {
    /// Load a batch configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, WalletError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Open every configured wallet, in order, verifying each against
    /// its expected address
    pub fn open_wallets(&self) -> Result<Vec<Wallet>, WalletError> {
        let mut wallets = Vec::with_capacity(self.wallet.len());
        for entry in &self.wallet {
            let wallet = Wallet::load(&entry.path)?;
            let expected = Address::from_base58(&entry.address)?;
            if wallet.address() != expected {
                return Err(WalletError::AddressMismatch {
                    path: entry.path.display().to_string(),
                    expected: entry.address.clone(),
                    actual: wallet.address().to_base58(),
                });
            }
            wallets.push(wallet);
        }
        Ok(wallets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_batch(dir: &Path, n: usize) -> (PathBuf, Vec<Address>) {
        let mut entries = Vec::new();
        let mut addresses = Vec::new();
        for i in 0..n {
            let wallet = Wallet::new();
            let path = dir.join(format!("w{i}.json"));
            wallet.save(&path).unwrap();
            addresses.push(wallet.address());
            entries.push(BatchWallet {
                path,
                password: None,
                address: wallet.address().to_base58(),
            });
        }

        let config = BatchConfig {
            asset: "gala".to_string(),
            amount: 100,
            gas_price: 1,
            gas_limit: 20_000,
            wallet: entries,
        };
        let path = dir.join("batch.json");
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        (path, addresses)
    }

    #[test]
    fn test_load_and_open_in_order() {
        let dir = tempdir().unwrap();
        let (path, addresses) = write_batch(dir.path(), 3);

        let config = BatchConfig::load(&path).unwrap();
        assert_eq!(config.asset, "gala");

        let wallets = config.open_wallets().unwrap();
        let opened: Vec<Address> = wallets.iter().map(|w| w.address()).collect();
        assert_eq!(opened, addresses);
    }

    #[test]
    fn test_open_rejects_wrong_expected_address() {
        let dir = tempdir().unwrap();
        let (path, _) = write_batch(dir.path(), 2);

        let mut config = BatchConfig::load(&path).unwrap();
        config.wallet[1].address = Wallet::new().address().to_base58();

        assert!(matches!(
            config.open_wallets(),
            Err(WalletError::AddressMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_wallet_file() {
        let dir = tempdir().unwrap();
        let (path, _) = write_batch(dir.path(), 1);

        let mut config = BatchConfig::load(&path).unwrap();
        config.wallet[0].path = dir.path().join("missing.json");
        assert!(matches!(
            config.open_wallets(),
            Err(WalletError::IoError(_))
        ));
    }
}
