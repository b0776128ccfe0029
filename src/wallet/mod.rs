//! Wallet files and batch signing configuration

pub mod batch;
pub mod wallet;

pub use batch::{BatchConfig, BatchWallet};
pub use wallet::{Wallet, WalletError};
