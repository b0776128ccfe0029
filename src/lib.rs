//! txsign: a command-driven multi-signature transaction signing tool
//!
//! This crate builds a transfer transaction addressed to an M-of-N
//! multi-signature account and sequentially collects one partial
//! signature per private key until the transaction carries the full
//! signer set. It provides:
//! - The canonical binary codec for transactions
//! - The native-contract argument codec (var-uints, addresses)
//! - Multisig address derivation with the `(5N + 6) / 7` threshold rule
//! - Order-preserving signature aggregation
//! - A sequential signing coordinator with a type-level payer rule
//!
//! # Example
//!
//! ```rust
//! use txsign::contract::{build_transfer, Asset};
//! use txsign::crypto::{KeyPair, Signer};
//! use txsign::multisig::SigningCoordinator;
//!
//! let keys: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();
//! let signers: Vec<&dyn Signer> = keys.iter().map(|k| k as &dyn Signer).collect();
//! let coordinator = SigningCoordinator::new(signers).unwrap();
//!
//! // Transfer out of the multisig account; payer defaults to the
//! // first signer during the run.
//! let to = keys[0].address();
//! let tx = build_transfer(Asset::Zpt, coordinator.account(), to, 100, 1, 20_000, 1);
//! let signed_hex = coordinator.run(&tx.to_hex()).unwrap();
//! assert!(!signed_hex.is_empty());
//! ```

pub mod cli;
pub mod contract;
pub mod core;
pub mod crypto;
pub mod multisig;
pub mod service;
pub mod wallet;

// Re-export commonly used types
pub use contract::{build_transfer, Asset, TransferPayload};
pub use core::{Address, DecodeError, SigEntry, Transaction, TxType};
pub use crypto::{KeyPair, Signer};
pub use multisig::{CoordinatorError, MultisigError, SigningCoordinator};
pub use service::{CliRpcRequest, CliRpcResponse};
pub use wallet::{BatchConfig, Wallet};
