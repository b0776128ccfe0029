//! M-of-N threshold signature support
//!
//! Provides multisig account address derivation, signature
//! aggregation, and the sequential signing coordinator.
//!
//! # Example
//!
//! ```ignore
//! use txsign::multisig::SigningCoordinator;
//!
//! // Signers in the agreed order; the account address and threshold
//! // are derived from their public keys.
//! let coordinator = SigningCoordinator::new(signers)?;
//! let signed_hex = coordinator.run(&raw_tx_hex)?;
//! ```

pub mod address;
pub mod aggregator;
pub mod coordinator;

pub use address::{address_for, derive, threshold_for, MultisigError, MAX_MULTISIG_KEYS};
pub use aggregator::{append_multi_signature, append_signature};
pub use coordinator::{
    sign_once, CoordinatorError, DraftTransaction, ResolvedTransaction, SigningCoordinator,
};
