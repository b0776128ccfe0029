//! Sequential signing coordination
//!
//! Runs one shared raw transaction through N key-holders, one partial
//! signature per round. The payer-default rule is applied before the
//! first signing hash is computed and is made type-level here: only a
//! [`ResolvedTransaction`] exposes the signing hash, and the only way
//! to obtain one is through [`DraftTransaction::resolve_payer`].
//!
//! The run is strictly sequential by construction. Each round consumes
//! the exact hex output of the previous round (the signature list
//! changes the serialized length but not the signing hash), so rounds
//! cannot be reordered or parallelized. Any failure aborts the whole
//! run; later signers are never invoked and no partial result is
//! emitted.

use log::{debug, info};
use secp256k1::PublicKey;
use thiserror::Error;

use crate::core::address::Address;
use crate::core::transaction::{Transaction, TxHexError};
use crate::crypto::keys::{KeyError, Signer};
use crate::multisig::address::{derive, MultisigError};
use crate::multisig::aggregator::{append_multi_signature, append_signature};

/// Errors aborting a signing run
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Invalid raw transaction: {0}")]
    Tx(#[from] TxHexError),
    #[error(transparent)]
    Multisig(#[from] MultisigError),
    #[error("Signer {index} failed: {source}")]
    SignerFailed { index: usize, source: KeyError },
}

/// A decoded transaction whose payer may still be unset
pub struct DraftTransaction(Transaction);

impl DraftTransaction {
    pub fn new(tx: Transaction) -> Self {
        Self(tx)
    }

    /// Decode a draft from the hex boundary
    pub fn from_hex(s: &str) -> Result<Self, TxHexError> {
        Ok(Self(Transaction::from_hex(s)?))
    }

    /// Finalize the payer: if it is the zero sentinel, set it to
    /// `default_payer`; otherwise leave it unchanged.
    ///
    /// This is the only path to a [`ResolvedTransaction`], so a draft
    /// can never be hashed for signing with an unset payer.
    pub fn resolve_payer(mut self, default_payer: Address) -> ResolvedTransaction {
        if self.0.payer.is_zero() {
            debug!("Defaulting payer to {default_payer}");
            self.0.payer = default_payer;
        }
        ResolvedTransaction(self.0)
    }
}

/// A transaction whose payer has been finalized and may be hashed
pub struct ResolvedTransaction(Transaction);

impl ResolvedTransaction {
    /// The digest each key-holder signs
    pub fn signing_hash(&self) -> [u8; 32] {
        self.0.signing_hash()
    }

    pub fn payer(&self) -> Address {
        self.0.payer
    }

    /// Record a 1-of-1 signature entry
    pub fn append_signature(&mut self, pub_key: PublicKey, signature: Vec<u8>) {
        append_signature(&mut self.0, pub_key, signature);
    }

    /// Record one partial signature toward an M-of-N group
    pub fn append_multi_signature(
        &mut self,
        pub_keys: &[PublicKey],
        m: u16,
        signature: Vec<u8>,
    ) -> Result<(), MultisigError> {
        append_multi_signature(&mut self.0, pub_keys, m, signature)
    }

    /// Re-serialize to the hex boundary for the next round
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

/// Drives N explicit signers over one shared raw transaction
pub struct SigningCoordinator<'a> {
    pub_keys: Vec<PublicKey>,
    m: u16,
    account: Address,
    signers: Vec<&'a dyn Signer>,
}

impl<'a> SigningCoordinator<'a> {
    /// Build a coordinator over an ordered signer list
    ///
    /// The multisig account address and threshold are derived once, up
    /// front, from the signers' public keys in the given order.
    pub fn new(signers: Vec<&'a dyn Signer>) -> Result<Self, MultisigError> {
        let pub_keys: Vec<PublicKey> = signers.iter().map(|s| s.public_key()).collect();
        let (account, m) = derive(&pub_keys)?;
        Ok(Self {
            pub_keys,
            m,
            account,
            signers,
        })
    }

    /// The derived M-of-N account address
    pub fn account(&self) -> Address {
        self.account
    }

    /// The derived signing threshold M
    pub fn threshold(&self) -> u16 {
        self.m
    }

    /// Number of configured signers N
    pub fn signer_count(&self) -> usize {
        self.signers.len()
    }

    /// Collect one partial signature from every configured signer
    ///
    /// Takes the raw transaction as hex, returns the fully signed
    /// transaction as hex. An unset payer defaults to the first
    /// signer's address before the first hash is taken; every later
    /// round re-decodes a transaction that already carries that payer,
    /// so the resolution happens exactly once.
    pub fn run(&self, raw_tx: &str) -> Result<String, CoordinatorError> {
        let default_payer = self.signers[0].address();
        let mut current = raw_tx.to_string();

        for (index, signer) in self.signers.iter().enumerate() {
            let draft = DraftTransaction::from_hex(&current)?;
            let mut resolved = draft.resolve_payer(default_payer);

            let hash = resolved.signing_hash();
            let signature = signer
                .sign(&hash)
                .map_err(|source| CoordinatorError::SignerFailed { index, source })?;
            resolved.append_multi_signature(&self.pub_keys, self.m, signature)?;

            current = resolved.to_hex();
            info!(
                "Signer {}/{} contributed ({} bytes signed tx)",
                index + 1,
                self.signers.len(),
                current.len() / 2
            );
        }

        Ok(current)
    }
}

/// One single-signer round over a raw transaction
///
/// Decode, default the payer to the signer's own address if unset,
/// sign, append a 1-of-1 entry, re-encode.
pub fn sign_once(raw_tx: &str, signer: &dyn Signer) -> Result<String, CoordinatorError> {
    let draft = DraftTransaction::from_hex(raw_tx)?;
    let mut resolved = draft.resolve_payer(signer.address());

    let hash = resolved.signing_hash();
    let signature = signer
        .sign(&hash)
        .map_err(|source| CoordinatorError::SignerFailed { index: 0, source })?;
    resolved.append_signature(signer.public_key(), signature);

    Ok(resolved.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::transfer::{build_transfer, Asset};
    use crate::crypto::KeyPair;
    use std::cell::Cell;

    fn draft_transfer(to: Address) -> Transaction {
        build_transfer(Asset::Zpt, Address::ZERO, to, 1_000, 1, 20_000, 9)
    }

    /// Signer that fails on demand and counts invocations
    struct CountingSigner {
        inner: KeyPair,
        calls: Cell<usize>,
        fail: bool,
    }

    impl CountingSigner {
        fn new(fail: bool) -> Self {
            Self {
                inner: KeyPair::generate(),
                calls: Cell::new(0),
                fail,
            }
        }
    }

    impl Signer for CountingSigner {
        fn public_key(&self) -> PublicKey {
            self.inner.public_key
        }

        fn address(&self) -> Address {
            Signer::address(&self.inner)
        }

        fn sign(&self, digest: &[u8; 32]) -> Result<Vec<u8>, KeyError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(KeyError::InvalidPrivateKey);
            }
            self.inner.sign(digest)
        }
    }

    #[test]
    fn test_resolve_payer_defaults_only_when_zero() {
        let kp = KeyPair::generate();
        let fixed = KeyPair::generate().address();

        let mut tx = draft_transfer(fixed);
        tx.payer = fixed;
        let resolved = DraftTransaction::new(tx).resolve_payer(kp.address());
        assert_eq!(resolved.payer(), fixed);

        let resolved = DraftTransaction::new(draft_transfer(fixed)).resolve_payer(kp.address());
        assert_eq!(resolved.payer(), kp.address());
    }

    #[test]
    fn test_full_run_seven_signers() {
        let signers: Vec<CountingSigner> = (0..7).map(|_| CountingSigner::new(false)).collect();
        let refs: Vec<&dyn Signer> = signers.iter().map(|s| s as &dyn Signer).collect();
        let coordinator = SigningCoordinator::new(refs).unwrap();
        assert_eq!(coordinator.threshold(), 5);

        let raw = draft_transfer(KeyPair::generate().address()).to_hex();
        let signed_hex = coordinator.run(&raw).unwrap();

        let signed = Transaction::from_hex(&signed_hex).unwrap();
        assert_eq!(signed.sigs.len(), 1);
        assert_eq!(signed.sigs[0].pub_keys.len(), 7);
        assert_eq!(signed.sigs[0].m, 5);
        assert_eq!(signed.sigs[0].sig_data.len(), 7);
        // Keys in submission order
        for (i, signer) in signers.iter().enumerate() {
            assert_eq!(signed.sigs[0].pub_keys[i], signer.public_key());
            assert_eq!(signer.calls.get(), 1);
        }
        // Payer defaulted to the first signer
        assert_eq!(signed.payer, signers[0].address());
    }

    #[test]
    fn test_payer_stable_across_rounds() {
        let signers: Vec<CountingSigner> = (0..3).map(|_| CountingSigner::new(false)).collect();
        let refs: Vec<&dyn Signer> = signers.iter().map(|s| s as &dyn Signer).collect();
        let coordinator = SigningCoordinator::new(refs).unwrap();

        let raw = draft_transfer(KeyPair::generate().address()).to_hex();
        let signed = Transaction::from_hex(&coordinator.run(&raw).unwrap()).unwrap();

        // Every signature verifies positionally against the same hash:
        // the payer written in round 0 survived re-serialization, so
        // all rounds hashed the same unsigned prefix.
        let expected_hash = signed.signing_hash();
        let secp = secp256k1::Secp256k1::new();
        let message = secp256k1::Message::from_digest_slice(&expected_hash).unwrap();
        for (i, signer) in signers.iter().enumerate() {
            let sig =
                secp256k1::ecdsa::Signature::from_compact(&signed.sigs[0].sig_data[i]).unwrap();
            assert!(secp
                .verify_ecdsa(&message, &sig, &signer.public_key())
                .is_ok());
        }
    }

    #[test]
    fn test_failure_stops_later_signers() {
        let signers: Vec<CountingSigner> = (0..7)
            .map(|i| CountingSigner::new(i == 3))
            .collect();
        let refs: Vec<&dyn Signer> = signers.iter().map(|s| s as &dyn Signer).collect();
        let coordinator = SigningCoordinator::new(refs).unwrap();

        let raw = draft_transfer(KeyPair::generate().address()).to_hex();
        let err = coordinator.run(&raw).unwrap_err();
        assert!(matches!(
            err,
            CoordinatorError::SignerFailed { index: 3, .. }
        ));

        for (i, signer) in signers.iter().enumerate() {
            let expected = if i <= 3 { 1 } else { 0 };
            assert_eq!(signer.calls.get(), expected, "signer {i}");
        }
    }

    #[test]
    fn test_run_rejects_bad_hex() {
        let signer = CountingSigner::new(false);
        let coordinator = SigningCoordinator::new(vec![&signer]).unwrap();

        assert!(matches!(
            coordinator.run("zz"),
            Err(CoordinatorError::Tx(TxHexError::InvalidHex))
        ));
        assert_eq!(signer.calls.get(), 0);
    }

    #[test]
    fn test_sign_once() {
        let kp = KeyPair::generate();
        let raw = draft_transfer(KeyPair::generate().address()).to_hex();

        let signed = Transaction::from_hex(&sign_once(&raw, &kp).unwrap()).unwrap();
        assert_eq!(signed.sigs.len(), 1);
        assert_eq!(signed.sigs[0].m, 1);
        assert_eq!(signed.sigs[0].pub_keys, vec![kp.public_key]);
        assert_eq!(signed.payer, Signer::address(&kp));
    }
}
