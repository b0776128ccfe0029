//! Signature aggregation
//!
//! Appends one signer's partial signature to a transaction's signature
//! list. Prior entries are never removed or reordered; signatures
//! accumulate in submission order, which must match the order the
//! key-holders were configured in.

use secp256k1::PublicKey;

use crate::core::transaction::{SigEntry, Transaction};
use crate::multisig::address::MultisigError;

/// Append a single-signer signature as its own entry
///
/// Each call records one 1-of-1 group: `{ [pub_key], m: 1, [sig] }`.
pub fn append_signature(tx: &mut Transaction, pub_key: PublicKey, signature: Vec<u8>) {
    tx.sigs.push(SigEntry {
        pub_keys: vec![pub_key],
        m: 1,
        sig_data: vec![signature],
    });
}

/// Append one partial signature toward an M-of-N group
///
/// The first call creates the group entry carrying the full ordered
/// key set and threshold; every later call locates that entry and
/// appends the signature to it. Fails if the transaction already
/// carries a group with a different key set or threshold, or if the
/// group is already complete.
pub fn append_multi_signature(
    tx: &mut Transaction,
    pub_keys: &[PublicKey],
    m: u16,
    signature: Vec<u8>,
) -> Result<(), MultisigError> {
    if pub_keys.is_empty() {
        return Err(MultisigError::EmptyKeySet);
    }
    if m == 0 || m as usize > pub_keys.len() {
        return Err(MultisigError::InvalidThreshold {
            m,
            n: pub_keys.len(),
        });
    }

    if tx.sigs.is_empty() {
        tx.sigs.push(SigEntry {
            pub_keys: pub_keys.to_vec(),
            m,
            sig_data: vec![signature],
        });
        return Ok(());
    }

    let entry = tx
        .sigs
        .iter_mut()
        .find(|e| e.pub_keys == pub_keys && e.m == m)
        .ok_or(MultisigError::KeySetMismatch)?;
    if entry.is_full() {
        return Err(MultisigError::AlreadyComplete);
    }
    entry.sig_data.push(signature);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::Transaction;
    use crate::crypto::KeyPair;

    fn empty_tx() -> Transaction {
        Transaction::invoke(1, 0, 0, vec![0x00])
    }

    fn gen_keys(n: usize) -> Vec<PublicKey> {
        (0..n).map(|_| KeyPair::generate().public_key).collect()
    }

    #[test]
    fn test_single_signature_entry() {
        let mut tx = empty_tx();
        let key = gen_keys(1)[0];

        append_signature(&mut tx, key, vec![1u8; 64]);
        assert_eq!(tx.sigs.len(), 1);
        assert_eq!(tx.sigs[0].pub_keys, vec![key]);
        assert_eq!(tx.sigs[0].m, 1);
        assert_eq!(tx.sigs[0].sig_data.len(), 1);
    }

    #[test]
    fn test_single_signatures_accumulate() {
        let mut tx = empty_tx();
        let keys = gen_keys(2);

        append_signature(&mut tx, keys[0], vec![1u8; 64]);
        append_signature(&mut tx, keys[1], vec![2u8; 64]);
        assert_eq!(tx.sigs.len(), 2);
        // Prior entry untouched
        assert_eq!(tx.sigs[0].pub_keys, vec![keys[0]]);
    }

    #[test]
    fn test_multi_signature_grows_one_entry() {
        let mut tx = empty_tx();
        let keys = gen_keys(3);

        for (i, sig_byte) in [1u8, 2, 3].iter().enumerate() {
            append_multi_signature(&mut tx, &keys, 2, vec![*sig_byte; 64]).unwrap();
            assert_eq!(tx.sigs.len(), 1);
            assert_eq!(tx.sigs[0].sig_data.len(), i + 1);
        }

        assert_eq!(tx.sigs[0].pub_keys, keys);
        assert_eq!(tx.sigs[0].m, 2);
        // Submission order preserved
        assert_eq!(tx.sigs[0].sig_data[0], vec![1u8; 64]);
        assert_eq!(tx.sigs[0].sig_data[2], vec![3u8; 64]);
    }

    #[test]
    fn test_multi_signature_full_rejected() {
        let mut tx = empty_tx();
        let keys = gen_keys(2);

        append_multi_signature(&mut tx, &keys, 2, vec![1u8; 64]).unwrap();
        append_multi_signature(&mut tx, &keys, 2, vec![2u8; 64]).unwrap();
        assert_eq!(
            append_multi_signature(&mut tx, &keys, 2, vec![3u8; 64]),
            Err(MultisigError::AlreadyComplete)
        );
    }

    #[test]
    fn test_multi_signature_key_set_mismatch() {
        let mut tx = empty_tx();
        let keys = gen_keys(3);
        let other = gen_keys(3);

        append_multi_signature(&mut tx, &keys, 2, vec![1u8; 64]).unwrap();
        assert_eq!(
            append_multi_signature(&mut tx, &other, 2, vec![2u8; 64]),
            Err(MultisigError::KeySetMismatch)
        );
        // Mismatched threshold is a mismatch too
        assert_eq!(
            append_multi_signature(&mut tx, &keys, 3, vec![2u8; 64]),
            Err(MultisigError::KeySetMismatch)
        );
    }

    #[test]
    fn test_multi_signature_validates_inputs() {
        let mut tx = empty_tx();
        let keys = gen_keys(2);

        assert_eq!(
            append_multi_signature(&mut tx, &[], 1, vec![0u8; 64]),
            Err(MultisigError::EmptyKeySet)
        );
        assert_eq!(
            append_multi_signature(&mut tx, &keys, 0, vec![0u8; 64]),
            Err(MultisigError::InvalidThreshold { m: 0, n: 2 })
        );
        assert_eq!(
            append_multi_signature(&mut tx, &keys, 3, vec![0u8; 64]),
            Err(MultisigError::InvalidThreshold { m: 3, n: 2 })
        );
    }
}
