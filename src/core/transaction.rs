//! Transaction envelope and its canonical binary codec
//!
//! Field order on the wire: version, type, nonce, gas price, gas
//! limit, payer address, payload, then the signature list. The signing
//! hash covers everything except the signature list, so appending a
//! signature changes the serialized length but never the hash — as
//! long as the payer was finalized before the first hash was taken.

use secp256k1::PublicKey;
use std::fmt;

use crate::core::address::{Address, ADDR_LEN};
use crate::core::serialization::{ByteReader, ByteWriter, DecodeError};
use crate::crypto::hash::double_sha256;

/// Current transaction version
pub const TX_VERSION: u8 = 0;

/// Transaction type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxType {
    Deploy = 0xd0,
    Invoke = 0xd1,
}

impl TxType {
    fn from_u8(v: u8, offset: usize) -> Result<Self, DecodeError> {
        match v {
            0xd0 => Ok(TxType::Deploy),
            0xd1 => Ok(TxType::Invoke),
            other => Err(DecodeError::InvalidField {
                field: "tx_type",
                offset,
                reason: format!("unknown transaction type {other:#04x}"),
            }),
        }
    }
}

/// One threshold-signature group attached to a transaction
///
/// Key order is significant: it determines the derived multisig
/// address and the positional alignment of collected signatures, so
/// keys are stored exactly as supplied and never resorted.
#[derive(Clone, PartialEq, Eq)]
pub struct SigEntry {
    pub pub_keys: Vec<PublicKey>,
    pub m: u16,
    pub sig_data: Vec<Vec<u8>>,
}

impl SigEntry {
    /// Create an entry, enforcing `1 <= m <= pub_keys.len()` and
    /// `sig_data.len() <= pub_keys.len()`
    pub fn new(pub_keys: Vec<PublicKey>, m: u16, sig_data: Vec<Vec<u8>>) -> Option<Self> {
        if m == 0 || m as usize > pub_keys.len() || sig_data.len() > pub_keys.len() {
            return None;
        }
        Some(Self {
            pub_keys,
            m,
            sig_data,
        })
    }

    fn serialize(&self, w: &mut ByteWriter) {
        w.put_var_uint(self.pub_keys.len() as u64);
        for key in &self.pub_keys {
            w.put_var_bytes(&key.serialize());
        }
        w.put_var_uint(self.m as u64);
        w.put_var_uint(self.sig_data.len() as u64);
        for sig in &self.sig_data {
            w.put_var_bytes(sig);
        }
    }

    fn deserialize(r: &mut ByteReader) -> Result<Self, DecodeError> {
        let key_count = r.get_var_uint("sig pub key count")? as usize;
        let mut pub_keys = Vec::with_capacity(key_count.min(64));
        for _ in 0..key_count {
            let offset = r.position();
            let raw = r.get_var_bytes("sig pub key")?;
            let key = PublicKey::from_slice(raw).map_err(|e| DecodeError::InvalidField {
                field: "sig pub key",
                offset,
                reason: e.to_string(),
            })?;
            pub_keys.push(key);
        }

        let m_offset = r.position();
        let m = r.get_var_uint("sig threshold")?;
        if m == 0 || m > key_count as u64 {
            return Err(DecodeError::InvalidField {
                field: "sig threshold",
                offset: m_offset,
                reason: format!("threshold {m} out of range for {key_count} keys"),
            });
        }

        let count_offset = r.position();
        let sig_count = r.get_var_uint("sig data count")? as usize;
        if sig_count > key_count {
            return Err(DecodeError::InvalidField {
                field: "sig data count",
                offset: count_offset,
                reason: format!("{sig_count} signatures for {key_count} keys"),
            });
        }
        let mut sig_data = Vec::with_capacity(sig_count);
        for _ in 0..sig_count {
            sig_data.push(r.get_var_bytes("sig data")?.to_vec());
        }

        Ok(Self {
            pub_keys,
            m: m as u16,
            sig_data,
        })
    }

    /// Whether every designated key has contributed its signature
    pub fn is_full(&self) -> bool {
        self.sig_data.len() == self.pub_keys.len()
    }
}

impl fmt::Debug for SigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigEntry")
            .field("pub_keys", &self.pub_keys.len())
            .field("m", &self.m)
            .field("sig_data", &self.sig_data.len())
            .finish()
    }
}

/// A transfer transaction addressed to the native asset contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u8,
    pub tx_type: TxType,
    pub nonce: u32,
    pub gas_price: u64,
    pub gas_limit: u64,
    /// Fee payer; `Address::ZERO` means not yet finalized
    pub payer: Address,
    /// Invoke or deploy code
    pub payload: Vec<u8>,
    /// Collected signature groups, in submission order
    pub sigs: Vec<SigEntry>,
}

impl Transaction {
    /// Create an unsigned invoke transaction with an unset payer
    pub fn invoke(nonce: u32, gas_price: u64, gas_limit: u64, payload: Vec<u8>) -> Self {
        Self {
            version: TX_VERSION,
            tx_type: TxType::Invoke,
            nonce,
            gas_price,
            gas_limit,
            payer: Address::ZERO,
            payload,
            sigs: Vec::new(),
        }
    }

    fn serialize_unsigned(&self, w: &mut ByteWriter) {
        w.put_u8(self.version);
        w.put_u8(self.tx_type as u8);
        w.put_u32(self.nonce);
        w.put_u64(self.gas_price);
        w.put_u64(self.gas_limit);
        w.put_bytes(self.payer.as_bytes());
        w.put_var_bytes(&self.payload);
    }

    /// Serialize the full transaction, signature list included
    pub fn serialize(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        self.serialize_unsigned(&mut w);
        w.put_var_uint(self.sigs.len() as u64);
        for sig in &self.sigs {
            sig.serialize(&mut w);
        }
        w.into_bytes()
    }

    /// Decode a transaction from its canonical byte form
    ///
    /// Rejects trailing bytes; every structural mismatch reports the
    /// field it occurred in.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = ByteReader::new(bytes);

        let version = r.get_u8("version")?;
        let type_offset = r.position();
        let tx_type = TxType::from_u8(r.get_u8("tx_type")?, type_offset)?;
        let nonce = r.get_u32("nonce")?;
        let gas_price = r.get_u64("gas_price")?;
        let gas_limit = r.get_u64("gas_limit")?;
        let payer_offset = r.position();
        let payer = Address::from_bytes(r.get_bytes(ADDR_LEN, "payer")?).map_err(|e| {
            DecodeError::InvalidField {
                field: "payer",
                offset: payer_offset,
                reason: e.to_string(),
            }
        })?;
        let payload = r.get_var_bytes("payload")?.to_vec();

        let sig_count = r.get_var_uint("sig count")? as usize;
        let mut sigs = Vec::with_capacity(sig_count.min(64));
        for _ in 0..sig_count {
            sigs.push(SigEntry::deserialize(&mut r)?);
        }

        r.expect_end()?;

        Ok(Self {
            version,
            tx_type,
            nonce,
            gas_price,
            gas_limit,
            payer,
            payload,
            sigs,
        })
    }

    /// The digest each key-holder signs: double SHA-256 over every
    /// field except the signature list.
    ///
    /// The payer must be finalized first; the coordinator's
    /// `ResolvedTransaction` wrapper enforces that ordering during a
    /// signing run.
    pub fn signing_hash(&self) -> [u8; 32] {
        let mut w = ByteWriter::new();
        self.serialize_unsigned(&mut w);
        double_sha256(&w.into_bytes())
    }

    /// Serialize and render as lowercase hex for the tool boundary
    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize())
    }

    /// Parse a lowercase-hex transaction from the tool boundary
    pub fn from_hex(s: &str) -> Result<Self, TxHexError> {
        let bytes = hex::decode(s).map_err(|_| TxHexError::InvalidHex)?;
        Ok(Self::deserialize(&bytes)?)
    }
}

/// Failure to parse a hex-encoded transaction
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TxHexError {
    #[error("Input is not a valid hex string")]
    InvalidHex,
    #[error("Transaction decode failed: {0}")]
    Decode(#[from] DecodeError),
}
