//! Native asset transfer construction
//!
//! Builds the invoke payload for a native-contract transfer and wraps
//! it into an unsigned transaction with an unset payer. The payer is
//! finalized later by the signing coordinator, before the first
//! signing hash is computed.

use std::str::FromStr;
use thiserror::Error;

use crate::contract::params::{
    decode_address, decode_var_uint, encode_address, encode_var_uint, ParamError,
};
use crate::core::address::{Address, ADDR_LEN};
use crate::core::serialization::{ByteReader, ByteWriter, DecodeError};
use crate::core::transaction::Transaction;

/// Method name invoked on the asset contract
const TRANSFER_METHOD: &[u8] = b"transfer";

/// Invoke payload version byte
const PAYLOAD_VERSION: u8 = 0;

/// Errors building or parsing a transfer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),
    #[error("Unsupported payload version {0}")]
    UnsupportedVersion(u8),
    #[error("Unexpected method name in payload")]
    UnexpectedMethod,
    #[error("Unexpected argument count {0}")]
    UnexpectedArgCount(u64),
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error("Malformed payload: {0}")]
    Wire(#[from] DecodeError),
}

/// Native assets with well-known contract addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Zpt,
    Gala,
}

impl Asset {
    /// Fixed address of the asset's native contract
    pub fn contract_address(&self) -> Address {
        let mut bytes = [0u8; ADDR_LEN];
        bytes[ADDR_LEN - 1] = match self {
            Asset::Zpt => 0x01,
            Asset::Gala => 0x02,
        };
        Address(bytes)
    }
}

impl FromStr for Asset {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zpt" => Ok(Asset::Zpt),
            "gala" => Ok(Asset::Gala),
            other => Err(TransferError::UnknownAsset(other.to_string())),
        }
    }
}

/// Decoded form of a transfer invoke payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPayload {
    pub contract: Address,
    pub from: Address,
    pub to: Address,
    pub amount: u64,
}

impl TransferPayload {
    /// Encode: version byte, contract address, method name, then the
    /// argument buffer (state count, from, to, amount) as var-bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut args = ByteWriter::new();
        encode_var_uint(&mut args, 1);
        encode_address(&mut args, &self.from);
        encode_address(&mut args, &self.to);
        encode_var_uint(&mut args, self.amount);

        let mut w = ByteWriter::new();
        w.put_u8(PAYLOAD_VERSION);
        w.put_bytes(self.contract.as_bytes());
        w.put_var_bytes(TRANSFER_METHOD);
        w.put_var_bytes(&args.into_bytes());
        w.into_bytes()
    }

    /// Parse a payload produced by [`TransferPayload::encode`]
    pub fn decode(bytes: &[u8]) -> Result<Self, TransferError> {
        let mut r = ByteReader::new(bytes);

        let version = r.get_u8("payload version")?;
        if version != PAYLOAD_VERSION {
            return Err(TransferError::UnsupportedVersion(version));
        }
        let contract = Address::from_bytes(r.get_bytes(ADDR_LEN, "contract")?)
            .map_err(|_| ParamError::MalformedAddress(ADDR_LEN))?;
        let method = r.get_var_bytes("method")?;
        if method != TRANSFER_METHOD {
            return Err(TransferError::UnexpectedMethod);
        }

        let args_buf = r.get_var_bytes("args")?;
        r.expect_end()?;

        let mut args = ByteReader::new(args_buf);
        let state_count = decode_var_uint(&mut args)?;
        if state_count != 1 {
            return Err(TransferError::UnexpectedArgCount(state_count));
        }
        let from = decode_address(&mut args)?;
        let to = decode_address(&mut args)?;
        let amount = decode_var_uint(&mut args)?;
        args.expect_end().map_err(ParamError::from)?;

        Ok(Self {
            contract,
            from,
            to,
            amount,
        })
    }
}

/// Build an unsigned transfer transaction for a named asset
pub fn build_transfer(
    asset: Asset,
    from: Address,
    to: Address,
    amount: u64,
    gas_price: u64,
    gas_limit: u64,
    nonce: u32,
) -> Transaction {
    let payload = TransferPayload {
        contract: asset.contract_address(),
        from,
        to,
        amount,
    };
    Transaction::invoke(nonce, gas_price, gas_limit, payload.encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{KeyPair, Signer};

    #[test]
    fn test_asset_parsing() {
        assert_eq!("zpt".parse::<Asset>().unwrap(), Asset::Zpt);
        assert_eq!("GALA".parse::<Asset>().unwrap(), Asset::Gala);
        assert!(matches!(
            "doge".parse::<Asset>(),
            Err(TransferError::UnknownAsset(_))
        ));
    }

    #[test]
    fn test_asset_contracts_distinct() {
        assert_ne!(
            Asset::Zpt.contract_address(),
            Asset::Gala.contract_address()
        );
    }

    #[test]
    fn test_payload_round_trip() {
        let from = KeyPair::generate().address();
        let to = KeyPair::generate().address();

        let payload = TransferPayload {
            contract: Asset::Gala.contract_address(),
            from,
            to,
            amount: 1_000_000,
        };
        let bytes = payload.encode();
        assert_eq!(TransferPayload::decode(&bytes).unwrap(), payload);
    }

    #[test]
    fn test_payload_rejects_other_method() {
        let payload = TransferPayload {
            contract: Asset::Zpt.contract_address(),
            from: Address::ZERO,
            to: Address::ZERO,
            amount: 1,
        };
        let mut bytes = payload.encode();
        // Corrupt the first method byte ('t' -> 'x')
        bytes[1 + ADDR_LEN + 1] = b'x';
        assert_eq!(
            TransferPayload::decode(&bytes),
            Err(TransferError::UnexpectedMethod)
        );
    }

    #[test]
    fn test_build_transfer_leaves_payer_unset() {
        let from = KeyPair::generate().address();
        let to = KeyPair::generate().address();

        let tx = build_transfer(Asset::Zpt, from, to, 500, 1, 20_000, 7);
        assert!(tx.payer.is_zero());
        assert!(tx.sigs.is_empty());

        let decoded = TransferPayload::decode(&tx.payload).unwrap();
        assert_eq!(decoded.from, from);
        assert_eq!(decoded.to, to);
        assert_eq!(decoded.amount, 500);
    }
}
