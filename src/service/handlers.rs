//! Signing request handlers
//!
//! Typed entry points for the two signing operations. Each handler
//! takes its signer explicitly; the string-keyed [`dispatch`] shim
//! exists only for the external envelope boundary.

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::serialization::DecodeError;
use crate::core::transaction::TxHexError;
use crate::crypto::keys::{public_key_from_hex, Signer};
use crate::multisig::address::MultisigError;
use crate::multisig::coordinator::DraftTransaction;
use crate::service::envelope::{
    CliRpcRequest, CliRpcResponse, ERR_INTERNAL, ERR_INVALID_PARAMS, ERR_INVALID_TX,
    ERR_UNSUPPORTED_METHOD,
};

/// Handler failure, mapped onto envelope error codes
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("Invalid transaction: {0}")]
    InvalidTx(DecodeError),
    #[error("Threshold/key-set mismatch: {0}")]
    Protocol(MultisigError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Envelope error code for this failure
    ///
    /// The code set is fixed; external dispatch layers key on it.
    /// Protocol failures have no code of their own and share
    /// `ERR_INVALID_PARAMS`, staying distinguishable through the
    /// message and the typed handler `Result`.
    pub fn code(&self) -> u32 {
        match self {
            HandlerError::InvalidParams(_) | HandlerError::Protocol(_) => ERR_INVALID_PARAMS,
            HandlerError::InvalidTx(_) => ERR_INVALID_TX,
            HandlerError::Internal(_) => ERR_INTERNAL,
        }
    }
}

impl From<TxHexError> for HandlerError {
    fn from(err: TxHexError) -> Self {
        match err {
            TxHexError::InvalidHex => HandlerError::InvalidParams("raw_tx is not hex".to_string()),
            TxHexError::Decode(e) => HandlerError::InvalidTx(e),
        }
    }
}

/// Request for a single-signer round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignRawTxReq {
    pub raw_tx: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignRawTxRsp {
    pub signed_tx: String,
}

/// Request for one multisig round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignMultiRawTxReq {
    pub raw_tx: String,
    pub m: u16,
    /// Hex-encoded keys of the full signer set, in the agreed order
    pub pub_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignMultiRawTxRsp {
    pub signed_tx: String,
}

/// One single-signer round: decode, default the payer to the signer's
/// address if unset, sign, append a 1-of-1 entry, re-encode
pub fn sign_raw_tx(req: &SignRawTxReq, signer: &dyn Signer) -> Result<SignRawTxRsp, HandlerError> {
    let draft = DraftTransaction::from_hex(&req.raw_tx)?;
    let mut resolved = draft.resolve_payer(signer.address());

    let hash = resolved.signing_hash();
    let signature = signer
        .sign(&hash)
        .map_err(|e| HandlerError::Internal(e.to_string()))?;
    resolved.append_signature(signer.public_key(), signature);

    Ok(SignRawTxRsp {
        signed_tx: resolved.to_hex(),
    })
}

/// One multisig round: the signer contributes its partial signature
/// toward the M-of-N group described by the request
pub fn sign_multi_raw_tx(
    req: &SignMultiRawTxReq,
    signer: &dyn Signer,
) -> Result<SignMultiRawTxRsp, HandlerError> {
    let pub_keys = req
        .pub_keys
        .iter()
        .map(|s| public_key_from_hex(s))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| HandlerError::InvalidParams(e.to_string()))?;
    if !pub_keys.contains(&signer.public_key()) {
        return Err(HandlerError::Protocol(MultisigError::UnknownSigner));
    }

    let draft = DraftTransaction::from_hex(&req.raw_tx)?;
    let mut resolved = draft.resolve_payer(signer.address());

    let hash = resolved.signing_hash();
    let signature = signer
        .sign(&hash)
        .map_err(|e| HandlerError::Internal(e.to_string()))?;
    resolved
        .append_multi_signature(&pub_keys, req.m, signature)
        .map_err(HandlerError::Protocol)?;

    Ok(SignMultiRawTxRsp {
        signed_tx: resolved.to_hex(),
    })
}

/// Boundary shim mapping an envelope request to the typed handlers
///
/// Core code never routes through this; it calls the handlers
/// directly.
pub fn dispatch(req: &CliRpcRequest, signer: &dyn Signer) -> CliRpcResponse {
    let outcome: Result<Value, HandlerError> = match req.method.as_str() {
        "sigrawtx" => parse_params(&req.params)
            .and_then(|p| sign_raw_tx(&p, signer))
            .and_then(to_value),
        "sigmutilrawtx" => parse_params(&req.params)
            .and_then(|p| sign_multi_raw_tx(&p, signer))
            .and_then(to_value),
        other => {
            return CliRpcResponse::error(
                ERR_UNSUPPORTED_METHOD,
                format!("unsupported method: {other}"),
            )
        }
    };

    match outcome {
        Ok(result) => CliRpcResponse::ok(result),
        Err(err) => {
            info!("Qid:{} {} failed: {}", req.qid, req.method, err);
            CliRpcResponse::error(err.code(), err.to_string())
        }
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: &Value) -> Result<T, HandlerError> {
    serde_json::from_value(params.clone()).map_err(|e| HandlerError::InvalidParams(e.to_string()))
}

fn to_value<T: Serialize>(rsp: T) -> Result<Value, HandlerError> {
    serde_json::to_value(rsp).map_err(|e| HandlerError::Internal(e.to_string()))
}
