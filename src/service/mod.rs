//! Request handling for the external dispatch layer
//!
//! This module contains:
//! - The request/response envelope and its error codes
//! - Typed signing handlers plus the envelope dispatch shim

pub mod envelope;
pub mod handlers;

pub use envelope::{
    CliRpcRequest, CliRpcResponse, ERR_INTERNAL, ERR_INVALID_PARAMS, ERR_INVALID_TX, ERR_OK,
    ERR_UNSUPPORTED_METHOD,
};
pub use handlers::{
    dispatch, sign_multi_raw_tx, sign_raw_tx, HandlerError, SignMultiRawTxReq, SignMultiRawTxRsp,
    SignRawTxReq, SignRawTxRsp,
};
