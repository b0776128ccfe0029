//! Native-contract invocation support
//!
//! This module contains:
//! - The argument codec (big-integer var-uints, length-prefixed addresses)
//! - Transfer payload construction for the native asset contracts

pub mod params;
pub mod transfer;

pub use params::{decode_address, decode_var_uint, encode_address, encode_var_uint, ParamError};
pub use transfer::{build_transfer, Asset, TransferError, TransferPayload};
