//! Native-contract argument codec
//!
//! Native invoke arguments are untyped byte buffers. Integers travel
//! as the minimal two's-complement little-endian big-integer encoding
//! wrapped in a var-bytes prefix: small values stay compact and values
//! beyond 64 bits remain representable in principle. Because the
//! underlying representation is sign-capable, decoding must reject a
//! negative magnitude explicitly. Addresses travel as a var-bytes of
//! exactly their 20 raw bytes.

use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use thiserror::Error;

use crate::core::address::{Address, ADDR_LEN};
use crate::core::serialization::{ByteReader, ByteWriter, DecodeError};

/// Errors decoding native-contract arguments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("Decoded integer magnitude is negative")]
    NegativeValue,
    #[error("Fewer bytes available than the length prefix declares")]
    Truncated,
    #[error("Decoded integer exceeds the unsigned 64-bit range")]
    Overflow,
    #[error("Malformed address: expected {ADDR_LEN} bytes, got {0}")]
    MalformedAddress(usize),
    #[error("Malformed argument buffer: {0}")]
    Wire(DecodeError),
}

impl From<DecodeError> for ParamError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnexpectedEof { .. } => ParamError::Truncated,
            other => ParamError::Wire(other),
        }
    }
}

/// Encode an unsigned integer as a length-prefixed minimal big-integer
///
/// Zero encodes as an empty buffer, matching the minimal form.
pub fn encode_var_uint(w: &mut ByteWriter, value: u64) {
    if value == 0 {
        w.put_var_bytes(&[]);
        return;
    }
    let bytes = BigInt::from(value).to_signed_bytes_le();
    w.put_var_bytes(&bytes);
}

/// Decode a length-prefixed big-integer argument into a u64
pub fn decode_var_uint(r: &mut ByteReader) -> Result<u64, ParamError> {
    let bytes = r.get_var_bytes("var uint")?;
    if bytes.is_empty() {
        return Ok(0);
    }
    let value = BigInt::from_signed_bytes_le(bytes);
    if value.sign() == Sign::Minus {
        return Err(ParamError::NegativeValue);
    }
    value.to_u64().ok_or(ParamError::Overflow)
}

/// Encode a fixed 20-byte address with its length prefix (always 20)
pub fn encode_address(w: &mut ByteWriter, address: &Address) {
    w.put_var_bytes(address.as_bytes());
}

/// Decode a length-prefixed address, requiring exactly 20 bytes
pub fn decode_address(r: &mut ByteReader) -> Result<Address, ParamError> {
    let bytes = r.get_var_bytes("address")?;
    Address::from_bytes(bytes).map_err(|_| ParamError::MalformedAddress(bytes.len()))
}
