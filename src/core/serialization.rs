//! Canonical wire serialization primitives
//!
//! Little-endian fixed-width integers, compact variable-length
//! integers and length-prefixed byte buffers, as used by the
//! transaction envelope. Decoding is strict: var-ints must be
//! minimally encoded and every failure names the field that could not
//! be read, so a structurally invalid transaction reports exactly
//! where it broke.

use thiserror::Error;

/// Upper bound on any single length-prefixed buffer.
///
/// A declared length above this is treated as a count overflow rather
/// than an allocation request.
pub const MAX_VAR_BYTES: u64 = 1 << 22;

/// Structural decoding errors, carrying the offending field and offset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unexpected end of buffer while reading {field} at offset {offset}")]
    UnexpectedEof { field: &'static str, offset: usize },
    #[error("Var-int for {field} at offset {offset} is not minimally encoded")]
    NonCanonicalVarInt { field: &'static str, offset: usize },
    #[error("Declared length for {field} at offset {offset} exceeds limit ({len} > {limit})")]
    LengthOverflow {
        field: &'static str,
        offset: usize,
        len: u64,
        limit: u64,
    },
    #[error("Invalid value for {field} at offset {offset}: {reason}")]
    InvalidField {
        field: &'static str,
        offset: usize,
        reason: String,
    },
    #[error("{0} trailing bytes after the last field")]
    TrailingBytes(usize),
}

// =============================================================================
// Writer
// =============================================================================

/// Append-only byte sink for canonical encoding
#[derive(Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn put_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a compact variable-length integer: one byte below 0xfd,
    /// otherwise a 0xfd/0xfe/0xff marker followed by the value in 2, 4
    /// or 8 little-endian bytes
    pub fn put_var_uint(&mut self, v: u64) {
        match v {
            0..=0xfc => self.put_u8(v as u8),
            0xfd..=0xffff => {
                self.put_u8(0xfd);
                self.put_u16(v as u16);
            }
            0x1_0000..=0xffff_ffff => {
                self.put_u8(0xfe);
                self.put_u32(v as u32);
            }
            _ => {
                self.put_u8(0xff);
                self.put_u64(v);
            }
        }
    }

    /// Write a length-prefixed byte buffer
    pub fn put_var_bytes(&mut self, bytes: &[u8]) {
        self.put_var_uint(bytes.len() as u64);
        self.put_bytes(bytes);
    }
}

// =============================================================================
// Reader
// =============================================================================

/// Cursor over a byte slice with strict, field-labelled reads
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current read offset
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Fails unless the whole buffer has been consumed
    pub fn expect_end(&self) -> Result<(), DecodeError> {
        if self.remaining() != 0 {
            return Err(DecodeError::TrailingBytes(self.remaining()));
        }
        Ok(())
    }

    fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::UnexpectedEof {
                field,
                offset: self.pos,
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn get_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.take(1, field)?[0])
    }

    pub fn get_u16(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        let bytes = self.take(2, field)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn get_u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let bytes = self.take(4, field)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn get_u64(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        let bytes = self.take(8, field)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(arr))
    }

    pub fn get_bytes(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        self.take(n, field)
    }

    /// Read a compact variable-length integer, rejecting non-minimal
    /// encodings
    pub fn get_var_uint(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        let offset = self.pos;
        let prefix = self.get_u8(field)?;
        let value = match prefix {
            0xfd => {
                let v = self.get_u16(field)? as u64;
                if v < 0xfd {
                    return Err(DecodeError::NonCanonicalVarInt { field, offset });
                }
                v
            }
            0xfe => {
                let v = self.get_u32(field)? as u64;
                if v <= 0xffff {
                    return Err(DecodeError::NonCanonicalVarInt { field, offset });
                }
                v
            }
            0xff => {
                let v = self.get_u64(field)?;
                if v <= 0xffff_ffff {
                    return Err(DecodeError::NonCanonicalVarInt { field, offset });
                }
                v
            }
            v => v as u64,
        };
        Ok(value)
    }

    /// Read a length-prefixed byte buffer
    pub fn get_var_bytes(&mut self, field: &'static str) -> Result<&'a [u8], DecodeError> {
        let offset = self.pos;
        let len = self.get_var_uint(field)?;
        if len > MAX_VAR_BYTES {
            return Err(DecodeError::LengthOverflow {
                field,
                offset,
                len,
                limit: MAX_VAR_BYTES,
            });
        }
        self.take(len as usize, field)
    }
}
