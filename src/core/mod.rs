//! Core transaction types and wire codec
//!
//! This module contains the fundamental building blocks:
//! - Addresses (20-byte identifiers with a zero "unset" sentinel)
//! - Wire serialization primitives (var-ints, var-bytes)
//! - The transaction envelope and its canonical codec

pub mod address;
pub mod serialization;
pub mod transaction;

pub use address::{Address, AddressError, ADDR_LEN};
pub use serialization::{ByteReader, ByteWriter, DecodeError, MAX_VAR_BYTES};
pub use transaction::{SigEntry, Transaction, TxHexError, TxType, TX_VERSION};
