//! # SEPTET Core
//!
//! Run-length codec for byte streams restricted to 7-bit values.
//!
//! This crate provides:
//! - The token grammar (literal and run tokens tagged by the high bit)
//! - An in-place encoder that never expands its input
//! - A decoder bounded by a caller-provided destination
//! - Token-level compression statistics
//!
//! No call allocates except the `*_to_vec` conveniences.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod stats;

pub use decoder::{
    DecodeOptions, decompress, decompress_prefix, decompress_to_vec, decompress_with,
    decompressed_len,
};
pub use encoder::{compress, compress_prefix, compress_to_vec, compressed_len, validate};
pub use error::{CodecError, ErrorKind, Result};
pub use format::{MAX_LITERAL, MAX_RUN_LEN, MIN_RUN_LEN, RUN_FLAG, Token, Tokens};
pub use stats::CompressionStats;
