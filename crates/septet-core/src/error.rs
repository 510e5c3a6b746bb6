//! Error types for the codec

use thiserror::Error;

/// Errors that can occur while compressing or decompressing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A required buffer was not provided
    #[error("Invalid handle: {0} is null")]
    InvalidHandle(&'static str),

    /// A declared length does not fit the buffer it describes
    #[error("Length {length} exceeds buffer capacity {capacity}")]
    LengthOutOfBounds {
        /// Declared length
        length: usize,
        /// Actual buffer capacity
        capacity: usize,
    },

    /// Input byte has the high bit set
    #[error("Literal 0x{value:02X} at offset {offset} is outside the 7-bit range")]
    OutOfRangeLiteral {
        /// Offset of the offending byte
        offset: usize,
        /// The offending byte
        value: u8,
    },

    /// Stream ends in the middle of a run token
    #[error("Truncated stream: run header at offset {offset} has no length byte")]
    MalformedStream {
        /// Offset of the dangling run header
        offset: usize,
    },

    /// Run token carries a length the encoder never emits
    #[error("Invalid run length {len} at offset {offset}")]
    InvalidRunLength {
        /// Offset of the run header
        offset: usize,
        /// Length byte found in the stream
        len: u8,
    },

    /// Decoded output does not fit the destination
    #[error("Destination overflow: {required} bytes required, capacity is {capacity}")]
    DestinationOverflow {
        /// Destination capacity
        capacity: usize,
        /// Bytes needed to hold the token that did not fit
        required: usize,
    },
}

/// Coarse classification of [`CodecError`].
///
/// Front ends map each kind to its own diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Buffer absent or too small for its declared length
    InvalidHandle,
    /// Input byte >= 0x80
    OutOfRangeLiteral,
    /// Truncated or non-canonical compressed stream
    MalformedStream,
    /// Destination capacity exceeded
    DestinationOverflow,
}

impl CodecError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidHandle(_) | Self::LengthOutOfBounds { .. } => ErrorKind::InvalidHandle,
            Self::OutOfRangeLiteral { .. } => ErrorKind::OutOfRangeLiteral,
            Self::MalformedStream { .. } | Self::InvalidRunLength { .. } => {
                ErrorKind::MalformedStream
            }
            Self::DestinationOverflow { .. } => ErrorKind::DestinationOverflow,
        }
    }
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
