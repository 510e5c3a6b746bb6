//! Parsing delimited integers into a byte buffer.
//!
//! Values are separated by commas and/or whitespace. Decimal and
//! `0x`-prefixed hex are accepted so printed output can be fed back in.
//! Every value must fit in a byte; the 7-bit check belongs to the codec.

use thiserror::Error;

use crate::config::InputConfig;

/// Errors that can occur while parsing input text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// Token is not an integer
    #[error("Invalid input at value {index}: '{token}' is not an integer")]
    InvalidNumber {
        /// Zero-based value index
        index: usize,
        /// Offending token
        token: String,
    },

    /// Integer does not fit in a byte
    #[error("Invalid input at value {index}: {value} is outside 0 - 255")]
    OutOfRange {
        /// Zero-based value index
        index: usize,
        /// Parsed value
        value: i64,
    },

    /// More values than the configured limit
    #[error("Input exceeds the limit of {limit} values")]
    TooManyValues {
        /// Configured limit
        limit: usize,
    },
}

fn parse_value(token: &str) -> Option<i64> {
    match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => token.parse().ok(),
    }
}

/// Parse `text` into bytes, growing the buffer by doubling.
pub fn parse_bytes(text: &str, config: &InputConfig) -> Result<Vec<u8>, IngestError> {
    let mut buf: Vec<u8> = Vec::with_capacity(config.initial_capacity);

    let tokens = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty());

    for (index, token) in tokens.enumerate() {
        if let Some(limit) = config.max_values
            && index >= limit
        {
            return Err(IngestError::TooManyValues { limit });
        }

        let value = parse_value(token).ok_or_else(|| IngestError::InvalidNumber {
            index,
            token: token.to_string(),
        })?;
        let byte = u8::try_from(value).map_err(|_| IngestError::OutOfRange { index, value })?;

        if buf.len() == buf.capacity() {
            let grow_to = buf.capacity().max(1) * 2;
            buf.reserve_exact(grow_to - buf.len());
            tracing::debug!(capacity = buf.capacity(), "grew input buffer");
        }
        buf.push(byte);
    }

    tracing::debug!(values = buf.len(), "parsed input");
    Ok(buf)
}
