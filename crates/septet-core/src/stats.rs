//! Compression statistics derived from a compressed stream.

use std::fmt;

use crate::decoder::DecodeOptions;
use crate::error::Result;
use crate::format::{Token, Tokens};

/// Token-level summary of a compressed stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionStats {
    /// Bytes the stream expands to
    pub original_len: usize,
    /// Bytes in the compressed stream
    pub compressed_len: usize,
    /// Number of literal tokens
    pub literal_tokens: usize,
    /// Number of run tokens
    pub run_tokens: usize,
    /// Longest run described by a single token
    pub longest_run: usize,
}

impl CompressionStats {
    /// Walk `src` and tally its tokens.
    ///
    /// # Errors
    ///
    /// Returns the format errors of [`crate::decompress_with`].
    pub fn from_compressed(src: &[u8], options: DecodeOptions) -> Result<Self> {
        let mut stats = Self {
            compressed_len: src.len(),
            ..Self::default()
        };

        for item in Tokens::new(src) {
            let (offset, token) = item?;
            options.check(offset, &token)?;

            match token {
                Token::Literal(_) => stats.literal_tokens += 1,
                Token::Run { .. } => stats.run_tokens += 1,
            }
            stats.original_len += token.run_len();
            stats.longest_run = stats.longest_run.max(token.run_len());
        }

        Ok(stats)
    }

    /// Fraction of the original size saved, `None` for empty input.
    #[must_use]
    pub fn reduction(&self) -> Option<f64> {
        if self.original_len == 0 {
            return None;
        }
        Some(1.0 - self.compressed_len as f64 / self.original_len as f64)
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} bytes, {} literal / {} run tokens, longest run {}, reduction ",
            self.original_len,
            self.compressed_len,
            self.literal_tokens,
            self.run_tokens,
            self.longest_run,
        )?;
        match self.reduction() {
            Some(r) => write!(f, "{:.2}%", r * 100.0),
            None => write!(f, "N/A"),
        }
    }
}
