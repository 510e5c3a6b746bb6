//! Bounded run-length decoder.
//!
//! Expands a compressed stream into a caller-provided destination. The
//! destination bound is checked for each token before any of its bytes are
//! written, so a failed call never writes out of bounds and never leaves a
//! partial token behind.

use crate::error::{CodecError, Result};
use crate::format::{Token, Tokens};

/// Decoder behaviour for non-canonical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject run tokens with a length byte of 0 or 1.
    ///
    /// When disabled such tokens expand to exactly as many bytes as their
    /// length byte says.
    pub strict_run_lengths: bool,
}

impl DecodeOptions {
    /// Reject anything the encoder would not have produced.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            strict_run_lengths: true,
        }
    }

    /// Accept short run tokens as length-as-given.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            strict_run_lengths: false,
        }
    }

    pub(crate) fn check(&self, offset: usize, token: &Token) -> Result<()> {
        if token.is_canonical() {
            return Ok(());
        }

        let len = token.run_len() as u8;
        if self.strict_run_lengths {
            return Err(CodecError::InvalidRunLength { offset, len });
        }

        tracing::warn!(offset, len, "accepting non-canonical run token");
        Ok(())
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::strict()
    }
}

/// Decompress `src` into `dst` with strict options.
///
/// Returns the number of bytes written to `dst`.
///
/// # Errors
///
/// - `CodecError::MalformedStream` if `src` ends inside a run token
/// - `CodecError::InvalidRunLength` for a run token of length 0 or 1
/// - `CodecError::DestinationOverflow` if the output does not fit `dst`
///
/// # Example
///
/// ```
/// let mut out = [0u8; 8];
/// let n = septet_core::decompress(&[0x01, 0x82, 0x03, 0x03], &mut out).unwrap();
/// assert_eq!(&out[..n], &[0x01, 0x02, 0x02, 0x02, 0x03]);
/// ```
pub fn decompress(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    decompress_with(src, dst, DecodeOptions::default())
}

/// Decompress `src` into `dst` with explicit options.
///
/// # Errors
///
/// Same as [`decompress`], except that short run tokens are accepted when
/// `options.strict_run_lengths` is false.
pub fn decompress_with(src: &[u8], dst: &mut [u8], options: DecodeOptions) -> Result<usize> {
    let capacity = dst.len();
    let mut write = 0;

    for item in Tokens::new(src) {
        let (offset, token) = item?;
        options.check(offset, &token)?;

        let end = write + token.run_len();
        if end > capacity {
            return Err(CodecError::DestinationOverflow {
                capacity,
                required: end,
            });
        }

        dst[write..end].fill(token.value());
        write = end;
    }

    tracing::trace!(
        compressed_len = src.len(),
        decompressed_len = write,
        "decompressed stream"
    );

    Ok(write)
}

/// Decompress the first `src_len` bytes of `src` into `dst`.
///
/// # Errors
///
/// Returns `CodecError::LengthOutOfBounds` if `src_len > src.len()`, or any
/// error from [`decompress`].
pub fn decompress_prefix(src: &[u8], src_len: usize, dst: &mut [u8]) -> Result<usize> {
    let stream = src.get(..src_len).ok_or(CodecError::LengthOutOfBounds {
        length: src_len,
        capacity: src.len(),
    })?;
    decompress(stream, dst)
}

/// Number of bytes `src` expands to.
///
/// # Errors
///
/// Returns the same format errors as [`decompress_with`].
pub fn decompressed_len(src: &[u8], options: DecodeOptions) -> Result<usize> {
    Tokens::new(src).try_fold(0usize, |total, item| {
        let (offset, token) = item?;
        options.check(offset, &token)?;
        Ok(total + token.run_len())
    })
}

/// Decompress `src` into a vector sized exactly for the output.
///
/// # Errors
///
/// Returns the same format errors as [`decompress_with`].
pub fn decompress_to_vec(src: &[u8], options: DecodeOptions) -> Result<Vec<u8>> {
    let mut out = vec![0u8; decompressed_len(src, options)?];
    let written = decompress_with(src, &mut out, options)?;
    debug_assert_eq!(written, out.len());
    Ok(out)
}
