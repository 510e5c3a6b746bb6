//! In-place run-length encoder.
//!
//! Compression rewrites the caller's buffer from the front. Every run of
//! length `L` is replaced by a token of at most `min(L, 2)` bytes, so the
//! write cursor never passes the read cursor and no scratch space is needed.

use crate::error::{CodecError, Result};
use crate::format::{MAX_RUN_LEN, Token, is_valid_literal};

/// Check that every byte of `data` is a 7-bit literal.
///
/// # Errors
///
/// Returns `CodecError::OutOfRangeLiteral` for the first byte >= 0x80.
pub fn validate(data: &[u8]) -> Result<()> {
    match data.iter().position(|&b| !is_valid_literal(b)) {
        Some(offset) => Err(CodecError::OutOfRangeLiteral {
            offset,
            value: data[offset],
        }),
        None => Ok(()),
    }
}

/// Length of the run starting at `start`, capped at [`MAX_RUN_LEN`].
#[inline]
fn run_len_at(data: &[u8], start: usize) -> usize {
    let literal = data[start];
    let limit = data.len().min(start + MAX_RUN_LEN);

    let mut end = start + 1;
    while end < limit && data[end] == literal {
        end += 1;
    }
    end - start
}

/// Compress `data` in place.
///
/// On success the first `n` bytes of `data` hold the compressed stream,
/// where `n` is the returned length. Bytes past `n` are left stale.
///
/// The whole buffer is validated before anything is rewritten, so a
/// rejected buffer is unchanged.
///
/// # Errors
///
/// Returns `CodecError::OutOfRangeLiteral` if any byte has its high bit set.
///
/// # Example
///
/// ```
/// let mut data = [0x01, 0x02, 0x02, 0x02, 0x03];
/// let n = septet_core::compress(&mut data).unwrap();
/// assert_eq!(&data[..n], &[0x01, 0x82, 0x03, 0x03]);
/// ```
pub fn compress(data: &mut [u8]) -> Result<usize> {
    validate(data)?;

    let mut read = 0;
    let mut write = 0;

    while read < data.len() {
        let literal = data[read];
        let len = run_len_at(data, read);
        read += len;

        let token = Token::from_run(literal, len);
        debug_assert!(write + token.encoded_len() <= read);
        write += token.encode_into(&mut data[write..]);
    }

    tracing::trace!(
        input_len = data.len(),
        compressed_len = write,
        "compressed buffer in place"
    );

    Ok(write)
}

/// Compress the first `length` bytes of `buf` in place.
///
/// # Errors
///
/// Returns `CodecError::LengthOutOfBounds` if `length > buf.len()`, or any
/// error from [`compress`].
pub fn compress_prefix(buf: &mut [u8], length: usize) -> Result<usize> {
    let capacity = buf.len();
    let data = buf
        .get_mut(..length)
        .ok_or(CodecError::LengthOutOfBounds { length, capacity })?;
    compress(data)
}

/// Compressed size of `data` without modifying it.
///
/// # Errors
///
/// Returns `CodecError::OutOfRangeLiteral` if any byte has its high bit set.
pub fn compressed_len(data: &[u8]) -> Result<usize> {
    validate(data)?;

    let mut read = 0;
    let mut size = 0;
    while read < data.len() {
        let len = run_len_at(data, read);
        size += Token::from_run(data[read], len).encoded_len();
        read += len;
    }
    Ok(size)
}

/// Compress a copy of `data` into a new vector.
///
/// # Errors
///
/// Returns `CodecError::OutOfRangeLiteral` if any byte has its high bit set.
pub fn compress_to_vec(data: &[u8]) -> Result<Vec<u8>> {
    let mut buf = data.to_vec();
    let len = compress(&mut buf)?;
    buf.truncate(len);
    Ok(buf)
}
