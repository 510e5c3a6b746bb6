//! Codec API FFI
//!
//! Every call returns the number of bytes produced, or 0 on failure. The
//! reason for a 0 return is available through `septet_last_error()`; an
//! empty input also returns 0 but leaves the last error at `Success`.

use std::slice;

use septet_core::{CodecError, DecodeOptions};

use crate::error::sentinel;

/// Compress `data_size` bytes at `data_ptr` in place.
///
/// Returns the compressed length, 0 on failure.
///
/// # Safety
///
/// - `data_ptr` must be null or valid for reads and writes of `data_size` bytes
/// - no other thread may access the buffer during the call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn septet_compress(data_ptr: *mut u8, data_size: usize) -> usize {
    if data_ptr.is_null() {
        return sentinel(Err(CodecError::InvalidHandle("data_ptr")));
    }

    // SAFETY: non-null and valid for `data_size` bytes per the contract above.
    let data = unsafe { slice::from_raw_parts_mut(data_ptr, data_size) };
    sentinel(septet_core::compress(data))
}

/// Decompress `src_len` bytes at `src` into `dst`, writing at most `dst_cap` bytes.
///
/// Returns the decompressed length, 0 on failure. Run tokens with a length
/// below 2 are rejected.
///
/// # Safety
///
/// - `src` must be null or valid for reads of `src_len` bytes
/// - `dst` must be null or valid for writes of `dst_cap` bytes
/// - the two buffers must not overlap
#[unsafe(no_mangle)]
pub unsafe extern "C" fn septet_decompress(
    src: *const u8,
    src_len: usize,
    dst: *mut u8,
    dst_cap: usize,
) -> usize {
    if src.is_null() {
        return sentinel(Err(CodecError::InvalidHandle("src")));
    }
    if dst.is_null() {
        return sentinel(Err(CodecError::InvalidHandle("dst")));
    }

    // SAFETY: both pointers are non-null, sized and disjoint per the contract above.
    let (src, dst) = unsafe {
        (
            slice::from_raw_parts(src, src_len),
            slice::from_raw_parts_mut(dst, dst_cap),
        )
    };
    sentinel(septet_core::decompress_with(src, dst, DecodeOptions::strict()))
}

/// Number of bytes `src` decompresses to, 0 on failure.
///
/// Use it to size the destination passed to `septet_decompress()`.
///
/// # Safety
///
/// - `src` must be null or valid for reads of `src_len` bytes
#[unsafe(no_mangle)]
pub unsafe extern "C" fn septet_decompressed_len(src: *const u8, src_len: usize) -> usize {
    if src.is_null() {
        return sentinel(Err(CodecError::InvalidHandle("src")));
    }

    // SAFETY: non-null and valid for `src_len` bytes per the contract above.
    let src = unsafe { slice::from_raw_parts(src, src_len) };
    sentinel(septet_core::decompressed_len(src, DecodeOptions::strict()))
}
