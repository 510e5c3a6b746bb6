//! # SEPTET FFI
//!
//! C ABI for the SEPTET codec.
//!
//! ```c
//! size_t septet_compress(uint8_t *data_ptr, size_t data_size);
//! size_t septet_decompress(const uint8_t *src, size_t src_len,
//!                          uint8_t *dst, size_t dst_cap);
//! size_t septet_decompressed_len(const uint8_t *src, size_t src_len);
//! int septet_last_error(void);
//! const char *septet_error_message(int code);
//! ```
//!
//! All functions are reentrant. The last error is tracked per thread.

#![warn(clippy::all)]

pub mod codec;
pub mod error;

pub use codec::{septet_compress, septet_decompress, septet_decompressed_len};
pub use error::{SeptetErrorCode, septet_error_message, septet_last_error};
