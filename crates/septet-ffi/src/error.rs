//! FFI error codes and last-error tracking

use std::cell::Cell;
use std::os::raw::{c_char, c_int};

use septet_core::{CodecError, ErrorKind};

/// Error codes reported by `septet_last_error()`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeptetErrorCode {
    /// Last call succeeded
    Success = 0,
    /// A required pointer was null
    InvalidHandle = 1,
    /// Input byte had the high bit set
    OutOfRangeLiteral = 2,
    /// Compressed stream was truncated or non-canonical
    MalformedStream = 3,
    /// Destination capacity was too small
    DestinationOverflow = 4,
}

impl SeptetErrorCode {
    /// Static, NUL-terminated description of this code.
    pub fn message(self) -> &'static [u8] {
        match self {
            Self::Success => b"success\0",
            Self::InvalidHandle => b"invalid handle: required buffer is null\0",
            Self::OutOfRangeLiteral => b"input byte outside the 7-bit range\0",
            Self::MalformedStream => b"malformed compressed stream\0",
            Self::DestinationOverflow => b"destination buffer too small\0",
        }
    }

    /// Convert a raw code back to the enum.
    pub fn from_raw(code: c_int) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::InvalidHandle),
            2 => Some(Self::OutOfRangeLiteral),
            3 => Some(Self::MalformedStream),
            4 => Some(Self::DestinationOverflow),
            _ => None,
        }
    }
}

impl From<ErrorKind> for SeptetErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidHandle => Self::InvalidHandle,
            ErrorKind::OutOfRangeLiteral => Self::OutOfRangeLiteral,
            ErrorKind::MalformedStream => Self::MalformedStream,
            ErrorKind::DestinationOverflow => Self::DestinationOverflow,
        }
    }
}

impl From<&CodecError> for SeptetErrorCode {
    fn from(err: &CodecError) -> Self {
        err.kind().into()
    }
}

thread_local! {
    static LAST_ERROR: Cell<SeptetErrorCode> = const { Cell::new(SeptetErrorCode::Success) };
}

pub(crate) fn set_last_error(code: SeptetErrorCode) {
    LAST_ERROR.with(|cell| cell.set(code));
}

pub(crate) fn last_error() -> SeptetErrorCode {
    LAST_ERROR.with(Cell::get)
}

/// Record the outcome of a codec call and collapse it to the 0 sentinel.
pub(crate) fn sentinel(result: septet_core::Result<usize>) -> usize {
    match result {
        Ok(n) => {
            set_last_error(SeptetErrorCode::Success);
            n
        }
        Err(e) => {
            tracing::debug!(error = %e, "codec call failed");
            set_last_error((&e).into());
            0
        }
    }
}

/// Error code of the last codec call made on this thread.
#[unsafe(no_mangle)]
pub extern "C" fn septet_last_error() -> c_int {
    last_error() as c_int
}

/// Static description of an error code.
///
/// Returns null for unknown codes. The returned string must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn septet_error_message(code: c_int) -> *const c_char {
    match SeptetErrorCode::from_raw(code) {
        Some(code) => code.message().as_ptr().cast(),
        None => std::ptr::null(),
    }
}
