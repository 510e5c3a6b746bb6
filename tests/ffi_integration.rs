//! Integration tests for the C ABI.
//!
//! Mirrors how a foreign caller drives the shared library: fill a buffer,
//! compress it in place, read the prefix back, size a destination and
//! decompress into it.

use std::ffi::CStr;
use std::os::raw::c_int;
use std::ptr;

use septet_ffi::{
    SeptetErrorCode, septet_compress, septet_decompress, septet_decompressed_len,
    septet_error_message, septet_last_error,
};
use septet_integration_tests::cases;

fn ffi_compress(input: &[u8]) -> Option<Vec<u8>> {
    let mut buf = input.to_vec();
    let n = unsafe { septet_compress(buf.as_mut_ptr(), buf.len()) };
    if n == 0 && septet_last_error() != SeptetErrorCode::Success as c_int {
        return None;
    }
    buf.truncate(n);
    Some(buf)
}

fn ffi_decompress(packed: &[u8]) -> Option<Vec<u8>> {
    let needed = unsafe { septet_decompressed_len(packed.as_ptr(), packed.len()) };
    if septet_last_error() != SeptetErrorCode::Success as c_int {
        return None;
    }

    let mut out = vec![0u8; needed];
    let n = unsafe { septet_decompress(packed.as_ptr(), packed.len(), out.as_mut_ptr(), out.len()) };
    if septet_last_error() != SeptetErrorCode::Success as c_int {
        return None;
    }
    out.truncate(n);
    Some(out)
}

#[test]
fn test_ffi_scenario_table() {
    for case in cases() {
        match ffi_compress(&case.input) {
            Some(packed) => {
                assert!(case.valid, "{}: expected failure", case.name);
                assert_eq!(
                    ffi_decompress(&packed).as_deref(),
                    Some(case.input.as_slice()),
                    "{}",
                    case.name
                );
            }
            None => {
                assert!(!case.valid, "{}: unexpected failure", case.name);
                assert_eq!(
                    septet_last_error(),
                    SeptetErrorCode::OutOfRangeLiteral as c_int
                );
            }
        }
    }
}

#[test]
fn test_ffi_sentinel_is_zero_on_every_failure() {
    let mut bad = [1u8, 200];
    let src = [0x81u8];
    let mut dst = [0u8; 1];

    unsafe {
        assert_eq!(septet_compress(ptr::null_mut(), 4), 0);
        assert_eq!(septet_last_error(), SeptetErrorCode::InvalidHandle as c_int);

        assert_eq!(septet_compress(bad.as_mut_ptr(), bad.len()), 0);
        assert_eq!(septet_last_error(), SeptetErrorCode::OutOfRangeLiteral as c_int);

        assert_eq!(septet_decompress(src.as_ptr(), 1, dst.as_mut_ptr(), 1), 0);
        assert_eq!(septet_last_error(), SeptetErrorCode::MalformedStream as c_int);

        let run = [0x81u8, 5];
        assert_eq!(septet_decompress(run.as_ptr(), 2, dst.as_mut_ptr(), 1), 0);
        assert_eq!(septet_last_error(), SeptetErrorCode::DestinationOverflow as c_int);
    }
}

#[test]
fn test_ffi_messages_are_distinct() {
    let codes = [
        SeptetErrorCode::Success,
        SeptetErrorCode::InvalidHandle,
        SeptetErrorCode::OutOfRangeLiteral,
        SeptetErrorCode::MalformedStream,
        SeptetErrorCode::DestinationOverflow,
    ];
    let messages: Vec<String> = codes
        .iter()
        .map(|&c| {
            let ptr = septet_error_message(c as c_int);
            assert!(!ptr.is_null());
            unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
        })
        .collect();

    for (i, a) in messages.iter().enumerate() {
        for b in &messages[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_ffi_last_error_is_per_thread() {
    unsafe {
        assert_eq!(septet_compress(ptr::null_mut(), 1), 0);
    }
    assert_eq!(septet_last_error(), SeptetErrorCode::InvalidHandle as c_int);

    let other = std::thread::spawn(|| {
        let mut buf = [3u8; 10];
        let n = unsafe { septet_compress(buf.as_mut_ptr(), buf.len()) };
        (n, septet_last_error())
    })
    .join()
    .unwrap();
    assert_eq!(other, (2, SeptetErrorCode::Success as c_int));

    assert_eq!(septet_last_error(), SeptetErrorCode::InvalidHandle as c_int);
}
