#![no_main]

use libfuzzer_sys::fuzz_target;
use septet_core::{CodecError, DecodeOptions, compress, decompress_to_vec};

fuzz_target!(|data: &[u8]| {
    let mut buf = data.to_vec();
    match compress(&mut buf) {
        Ok(n) => {
            assert!(n <= data.len());
            let restored = decompress_to_vec(&buf[..n], DecodeOptions::strict())
                .expect("encoder output must decode");
            assert_eq!(restored, data);
        }
        Err(CodecError::OutOfRangeLiteral { offset, value }) => {
            assert!(value >= 0x80);
            assert_eq!(data[offset], value);
            assert_eq!(buf, data);
        }
        Err(e) => panic!("unexpected encoder error: {e}"),
    }
});
