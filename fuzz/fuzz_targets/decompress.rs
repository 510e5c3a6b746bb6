#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use septet_core::{CodecError, DecodeOptions, decompress_with, decompressed_len};

#[derive(Debug, Arbitrary)]
struct Input {
    stream: Vec<u8>,
    capacity: u16,
    lenient: bool,
}

fuzz_target!(|input: Input| {
    let options = if input.lenient {
        DecodeOptions::lenient()
    } else {
        DecodeOptions::strict()
    };

    let capacity = input.capacity as usize;
    let mut backing = vec![0xA5u8; capacity + 64];

    match decompress_with(&input.stream, &mut backing[..capacity], options) {
        Ok(n) => {
            assert!(n <= capacity);
            assert_eq!(decompressed_len(&input.stream, options), Ok(n));
        }
        Err(CodecError::DestinationOverflow { required, .. }) => assert!(required > capacity),
        Err(_) => {}
    }

    // Guard region past the destination must be untouched
    assert!(backing[capacity..].iter().all(|&b| b == 0xA5));
});
