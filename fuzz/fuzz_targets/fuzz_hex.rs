//! Fuzz target for the Intel HEX loader.
//!
//! Arbitrary text must either parse into an image within the requested
//! capacity or produce an error, never panic.

#![no_main]

use libavr::hex;
use libfuzzer_sys::fuzz_target;

const CAPACITY: usize = 32 * 1024;

fuzz_target!(|text: &str| {
    if let Ok(image) = hex::parse_with_capacity(text, CAPACITY) {
        assert!(image.data.len() <= CAPACITY);
    }
});
