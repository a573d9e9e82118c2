//! Fuzz target for the disassembler.
//!
//! This target feeds arbitrary byte sequences to the disassembler
//! to find edge cases and crashes in instruction decoding and formatting.

#![no_main]

use arbitrary::Arbitrary;
use libavr::disassembler::formatter::format_listing;
use libavr::{disassemble, DisassemblyOptions};
use libfuzzer_sys::fuzz_target;

/// Disassembly options for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzOptions {
    start_address: u16,
    hex_dump: bool,
    show_offsets: bool,
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    bytes: Vec<u8>,
    options: FuzzOptions,
}

fuzz_target!(|input: FuzzInput| {
    // Limit input size to prevent OOM
    if input.bytes.len() > 65536 {
        return;
    }

    let options = DisassemblyOptions {
        start_address: input.options.start_address as u32 & !1,
        hex_dump: input.options.hex_dump,
        show_offsets: input.options.show_offsets,
    };

    let instructions = disassemble(&input.bytes, options);

    // One entry per word plus one for a trailing byte
    assert_eq!(instructions.len(), input.bytes.len().div_ceil(2));

    let total: usize = instructions.iter().map(|i| i.bytes.len()).sum();
    assert_eq!(total, input.bytes.len());

    let listing = format_listing(&instructions, options);
    assert_eq!(listing.lines().count(), instructions.len());
});
