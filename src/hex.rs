//! # Intel HEX Loader
//!
//! Turns the Intel HEX text that AVR toolchains emit into a flat byte image
//! ready for [`Cpu::new`](crate::Cpu::new).
//!
//! Each line is one record:
//!
//! ```text
//! :LLAAAATTDD...CC
//!  |  |   | |     checksum (two's complement of the byte sum)
//!  |  |   | data bytes
//!  |  |   record type
//!  |  16-bit load offset
//!  data byte count
//! ```
//!
//! Supported record types:
//!
//! | Type | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 00   | data                                            |
//! | 01   | end of file                                     |
//! | 02   | extended segment address (base = value << 4)    |
//! | 03   | start segment address (CS:IP)                   |
//! | 04   | extended linear address (base = value << 16)    |
//! | 05   | start linear address                            |
//!
//! Bytes that no record writes are left at 0xFF, the erased-flash value.

use crate::memory::ERASED_FLASH;

/// Upper bound used by [`parse`]. The largest AVR flash is 384 KiB.
pub const MAX_IMAGE_SIZE: usize = 4 * 1024 * 1024;

/// Count, two offset bytes, type and checksum.
const RECORD_OVERHEAD: usize = 5;

const DATA: u8 = 0x00;
const END_OF_FILE: u8 = 0x01;
const EXTENDED_SEGMENT_ADDRESS: u8 = 0x02;
const START_SEGMENT_ADDRESS: u8 = 0x03;
const EXTENDED_LINEAR_ADDRESS: u8 = 0x04;
const START_LINEAR_ADDRESS: u8 = 0x05;

/// A decoded program image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexImage {
    /// Image bytes from address 0 up to the highest address written.
    pub data: Vec<u8>,

    /// CS:IP packed as `CS << 16 | IP`, from a type 03 record.
    pub start_segment_address: Option<u32>,

    /// EIP from a type 05 record.
    pub start_linear_address: Option<u32>,
}

/// Errors produced while parsing Intel HEX. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    #[error("line {line}: record does not start with ':'")]
    MissingStartCode { line: usize },

    #[error("line {line}: invalid hex digit {digit:?}")]
    InvalidDigit { line: usize, digit: char },

    #[error("line {line}: odd number of hex digits")]
    OddDigitCount { line: usize },

    #[error("line {line}: record is shorter than 5 bytes")]
    RecordTooShort { line: usize },

    #[error("line {line}: byte count {declared} does not match {actual} data bytes")]
    LengthMismatch {
        line: usize,
        declared: usize,
        actual: usize,
    },

    #[error("line {line}: checksum is {found:#04X}, expected {expected:#04X}")]
    ChecksumMismatch { line: usize, expected: u8, found: u8 },

    #[error("line {line}: record type {record_type:#04X} needs {expected} data bytes")]
    InvalidAddressRecord {
        line: usize,
        record_type: u8,
        expected: usize,
    },

    #[error("line {line}: unsupported record type {record_type:#04X}")]
    UnsupportedRecordType { line: usize, record_type: u8 },

    #[error("line {line}: record after end-of-file")]
    DataAfterEof { line: usize },

    #[error("missing end-of-file record")]
    MissingEof,

    #[error("line {line}: data ending at {end:#X} exceeds {capacity} byte image")]
    ExceedsCapacity {
        line: usize,
        end: usize,
        capacity: usize,
    },
}

/// One decoded line.
struct Record<'a> {
    record_type: u8,
    offset: u16,
    data: &'a [u8],
}

/// Parses Intel HEX text into an image of at most [`MAX_IMAGE_SIZE`] bytes.
///
/// # Examples
///
/// ```
/// use libavr::hex;
///
/// let image = hex::parse(":02000400039562\n:00000001FF\n").unwrap();
///
/// assert_eq!(image.data, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x03, 0x95]);
/// ```
pub fn parse(text: &str) -> Result<HexImage, HexError> {
    parse_with_capacity(text, MAX_IMAGE_SIZE)
}

/// Parses Intel HEX text, rejecting any record that writes at or beyond
/// `capacity`.
pub fn parse_with_capacity(text: &str, capacity: usize) -> Result<HexImage, HexError> {
    let mut image = HexImage {
        data: Vec::new(),
        start_segment_address: None,
        start_linear_address: None,
    };
    let mut base: usize = 0;
    let mut eof_line = None;
    let mut bytes = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        if eof_line.is_some() {
            return Err(HexError::DataAfterEof { line });
        }

        let record = decode_record(raw, line, &mut bytes)?;

        match record.record_type {
            DATA => {
                let start = base + record.offset as usize;
                place(&mut image.data, start, record.data, capacity, line)?;
            }
            END_OF_FILE => eof_line = Some(line),
            EXTENDED_SEGMENT_ADDRESS => {
                base = (address_field(&record, 2, line)? as usize) << 4;
            }
            START_SEGMENT_ADDRESS => {
                image.start_segment_address = Some(address_field(&record, 4, line)?);
            }
            EXTENDED_LINEAR_ADDRESS => {
                base = (address_field(&record, 2, line)? as usize) << 16;
            }
            START_LINEAR_ADDRESS => {
                image.start_linear_address = Some(address_field(&record, 4, line)?);
            }
            record_type => return Err(HexError::UnsupportedRecordType { line, record_type }),
        }
    }

    if eof_line.is_none() {
        return Err(HexError::MissingEof);
    }

    Ok(image)
}

/// Decodes one non-empty line into `scratch` and validates its framing.
fn decode_record<'a>(
    raw: &str,
    line: usize,
    scratch: &'a mut Vec<u8>,
) -> Result<Record<'a>, HexError> {
    let digits = raw
        .strip_prefix(':')
        .ok_or(HexError::MissingStartCode { line })?;

    let nibbles = digits
        .chars()
        .map(|digit| {
            digit
                .to_digit(16)
                .map(|value| value as u8)
                .ok_or(HexError::InvalidDigit { line, digit })
        })
        .collect::<Result<Vec<u8>, HexError>>()?;

    if nibbles.len() % 2 != 0 {
        return Err(HexError::OddDigitCount { line });
    }

    scratch.clear();
    scratch.extend(nibbles.chunks_exact(2).map(|pair| (pair[0] << 4) | pair[1]));

    if scratch.len() < RECORD_OVERHEAD {
        return Err(HexError::RecordTooShort { line });
    }

    let declared = scratch[0] as usize;
    let actual = scratch.len() - RECORD_OVERHEAD;
    if declared != actual {
        return Err(HexError::LengthMismatch {
            line,
            declared,
            actual,
        });
    }

    let (body, checksum) = scratch.split_at(scratch.len() - 1);
    let expected = body
        .iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(*byte))
        .wrapping_neg();
    if expected != checksum[0] {
        return Err(HexError::ChecksumMismatch {
            line,
            expected,
            found: checksum[0],
        });
    }

    Ok(Record {
        record_type: body[3],
        offset: u16::from_be_bytes([body[1], body[2]]),
        data: &body[4..],
    })
}

/// Reads the big-endian payload of an address record.
fn address_field(record: &Record, expected: usize, line: usize) -> Result<u32, HexError> {
    if record.data.len() != expected {
        return Err(HexError::InvalidAddressRecord {
            line,
            record_type: record.record_type,
            expected,
        });
    }

    Ok(record
        .data
        .iter()
        .fold(0u32, |value, byte| (value << 8) | *byte as u32))
}

fn place(
    image: &mut Vec<u8>,
    start: usize,
    bytes: &[u8],
    capacity: usize,
    line: usize,
) -> Result<(), HexError> {
    let end = match start.checked_add(bytes.len()) {
        Some(end) if end <= capacity => end,
        end => {
            return Err(HexError::ExceedsCapacity {
                line,
                end: end.unwrap_or(usize::MAX),
                capacity,
            })
        }
    };

    if image.len() < end {
        image.resize(end, ERASED_FLASH);
    }
    image[start..end].copy_from_slice(bytes);

    Ok(())
}
