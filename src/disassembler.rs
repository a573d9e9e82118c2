//! AVR Disassembler Module
//!
//! Converts a flash image into AVR assembler text. Words are decoded with
//! [`crate::decode`], the same decoder the CPU executes with, so a listing
//! always shows what the simulator would do.

pub mod formatter;

use crate::decoder::{decode, Instruction};
use crate::instructions::WORD_BYTES;

/// Mnemonic used for words that match no opcode.
pub const WORD_DIRECTIVE: &str = ".dw";

/// Mnemonic used for a trailing byte that does not fill a word.
pub const BYTE_DIRECTIVE: &str = ".db";

/// A single disassembled instruction with full metadata
#[derive(Debug, Clone, PartialEq)]
pub struct DisassembledInstruction {
    /// Byte address where this instruction starts
    pub address: u32,

    /// Decoded instruction, `None` for a trailing odd byte
    pub instruction: Option<Instruction>,

    /// Assembler mnemonic (e.g. "add", "rjmp") or ".dw"/".db"
    pub mnemonic: &'static str,

    /// Raw bytes in image order (little-endian word, or one byte)
    pub bytes: Vec<u8>,

    /// Cycle cost when executed; branches report the untaken cost
    pub base_cycles: u8,
}

impl DisassembledInstruction {
    /// Absolute byte address a relative jump or branch goes to.
    pub fn target(&self) -> Option<u32> {
        let words = match self.instruction? {
            Instruction::Rjmp { k } => k as i64,
            Instruction::Brbs { k, .. } | Instruction::Brbc { k, .. } => k as i64,
            _ => return None,
        };
        let target = self.address as i64 + WORD_BYTES as i64 * (1 + words);
        Some(target.max(0) as u32)
    }
}

/// Options controlling disassembly output
#[derive(Debug, Clone, Copy, Default)]
pub struct DisassemblyOptions {
    /// Byte address of the first byte in the slice
    pub start_address: u32,

    /// Whether listings include the raw bytes
    pub hex_dump: bool,

    /// Whether listings include each instruction's address
    pub show_offsets: bool,
}

/// Disassemble a byte slice into a vector of instructions
///
/// Every full word yields one entry. A trailing odd byte yields a `.db`
/// entry.
///
/// # Examples
///
/// ```
/// use libavr::disassembler::{disassemble, formatter::format_instruction, DisassemblyOptions};
///
/// let listing = disassemble(&[0x0F, 0xEF, 0xFF, 0xCF], DisassemblyOptions::default());
///
/// assert_eq!(format_instruction(&listing[0]), "ldi r16, 0xFF");
/// assert_eq!(format_instruction(&listing[1]), "rjmp .-2");
/// ```
pub fn disassemble(bytes: &[u8], options: DisassemblyOptions) -> Vec<DisassembledInstruction> {
    let mut instructions = Vec::with_capacity(bytes.len().div_ceil(2));
    let mut address = options.start_address;

    let mut words = bytes.chunks_exact(WORD_BYTES as usize);
    for pair in &mut words {
        let word = u16::from_le_bytes([pair[0], pair[1]]);
        let instruction = decode(word);

        let (mnemonic, base_cycles) = match instruction.opcode() {
            Some(opcode) => (opcode.mnemonic(), opcode.base_cycles()),
            None => (WORD_DIRECTIVE, 0),
        };

        instructions.push(DisassembledInstruction {
            address,
            instruction: Some(instruction),
            mnemonic,
            bytes: pair.to_vec(),
            base_cycles,
        });
        address = address.wrapping_add(WORD_BYTES as u32);
    }

    if let [byte] = words.remainder() {
        instructions.push(DisassembledInstruction {
            address,
            instruction: None,
            mnemonic: BYTE_DIRECTIVE,
            bytes: vec![*byte],
            base_cycles: 0,
        });
    }

    instructions
}
