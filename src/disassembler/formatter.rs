//! Formatting functions for disassembled instructions

use crate::decoder::Instruction;
use crate::disassembler::{DisassembledInstruction, DisassemblyOptions};
use crate::instructions::WORD_BYTES;

/// Format a single instruction as assembly text
///
/// Registers print as `rN`, immediates and I/O addresses in hex, ADIW/SBIW
/// immediates and bit numbers in decimal, and relative targets as a byte
/// offset from the next instruction (`.-2`, `.+4`).
pub fn format_instruction(instr: &DisassembledInstruction) -> String {
    let instruction = match instr.instruction {
        Some(instruction) => instruction,
        None => return format!("{} 0x{:02X}", instr.mnemonic, instr.bytes[0]),
    };

    let operand = format_operand(&instruction);

    if operand.is_empty() {
        instr.mnemonic.to_string()
    } else {
        format!("{} {}", instr.mnemonic, operand)
    }
}

/// Format a whole listing, one instruction per line
///
/// With `show_offsets` each line starts with the byte address. With
/// `hex_dump` the raw bytes follow. Relative jumps get the absolute target
/// as a trailing comment.
pub fn format_listing(instructions: &[DisassembledInstruction], options: DisassemblyOptions) -> String {
    let mut listing = String::new();

    for instr in instructions {
        if options.show_offsets {
            listing.push_str(&format!("{:4x}:\t", instr.address));
        }
        if options.hex_dump {
            let dump: Vec<String> = instr.bytes.iter().map(|b| format!("{:02x}", b)).collect();
            listing.push_str(&format!("{:<6}\t", dump.join(" ")));
        }

        listing.push_str(&format_instruction(instr));

        if let Some(target) = instr.target() {
            listing.push_str(&format!("\t; 0x{:x}", target));
        }
        listing.push('\n');
    }

    listing
}

/// Format the operands based on instruction form
fn format_operand(instruction: &Instruction) -> String {
    use Instruction::*;

    match *instruction {
        Add { d, r }
        | Adc { d, r }
        | Sub { d, r }
        | Sbc { d, r }
        | And { d, r }
        | Or { d, r }
        | Eor { d, r }
        | Mul { d, r }
        | Muls { d, r }
        | Mulsu { d, r }
        | Fmul { d, r }
        | Fmuls { d, r }
        | Fmulsu { d, r } => format!("r{}, r{}", d, r),

        Subi { d, k } | Sbci { d, k } | Andi { d, k } | Ori { d, k } | Ldi { d, k } => {
            format!("r{}, 0x{:02X}", d, k)
        }

        Adiw { d, k } | Sbiw { d, k } => format!("r{}, {}", d, k),

        Com { d } | Neg { d } | Inc { d } | Dec { d } => format!("r{}", d),

        Rjmp { k } => relative(k as i32),
        Brbs { s, k } | Brbc { s, k } => format!("{}, {}", s, relative(k as i32)),

        Sbi { a, b } => format!("0x{:02X}, {}", a, b),

        Unknown(word) => format!("0x{:04X}", word),
    }
}

fn relative(words: i32) -> String {
    format!(".{:+}", words * WORD_BYTES)
}
