//! # Instruction Decoder
//!
//! Turns a fetched 16-bit word into an [`Instruction`] with its operand
//! fields extracted. Register fields are resolved to absolute register
//! numbers (0-31), so `ldi r16, ...` carries `d: 16`, not the encoded 0.
//!
//! Field packing follows the AVR encoding exactly, including the split
//! fields:
//!
//! ```text
//! ADD   0000 11rd dddd rrrr   r = bit 9 : bits 3..0
//! SUBI  0101 KKKK dddd KKKK   K = bits 11..8 : bits 3..0, d = 16 + dddd
//! ADIW  1001 0110 KKdd KKKK   K = bits 7..6 : bits 3..0, d = 24 + 2 * dd
//! BRBS  1111 00kk kkkk ksss   k = bits 9..3 signed, s = bits 2..0
//! ```

use crate::opcodes::{lookup, Opcode};

/// A decoded instruction word.
///
/// # Examples
///
/// ```
/// use libavr::{decode, Instruction};
///
/// assert_eq!(decode(0x0C12), Instruction::Add { d: 1, r: 2 });
/// assert_eq!(decode(0xEF0F), Instruction::Ldi { d: 16, k: 0xFF });
/// assert_eq!(decode(0xCFFF), Instruction::Rjmp { k: -1 });
/// assert_eq!(decode(0xFFFF), Instruction::Unknown(0xFFFF));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // Register-register arithmetic and logic, d and r in 0..=31
    Add { d: u8, r: u8 },
    Adc { d: u8, r: u8 },
    Sub { d: u8, r: u8 },
    Sbc { d: u8, r: u8 },
    And { d: u8, r: u8 },
    Or { d: u8, r: u8 },
    Eor { d: u8, r: u8 },

    // Register-immediate, d in 16..=31
    Subi { d: u8, k: u8 },
    Sbci { d: u8, k: u8 },
    Andi { d: u8, k: u8 },
    Ori { d: u8, k: u8 },
    Ldi { d: u8, k: u8 },

    // Register pair with 6-bit immediate, d in {24, 26, 28, 30}
    Adiw { d: u8, k: u8 },
    Sbiw { d: u8, k: u8 },

    // Single register
    Com { d: u8 },
    Neg { d: u8 },
    Inc { d: u8 },
    Dec { d: u8 },

    // Multiply, result in R1:R0
    Mul { d: u8, r: u8 },
    Muls { d: u8, r: u8 },
    Mulsu { d: u8, r: u8 },
    Fmul { d: u8, r: u8 },
    Fmuls { d: u8, r: u8 },
    Fmulsu { d: u8, r: u8 },

    /// Relative jump by `k` words.
    Rjmp { k: i16 },
    /// Branch by `k` words if SREG bit `s` is set.
    Brbs { s: u8, k: i8 },
    /// Branch by `k` words if SREG bit `s` is clear.
    Brbc { s: u8, k: i8 },

    /// Set bit `b` of I/O register `a` (I/O address, not data address).
    Sbi { a: u8, b: u8 },

    /// A word no table entry matches.
    Unknown(u16),
}

impl Instruction {
    /// The table entry this instruction was decoded from.
    pub fn opcode(&self) -> Option<Opcode> {
        use Instruction::*;

        let opcode = match self {
            Add { .. } => Opcode::Add,
            Adc { .. } => Opcode::Adc,
            Sub { .. } => Opcode::Sub,
            Sbc { .. } => Opcode::Sbc,
            And { .. } => Opcode::And,
            Or { .. } => Opcode::Or,
            Eor { .. } => Opcode::Eor,
            Subi { .. } => Opcode::Subi,
            Sbci { .. } => Opcode::Sbci,
            Andi { .. } => Opcode::Andi,
            Ori { .. } => Opcode::Ori,
            Ldi { .. } => Opcode::Ldi,
            Adiw { .. } => Opcode::Adiw,
            Sbiw { .. } => Opcode::Sbiw,
            Com { .. } => Opcode::Com,
            Neg { .. } => Opcode::Neg,
            Inc { .. } => Opcode::Inc,
            Dec { .. } => Opcode::Dec,
            Mul { .. } => Opcode::Mul,
            Muls { .. } => Opcode::Muls,
            Mulsu { .. } => Opcode::Mulsu,
            Fmul { .. } => Opcode::Fmul,
            Fmuls { .. } => Opcode::Fmuls,
            Fmulsu { .. } => Opcode::Fmulsu,
            Rjmp { .. } => Opcode::Rjmp,
            Brbs { .. } => Opcode::Brbs,
            Brbc { .. } => Opcode::Brbc,
            Sbi { .. } => Opcode::Sbi,
            Unknown(_) => return None,
        };

        Some(opcode)
    }

    /// Lowercase mnemonic, or `"???"` for an unrecognized word.
    pub fn mnemonic(&self) -> &'static str {
        self.opcode().map_or("???", Opcode::mnemonic)
    }
}

/// Decodes one instruction word.
///
/// Unmatched words decode to [`Instruction::Unknown`]; decoding never fails.
pub fn decode(word: u16) -> Instruction {
    match lookup(word) {
        Some(metadata) => extract(metadata.opcode, word),
        None => Instruction::Unknown(word),
    }
}

fn extract(opcode: Opcode, word: u16) -> Instruction {
    match opcode {
        Opcode::Add => {
            let (d, r) = register_register(word);
            Instruction::Add { d, r }
        }
        Opcode::Adc => {
            let (d, r) = register_register(word);
            Instruction::Adc { d, r }
        }
        Opcode::Sub => {
            let (d, r) = register_register(word);
            Instruction::Sub { d, r }
        }
        Opcode::Sbc => {
            let (d, r) = register_register(word);
            Instruction::Sbc { d, r }
        }
        Opcode::And => {
            let (d, r) = register_register(word);
            Instruction::And { d, r }
        }
        Opcode::Or => {
            let (d, r) = register_register(word);
            Instruction::Or { d, r }
        }
        Opcode::Eor => {
            let (d, r) = register_register(word);
            Instruction::Eor { d, r }
        }
        Opcode::Subi => {
            let (d, k) = upper_register_immediate(word);
            Instruction::Subi { d, k }
        }
        Opcode::Sbci => {
            let (d, k) = upper_register_immediate(word);
            Instruction::Sbci { d, k }
        }
        Opcode::Andi => {
            let (d, k) = upper_register_immediate(word);
            Instruction::Andi { d, k }
        }
        Opcode::Ori => {
            let (d, k) = upper_register_immediate(word);
            Instruction::Ori { d, k }
        }
        Opcode::Ldi => {
            let (d, k) = upper_register_immediate(word);
            Instruction::Ldi { d, k }
        }
        Opcode::Adiw => {
            let (d, k) = pair_immediate(word);
            Instruction::Adiw { d, k }
        }
        Opcode::Sbiw => {
            let (d, k) = pair_immediate(word);
            Instruction::Sbiw { d, k }
        }
        Opcode::Com => Instruction::Com { d: single_register(word) },
        Opcode::Neg => Instruction::Neg { d: single_register(word) },
        Opcode::Inc => Instruction::Inc { d: single_register(word) },
        Opcode::Dec => Instruction::Dec { d: single_register(word) },
        Opcode::Mul => {
            let (d, r) = register_register(word);
            Instruction::Mul { d, r }
        }
        Opcode::Muls => {
            let (d, r) = upper_register_pair(word);
            Instruction::Muls { d, r }
        }
        Opcode::Mulsu => {
            let (d, r) = middle_register_pair(word);
            Instruction::Mulsu { d, r }
        }
        Opcode::Fmul => {
            let (d, r) = middle_register_pair(word);
            Instruction::Fmul { d, r }
        }
        Opcode::Fmuls => {
            let (d, r) = middle_register_pair(word);
            Instruction::Fmuls { d, r }
        }
        Opcode::Fmulsu => {
            let (d, r) = middle_register_pair(word);
            Instruction::Fmulsu { d, r }
        }
        Opcode::Rjmp => Instruction::Rjmp {
            k: relative_offset_12(word),
        },
        Opcode::Brbs => {
            let (s, k) = status_branch(word);
            Instruction::Brbs { s, k }
        }
        Opcode::Brbc => {
            let (s, k) = status_branch(word);
            Instruction::Brbc { s, k }
        }
        Opcode::Sbi => Instruction::Sbi {
            a: ((word >> 3) & 0x1F) as u8,
            b: (word & 0x07) as u8,
        },
    }
}

/// `xxxx xxrd dddd rrrr`: 5-bit Rd and 5-bit Rr with r's high bit at bit 9.
fn register_register(word: u16) -> (u8, u8) {
    let d = (word >> 4) & 0x1F;
    let r = ((word >> 5) & 0x10) | (word & 0x0F);
    (d as u8, r as u8)
}

/// `xxxx KKKK dddd KKKK`: Rd in 16..=31 and an 8-bit immediate.
fn upper_register_immediate(word: u16) -> (u8, u8) {
    let d = 16 + ((word >> 4) & 0x0F);
    let k = ((word >> 4) & 0xF0) | (word & 0x0F);
    (d as u8, k as u8)
}

/// `xxxx xxxx KKdd KKKK`: pair base 24/26/28/30 and a 6-bit immediate.
fn pair_immediate(word: u16) -> (u8, u8) {
    let d = 24 + 2 * ((word >> 4) & 0x03);
    let k = ((word >> 2) & 0x30) | (word & 0x0F);
    (d as u8, k as u8)
}

/// `xxxx xxxd dddd xxxx`
fn single_register(word: u16) -> u8 {
    ((word >> 4) & 0x1F) as u8
}

/// `xxxx xxxx dddd rrrr`: both in 16..=31.
fn upper_register_pair(word: u16) -> (u8, u8) {
    let d = 16 + ((word >> 4) & 0x0F);
    let r = 16 + (word & 0x0F);
    (d as u8, r as u8)
}

/// `xxxx xxxx xddd xrrr`: both in 16..=23.
fn middle_register_pair(word: u16) -> (u8, u8) {
    let d = 16 + ((word >> 4) & 0x07);
    let r = 16 + (word & 0x07);
    (d as u8, r as u8)
}

/// Low 12 bits, sign-extended from bit 11.
fn relative_offset_12(word: u16) -> i16 {
    ((word << 4) as i16) >> 4
}

/// `xxxx xxkk kkkk ksss`: status bit and a 7-bit offset sign-extended from bit 6.
fn status_branch(word: u16) -> (u8, i8) {
    let s = (word & 0x07) as u8;
    let k = ((((word >> 3) & 0x7F) as u8) << 1) as i8 >> 1;
    (s, k)
}
