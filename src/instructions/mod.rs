//! # AVR Instruction Implementations
//!
//! One handler per mnemonic, grouped by category. A handler reads its
//! operands from data space, writes the result and the flags it defines, and
//! returns a [`Retire`] describing how far the program counter moves and
//! what the instruction cost. The driver in [`Cpu::step`](crate::Cpu::step)
//! commits both.
//!
//! ## Categories
//!
//! - **alu**: ADD, ADC, SUB, SBC, AND, OR, EOR, SUBI, SBCI, ANDI, ORI
//! - **word**: ADIW, SBIW
//! - **unary**: COM, NEG, INC, DEC
//! - **multiply**: MUL, MULS, MULSU, FMUL, FMULS, FMULSU
//! - **control**: RJMP
//! - **branches**: BRBS, BRBC
//! - **bits**: SBI
//! - **load_store**: LDI

pub mod alu;
pub mod bits;
pub mod branches;
pub mod control;
pub mod load_store;
pub mod multiply;
pub mod unary;
pub mod word;

use log::debug;

use crate::{Cpu, Instruction, MemoryBus};

/// Width of every implemented instruction in bytes.
pub(crate) const WORD_BYTES: i32 = 2;

/// Program counter movement and cycle cost of one executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Retire {
    /// Signed byte offset added to the program counter.
    pub(crate) pc_offset: i32,

    /// Cycles charged.
    pub(crate) cycles: u8,
}

impl Retire {
    /// Falls through to the next instruction.
    pub(crate) const fn next(cycles: u8) -> Self {
        Self {
            pc_offset: WORD_BYTES,
            cycles,
        }
    }

    /// Jumps `words` instruction words past the next instruction.
    pub(crate) const fn relative(words: i32, cycles: u8) -> Self {
        Self {
            pc_offset: WORD_BYTES + words * WORD_BYTES,
            cycles,
        }
    }
}

/// Runs the handler for `instruction`.
pub(crate) fn execute<M: MemoryBus>(cpu: &mut Cpu<M>, instruction: Instruction) -> Retire {
    use Instruction::*;

    match instruction {
        Add { d, r } => alu::execute_add(cpu, d, r),
        Adc { d, r } => alu::execute_adc(cpu, d, r),
        Sub { d, r } => alu::execute_sub(cpu, d, r),
        Sbc { d, r } => alu::execute_sbc(cpu, d, r),
        And { d, r } => alu::execute_and(cpu, d, r),
        Or { d, r } => alu::execute_or(cpu, d, r),
        Eor { d, r } => alu::execute_eor(cpu, d, r),
        Subi { d, k } => alu::execute_subi(cpu, d, k),
        Sbci { d, k } => alu::execute_sbci(cpu, d, k),
        Andi { d, k } => alu::execute_andi(cpu, d, k),
        Ori { d, k } => alu::execute_ori(cpu, d, k),
        Adiw { d, k } => word::execute_adiw(cpu, d, k),
        Sbiw { d, k } => word::execute_sbiw(cpu, d, k),
        Com { d } => unary::execute_com(cpu, d),
        Neg { d } => unary::execute_neg(cpu, d),
        Inc { d } => unary::execute_inc(cpu, d),
        Dec { d } => unary::execute_dec(cpu, d),
        Mul { d, r } => multiply::execute_mul(cpu, d, r),
        Muls { d, r } => multiply::execute_muls(cpu, d, r),
        Mulsu { d, r } => multiply::execute_mulsu(cpu, d, r),
        Fmul { d, r } => multiply::execute_fmul(cpu, d, r),
        Fmuls { d, r } => multiply::execute_fmuls(cpu, d, r),
        Fmulsu { d, r } => multiply::execute_fmulsu(cpu, d, r),
        Rjmp { k } => control::execute_rjmp(k),
        Brbs { s, k } => branches::execute_brbs(cpu, s, k),
        Brbc { s, k } => branches::execute_brbc(cpu, s, k),
        Sbi { a, b } => bits::execute_sbi(cpu, a, b),
        Ldi { d, k } => load_store::execute_ldi(cpu, d, k),
        Unknown(word) => {
            debug!(
                "unrecognized opcode {:#06X} ({:016b}) at {:#06X}, skipping",
                word,
                word,
                cpu.pc()
            );
            Retire::next(1)
        }
    }
}
