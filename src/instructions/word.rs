//! # Register Pair Arithmetic
//!
//! - ADIW: Add immediate to word
//! - SBIW: Subtract immediate from word
//!
//! Both operate on one of the pairs R25:R24, R27:R26 (X), R29:R28 (Y) or
//! R31:R30 (Z) with a 6-bit immediate (0-63) and take two cycles. No
//! half-carry is defined for 16-bit results.

use super::Retire;
use crate::flags;
use crate::opcodes::Opcode;
use crate::{Cpu, MemoryBus};

/// Executes ADIW: `Rd+1:Rd <- Rd+1:Rd + K`.
///
/// Flags affected: S, V, N, Z, C.
pub(crate) fn execute_adiw<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, k: u8) -> Retire {
    let rd = cpu.register_pair(d);
    let result = rd.wrapping_add(k as u16);

    cpu.set_register_pair(d, result);
    cpu.update_flags(flags::add_word(rd, result));

    Retire::next(Opcode::Adiw.base_cycles())
}

/// Executes SBIW: `Rd+1:Rd <- Rd+1:Rd - K`.
///
/// Flags affected: S, V, N, Z, C.
pub(crate) fn execute_sbiw<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, k: u8) -> Retire {
    let rd = cpu.register_pair(d);
    let result = rd.wrapping_sub(k as u16);

    cpu.set_register_pair(d, result);
    cpu.update_flags(flags::sub_word(rd, result));

    Retire::next(Opcode::Sbiw.base_cycles())
}
