//! # Single Register Instructions
//!
//! This module implements operations on one register, R0-R31:
//! - COM: One's complement
//! - NEG: Two's complement
//! - INC: Increment
//! - DEC: Decrement
//!
//! INC and DEC leave the carry flag alone so they can drive loop counters in
//! multi-byte arithmetic.

use super::Retire;
use crate::flags::{self, FlagUpdate};
use crate::opcodes::Opcode;
use crate::{Cpu, MemoryBus};

fn apply<M: MemoryBus>(
    cpu: &mut Cpu<M>,
    opcode: Opcode,
    d: u8,
    op: impl FnOnce(u8) -> (u8, FlagUpdate),
) -> Retire {
    let (result, update) = op(cpu.register(d));

    cpu.set_register(d, result);
    cpu.update_flags(update);

    Retire::next(opcode.base_cycles())
}

/// Executes COM: `Rd <- 0xFF - Rd`.
///
/// Flags affected: S, V (cleared), N, Z, C (set).
pub(crate) fn execute_com<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8) -> Retire {
    apply(cpu, Opcode::Com, d, |rd| {
        let result = !rd;
        (result, flags::com(result))
    })
}

/// Executes NEG: `Rd <- 0x00 - Rd`. 0x80 negates to itself and sets V.
///
/// Flags affected: H, S, V, N, Z, C.
pub(crate) fn execute_neg<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8) -> Retire {
    apply(cpu, Opcode::Neg, d, |rd| {
        let result = rd.wrapping_neg();
        (result, flags::neg(rd, result))
    })
}

/// Executes INC: `Rd <- Rd + 1`.
///
/// Flags affected: S, V, N, Z.
pub(crate) fn execute_inc<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8) -> Retire {
    apply(cpu, Opcode::Inc, d, |rd| {
        let result = rd.wrapping_add(1);
        (result, flags::inc(rd, result))
    })
}

/// Executes DEC: `Rd <- Rd - 1`.
///
/// Flags affected: S, V, N, Z.
pub(crate) fn execute_dec<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8) -> Retire {
    apply(cpu, Opcode::Dec, d, |rd| {
        let result = rd.wrapping_sub(1);
        (result, flags::dec(rd, result))
    })
}
