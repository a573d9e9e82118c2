//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements the 8-bit arithmetic and logic operations:
//! - ADD, ADC: Add (with carry), Rd and Rr in R0-R31
//! - SUB, SBC: Subtract (with carry), Rd and Rr in R0-R31
//! - SUBI, SBCI: Subtract immediate (with carry), Rd in R16-R31
//! - AND, OR, EOR: Logical operations, Rd and Rr in R0-R31
//! - ANDI, ORI: Logical operations with immediate, Rd in R16-R31
//!
//! All of them take one cycle and store the result back into Rd.

use super::Retire;
use crate::flags::{self, Flag, FlagUpdate};
use crate::opcodes::Opcode;
use crate::{Cpu, MemoryBus};

/// Writes `result` to Rd, applies `update` and retires the instruction.
fn write_back<M: MemoryBus>(
    cpu: &mut Cpu<M>,
    opcode: Opcode,
    d: u8,
    result: u8,
    update: FlagUpdate,
) -> Retire {
    cpu.set_register(d, result);
    cpu.update_flags(update);
    Retire::next(opcode.base_cycles())
}

fn carry_in<M: MemoryBus>(cpu: &Cpu<M>) -> u8 {
    cpu.flag(Flag::Carry) as u8
}

/// Executes ADD: `Rd <- Rd + Rr`.
///
/// Flags affected: H, S, V, N, Z, C.
pub(crate) fn execute_add<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let (rd, rr) = (cpu.register(d), cpu.register(r));
    let result = rd.wrapping_add(rr);

    write_back(cpu, Opcode::Add, d, result, flags::add(rd, rr, result))
}

/// Executes ADC: `Rd <- Rd + Rr + C`.
///
/// Flags affected: H, S, V, N, Z, C.
pub(crate) fn execute_adc<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let (rd, rr) = (cpu.register(d), cpu.register(r));
    let result = rd.wrapping_add(rr).wrapping_add(carry_in(cpu));

    write_back(cpu, Opcode::Adc, d, result, flags::add(rd, rr, result))
}

/// Executes SUB: `Rd <- Rd - Rr`.
///
/// Flags affected: H, S, V, N, Z, C.
pub(crate) fn execute_sub<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let (rd, rr) = (cpu.register(d), cpu.register(r));
    let result = rd.wrapping_sub(rr);

    write_back(cpu, Opcode::Sub, d, result, flags::sub(rd, rr, result))
}

/// Executes SBC: `Rd <- Rd - Rr - C`.
///
/// Flags affected: H, S, V, N, Z, C.
pub(crate) fn execute_sbc<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let (rd, rr) = (cpu.register(d), cpu.register(r));
    let result = rd.wrapping_sub(rr).wrapping_sub(carry_in(cpu));

    write_back(cpu, Opcode::Sbc, d, result, flags::sub(rd, rr, result))
}

/// Executes SUBI: `Rd <- Rd - K`, Rd in R16-R31.
///
/// Flags affected: H, S, V, N, Z, C.
pub(crate) fn execute_subi<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, k: u8) -> Retire {
    let rd = cpu.register(d);
    let result = rd.wrapping_sub(k);

    write_back(cpu, Opcode::Subi, d, result, flags::sub(rd, k, result))
}

/// Executes SBCI: `Rd <- Rd - K - C`, Rd in R16-R31.
///
/// Flags affected: H, S, V, N, Z, C.
pub(crate) fn execute_sbci<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, k: u8) -> Retire {
    let rd = cpu.register(d);
    let result = rd.wrapping_sub(k).wrapping_sub(carry_in(cpu));

    write_back(cpu, Opcode::Sbci, d, result, flags::sub(rd, k, result))
}

/// Executes AND: `Rd <- Rd & Rr`.
///
/// Flags affected: S, V (cleared), N, Z.
pub(crate) fn execute_and<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let result = cpu.register(d) & cpu.register(r);
    write_back(cpu, Opcode::And, d, result, flags::logic(result))
}

/// Executes OR: `Rd <- Rd | Rr`.
///
/// Flags affected: S, V (cleared), N, Z.
pub(crate) fn execute_or<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let result = cpu.register(d) | cpu.register(r);
    write_back(cpu, Opcode::Or, d, result, flags::logic(result))
}

/// Executes EOR: `Rd <- Rd ^ Rr`. `eor rd, rd` is the CLR idiom.
///
/// Flags affected: S, V (cleared), N, Z.
pub(crate) fn execute_eor<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let result = cpu.register(d) ^ cpu.register(r);
    write_back(cpu, Opcode::Eor, d, result, flags::logic(result))
}

/// Executes ANDI: `Rd <- Rd & K`, Rd in R16-R31.
pub(crate) fn execute_andi<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, k: u8) -> Retire {
    let result = cpu.register(d) & k;
    write_back(cpu, Opcode::Andi, d, result, flags::logic(result))
}

/// Executes ORI: `Rd <- Rd | K`, Rd in R16-R31.
pub(crate) fn execute_ori<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, k: u8) -> Retire {
    let result = cpu.register(d) | k;
    write_back(cpu, Opcode::Ori, d, result, flags::logic(result))
}
