//! # Multiply Instructions
//!
//! 8x8 -> 16 bit multiplies. The product always lands in R1:R0 (low byte in
//! R0) and every variant takes two cycles.
//!
//! | Mnemonic | Rd        | Rr        | Operands               |
//! |----------|-----------|-----------|------------------------|
//! | MUL      | R0-R31    | R0-R31    | unsigned x unsigned    |
//! | MULS     | R16-R31   | R16-R31   | signed x signed        |
//! | MULSU    | R16-R23   | R16-R23   | signed x unsigned      |
//! | FMUL     | R16-R23   | R16-R23   | unsigned, 1.7 fixed point |
//! | FMULS    | R16-R23   | R16-R23   | signed, 1.7 fixed point   |
//! | FMULSU   | R16-R23   | R16-R23   | signed x unsigned, 1.7    |
//!
//! The fractional variants shift the product left by one before storing it.
//! Their carry comes from bit 15 of the unshifted product.

use super::Retire;
use crate::flags;
use crate::opcodes::Opcode;
use crate::{Cpu, MemoryBus};

/// Register pair receiving every product.
const PRODUCT_PAIR: u8 = 0;

fn store_product<M: MemoryBus>(
    cpu: &mut Cpu<M>,
    opcode: Opcode,
    product: u16,
    fractional: bool,
) -> Retire {
    let stored = if fractional { product << 1 } else { product };

    cpu.set_register_pair(PRODUCT_PAIR, stored);
    cpu.update_flags(flags::multiply(product, stored));

    Retire::next(opcode.base_cycles())
}

fn unsigned_product(rd: u8, rr: u8) -> u16 {
    rd as u16 * rr as u16
}

fn signed_product(rd: u8, rr: u8) -> u16 {
    (rd as i8 as i16 * rr as i8 as i16) as u16
}

fn signed_unsigned_product(rd: u8, rr: u8) -> u16 {
    (rd as i8 as i16 * rr as i16) as u16
}

/// Executes MUL: `R1:R0 <- Rd x Rr` (unsigned).
///
/// Flags affected: Z, C.
pub(crate) fn execute_mul<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let product = unsigned_product(cpu.register(d), cpu.register(r));
    store_product(cpu, Opcode::Mul, product, false)
}

/// Executes MULS: `R1:R0 <- Rd x Rr` (signed).
pub(crate) fn execute_muls<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let product = signed_product(cpu.register(d), cpu.register(r));
    store_product(cpu, Opcode::Muls, product, false)
}

/// Executes MULSU: `R1:R0 <- Rd x Rr` (signed x unsigned).
pub(crate) fn execute_mulsu<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let product = signed_unsigned_product(cpu.register(d), cpu.register(r));
    store_product(cpu, Opcode::Mulsu, product, false)
}

/// Executes FMUL: `R1:R0 <- (Rd x Rr) << 1` (unsigned).
pub(crate) fn execute_fmul<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let product = unsigned_product(cpu.register(d), cpu.register(r));
    store_product(cpu, Opcode::Fmul, product, true)
}

/// Executes FMULS: `R1:R0 <- (Rd x Rr) << 1` (signed).
pub(crate) fn execute_fmuls<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let product = signed_product(cpu.register(d), cpu.register(r));
    store_product(cpu, Opcode::Fmuls, product, true)
}

/// Executes FMULSU: `R1:R0 <- (Rd x Rr) << 1` (signed x unsigned).
pub(crate) fn execute_fmulsu<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, r: u8) -> Retire {
    let product = signed_unsigned_product(cpu.register(d), cpu.register(r));
    store_product(cpu, Opcode::Fmulsu, product, true)
}
