//! # Bit Instructions
//!
//! - SBI: Set bit in I/O register
//! - (Future: CBI, BSET, BCLR, BST, BLD)

use super::Retire;
use crate::memory::IO_REGISTERS_START;
use crate::opcodes::Opcode;
use crate::{Cpu, MemoryBus};

/// Executes SBI: sets bit `b` of I/O register `a` (0-31).
///
/// The I/O address is mapped into data space by adding 0x20. Flags are not
/// affected. Cycle timing: 2 cycles.
pub(crate) fn execute_sbi<M: MemoryBus>(cpu: &mut Cpu<M>, a: u8, b: u8) -> Retire {
    let addr = IO_REGISTERS_START + a as u16;
    let value = cpu.memory().read(addr);

    cpu.memory_mut().write(addr, value | (1 << (b & 0x07)));

    Retire::next(Opcode::Sbi.base_cycles())
}
