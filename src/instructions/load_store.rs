//! # Load and Store Instructions
//!
//! - LDI: Load immediate
//! - (Future: MOV, MOVW, LD/ST with X/Y/Z, LDS, STS, LPM, IN, OUT, PUSH, POP)

use super::Retire;
use crate::opcodes::Opcode;
use crate::{Cpu, MemoryBus};

/// Executes LDI: `Rd <- K`, Rd in R16-R31.
///
/// Flags are not affected. `ldi rd, 0xFF` is the SER idiom.
pub(crate) fn execute_ldi<M: MemoryBus>(cpu: &mut Cpu<M>, d: u8, k: u8) -> Retire {
    cpu.set_register(d, k);
    Retire::next(Opcode::Ldi.base_cycles())
}
