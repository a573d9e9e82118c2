//! # Control Flow Instructions
//!
//! - RJMP: Relative jump
//! - (Future: IJMP, JMP, RCALL, ICALL, CALL, RET, RETI)
//!
//! RJMP carries a 12-bit signed word offset, so it reaches -2048..=2047
//! words around the following instruction. It never touches data space or
//! flags.

use super::Retire;
use crate::opcodes::Opcode;

/// Executes RJMP: `PC <- PC + 2 * k + 2`.
///
/// Cycle timing: 2 cycles (fixed). `rjmp .-2` (k = -1) lands on itself.
pub(crate) fn execute_rjmp(k: i16) -> Retire {
    Retire::relative(k as i32, Opcode::Rjmp.base_cycles())
}
