//! # Branch Instructions
//!
//! - BRBS: Branch if status flag set
//! - BRBC: Branch if status flag clear
//!
//! Every conditional branch mnemonic (BREQ, BRNE, BRCS, BRLT, ...) is an alias
//! of one of these two with a fixed flag index. The offset is a 7-bit signed
//! word count relative to the following instruction.
//!
//! Cycle timing differs between the two when the branch is not taken:
//!
//! | Instruction | Taken | Not taken |
//! |-------------|-------|-----------|
//! | BRBS        | 2     | 1         |
//! | BRBC        | 2     | 2         |

use super::Retire;
use crate::flags::Flag;
use crate::opcodes::Opcode;
use crate::{Cpu, MemoryBus};

/// Cycle cost of a taken branch.
const TAKEN_CYCLES: u8 = 2;

fn branch_if(opcode: Opcode, taken: bool, k: i8) -> Retire {
    if taken {
        Retire::relative(k as i32, TAKEN_CYCLES)
    } else {
        Retire::next(opcode.base_cycles())
    }
}

/// Executes BRBS: branch by `k` words if SREG bit `s` is 1.
pub(crate) fn execute_brbs<M: MemoryBus>(cpu: &mut Cpu<M>, s: u8, k: i8) -> Retire {
    let taken = cpu.flag(Flag::from_index(s));
    branch_if(Opcode::Brbs, taken, k)
}

/// Executes BRBC: branch by `k` words if SREG bit `s` is 0.
pub(crate) fn execute_brbc<M: MemoryBus>(cpu: &mut Cpu<M>, s: u8, k: i8) -> Retire {
    let taken = !cpu.flag(Flag::from_index(s));
    branch_if(Opcode::Brbc, taken, k)
}
