//! Fuzz target for CPU step execution.
//!
//! This target creates arbitrary register files and flash contents, then
//! executes a handful of instructions to find panics in decode or execute.

#![no_main]

use arbitrary::Arbitrary;
use libavr::{Cpu, MemoryBus};
use libfuzzer_sys::fuzz_target;

/// Arbitrary CPU initial state for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    /// R0-R31
    registers: [u8; 32],
    /// Status register
    sreg: u8,
    /// Stack pointer
    sp: u16,
    /// I/O register contents (0x20-0x5F, SP and SREG overwritten above)
    io: [u8; 64],
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    /// Instruction words placed at flash address 0
    words: Vec<u16>,
    /// Number of instructions to execute
    steps: u8,
}

fuzz_target!(|input: FuzzInput| {
    // Limit input size to the default program store
    if input.words.len() > 16 * 1024 {
        return;
    }

    let image: Vec<u8> = input.words.iter().flat_map(|w| w.to_le_bytes()).collect();
    let mut cpu = match Cpu::new(&image) {
        Ok(cpu) => cpu,
        Err(_) => return,
    };

    for (offset, &byte) in input.cpu_state.io.iter().enumerate() {
        cpu.memory_mut().write(0x20 + offset as u16, byte);
    }
    for (n, &value) in input.cpu_state.registers.iter().enumerate() {
        cpu.set_register(n as u8, value);
    }
    cpu.set_status(input.cpu_state.sreg);
    cpu.set_stack_pointer(input.cpu_state.sp);

    let len = cpu.program().len() as u32;

    for _ in 0..input.steps {
        let pc = cpu.pc();
        let cycles = cpu.cycles();

        cpu.step();

        // Invariants that must hold after every instruction
        assert!(cpu.pc() < len);
        assert_eq!(cpu.pc() % 2, pc % 2);
        assert!((1..=2).contains(&(cpu.cycles() - cycles)));
    }
});
