//! # AVR Instruction-Set Simulator Core
//!
//! A cycle-counting simulator for the 8-bit AVR core, built for clarity,
//! bit-exact flag behavior and WebAssembly portability.
//!
//! The crate fetches 16-bit words from a simulated program store, decodes them
//! against a table of mask/pattern pairs and executes them against a single
//! data space that holds the general registers, the I/O registers (stack
//! pointer and status register included) and SRAM.
//!
//! ## Quick Start
//!
//! ```rust
//! use libavr::{Cpu, Flag};
//!
//! // ldi r16, 0xFF ; inc r16
//! let image = [0x0F, 0xEF, 0x03, 0x95];
//! let mut cpu = Cpu::new(&image).unwrap();
//!
//! cpu.run(2);
//!
//! assert_eq!(cpu.register(16), 0x00);
//! assert!(cpu.flag(Flag::Zero));
//! assert_eq!(cpu.cycles(), 2);
//! ```
//!
//! Firmware usually arrives as Intel HEX:
//!
//! ```rust
//! use libavr::{hex, Cpu};
//!
//! let image = hex::parse(":020000000FEF00\n:00000001FF\n").unwrap();
//! let mut cpu = Cpu::new(&image.data).unwrap();
//! cpu.step();
//! assert_eq!(cpu.register(16), 0xFF);
//! ```
//!
//! ## Architecture
//!
//! - **Table-Driven Decode**: every supported opcode is one mask/pattern row
//!   in [`OPCODE_TABLE`]; overlapping rows resolve most-specific first
//! - **Pure Flag Rules**: each flag computation is a function of operands and
//!   result returning a [`FlagUpdate`]
//! - **Modularity**: the data space is behind the [`MemoryBus`] trait
//! - **No Fault State**: unknown words are skipped, the PC wraps at the end
//!   of flash, and every step is deterministic
//!
//! ## Modules
//!
//! - `config` - memory layout and stack pointer policy
//! - `cpu` - execution driver and state accessors
//! - `decoder` - typed instructions and operand extraction
//! - `disassembler` - listings from the same decoder the CPU uses
//! - `flags` - status register bits and flag rules
//! - `hex` - Intel HEX loader
//! - `memory` - data space and program store
//! - `opcodes` - opcode metadata table

pub mod config;
pub mod cpu;
pub mod decoder;
pub mod disassembler;
pub mod flags;
pub mod hex;
pub mod memory;
pub mod opcodes;

// Internal instruction implementations (not part of public API)
mod instructions;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export public API
pub use config::{CpuConfig, StackInit};
pub use cpu::Cpu;
pub use decoder::{decode, Instruction};
pub use disassembler::{disassemble, DisassembledInstruction, DisassemblyOptions};
pub use flags::{Flag, FlagUpdate};
pub use hex::{HexError, HexImage};
pub use memory::{DataSpace, MemoryBus, ProgramStore};
pub use opcodes::{Opcode, OpcodeMetadata, DECODE_ORDER, OPCODE_TABLE};

/// Errors raised while building a [`Cpu`].
///
/// Execution itself cannot fail; these only come out of construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The memory layout is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The program image does not fit in the program store.
    #[error("program image of {image_len} bytes exceeds {capacity} byte program store")]
    ImageTooLarge { image_len: usize, capacity: usize },
}
