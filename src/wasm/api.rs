//! WASM API for the AVR simulator.
//!
//! Provides JavaScript-callable interfaces for loading firmware, stepping the
//! CPU, inspecting state and disassembling flash.

use crate::disassembler::formatter::format_instruction;
use crate::{disassemble, hex, Cpu, CpuConfig, DisassemblyOptions, Flag};
use wasm_bindgen::prelude::*;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl JsError {
    fn from_display(error: impl std::fmt::Display) -> JsError {
        JsError {
            message: error.to_string(),
        }
    }
}

/// One line of a flash listing
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct DisassemblyLine {
    address: u32,
    bytes: Vec<u8>,
    mnemonic: String,
    text: String,
}

#[wasm_bindgen]
impl DisassemblyLine {
    #[wasm_bindgen(getter)]
    pub fn address(&self) -> u32 {
        self.address
    }

    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mnemonic(&self) -> String {
        self.mnemonic.clone()
    }

    /// Full assembler text, e.g. `ldi r16, 0xFF`
    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.text.clone()
    }
}

/// Main emulator interface for JavaScript
#[wasm_bindgen]
pub struct AvrEmulator {
    cpu: Cpu,
    image: Vec<u8>,
}

#[wasm_bindgen]
impl AvrEmulator {
    /// Create an ATmega328P-sized emulator with a raw flash image
    #[wasm_bindgen(constructor)]
    pub fn new(image: &[u8]) -> Result<AvrEmulator, JsError> {
        let cpu = Cpu::new(image).map_err(JsError::from_display)?;
        Ok(AvrEmulator {
            cpu,
            image: image.to_vec(),
        })
    }

    /// Create an emulator from Intel HEX text
    pub fn from_hex(text: &str) -> Result<AvrEmulator, JsError> {
        let capacity = CpuConfig::default().program_store_size;
        let image = hex::parse_with_capacity(text, capacity).map_err(JsError::from_display)?;
        AvrEmulator::new(&image.data)
    }

    /// Execute a single instruction and return its cycle cost
    pub fn step(&mut self) -> u8 {
        let before = self.cpu.cycles();
        self.cpu.step();
        (self.cpu.cycles() - before) as u8
    }

    /// Execute `steps` instructions
    pub fn run(&mut self, steps: u32) {
        self.cpu.run(steps as u64);
    }

    /// Execute until at least `cycles` cycles have elapsed
    pub fn run_for_cycles(&mut self, cycles: u32) -> u32 {
        self.cpu.run_for_cycles(cycles as u64) as u32
    }

    /// Reload the original image into a fresh CPU
    pub fn reset(&mut self) -> Result<(), JsError> {
        self.cpu = Cpu::new(&self.image).map_err(JsError::from_display)?;
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u32 {
        self.cpu.pc()
    }

    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> f64 {
        self.cpu.cycles() as f64 // Convert u64 to f64 for JavaScript
    }

    #[wasm_bindgen(getter)]
    pub fn status(&self) -> u8 {
        self.cpu.status()
    }

    #[wasm_bindgen(getter)]
    pub fn stack_pointer(&self) -> u16 {
        self.cpu.stack_pointer()
    }

    /// SREG bit `index` (0 = C ... 7 = I)
    pub fn flag(&self, index: u8) -> bool {
        self.cpu.flag(Flag::from_index(index))
    }

    /// R0-R31
    pub fn registers(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(&self.cpu.registers()[..])
    }

    /// The whole data space, address 0 first
    pub fn data(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(&self.cpu.data()[..])
    }

    /// Set the program counter
    pub fn set_pc(&mut self, pc: u32) {
        self.cpu.set_pc(pc);
    }

    /// Set general register `Rn`
    pub fn set_register(&mut self, n: u8, value: u8) -> Result<(), JsError> {
        if n >= crate::cpu::REGISTER_COUNT {
            return Err(JsError::new(&format!("register R{} does not exist", n)));
        }
        self.cpu.set_register(n, value);
        Ok(())
    }

    /// Disassemble `count` words of flash starting at byte address `pc`
    pub fn disassemble_at(&self, pc: u32, count: u32) -> Vec<JsValue> {
        let flash = self.cpu.program().bytes();
        let start = (pc as usize & !1).min(flash.len());
        let end = start.saturating_add(count as usize * 2).min(flash.len());

        let opts = DisassemblyOptions {
            start_address: start as u32,
            hex_dump: false,
            show_offsets: false,
        };

        disassemble(&flash[start..end], opts)
            .iter()
            .map(|instr| {
                let line = DisassemblyLine {
                    address: instr.address,
                    bytes: instr.bytes.clone(),
                    mnemonic: instr.mnemonic.to_string(),
                    text: format_instruction(instr),
                };
                JsValue::from(line)
            })
            .collect()
    }
}
