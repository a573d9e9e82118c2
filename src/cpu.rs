//! # CPU State and Execution
//!
//! This module contains the [`Cpu`] struct and the fetch-decode-execute loop.
//!
//! ## CPU State
//!
//! The CPU owns:
//! - **Program store**: the flash image, fetched one 16-bit word at a time
//! - **Data space**: registers, I/O registers (including SP and SREG) and SRAM
//! - **Program counter**: byte address into the program store
//! - **Cycle counter**: u64, monotonically increasing
//!
//! The general registers, stack pointer and status register have no storage
//! of their own. They live at their data-space addresses, so firmware that
//! writes SREG through its I/O address and an instruction that updates flags
//! see the same byte.
//!
//! ## Execution Model
//!
//! - [`Cpu::step`]: execute one instruction
//! - [`Cpu::run`]: execute a fixed number of instructions
//! - [`Cpu::run_for_cycles`]: execute until a cycle budget is spent
//!
//! There is no halted or fault state. A word that matches no known
//! instruction is skipped as a one-cycle no-op, and the program counter
//! wraps at the end of the program store.

use log::{debug, trace};

use crate::config::CpuConfig;
use crate::flags::{Flag, FlagUpdate};
use crate::instructions;
use crate::memory::{
    DataSpace, MemoryBus, ProgramStore, IO_REGISTERS_END, IO_REGISTERS_START, SPL, SREG,
};
use crate::{decode, Error, Instruction};

/// Number of general purpose registers.
pub const REGISTER_COUNT: u8 = 32;

/// Number of I/O registers addressable by the short I/O forms.
pub const IO_REGISTER_COUNT: usize = (IO_REGISTERS_END - IO_REGISTERS_START) as usize;

/// AVR CPU state and execution context.
///
/// Generic over the data-space implementation via [`MemoryBus`]; the default
/// is the flat [`DataSpace`].
///
/// # Examples
///
/// ```
/// use libavr::Cpu;
///
/// // ldi r16, 0x2A ; inc r16
/// let mut cpu = Cpu::new(&[0x0A, 0xE2, 0x03, 0x95]).unwrap();
///
/// cpu.step();
/// cpu.step();
///
/// assert_eq!(cpu.register(16), 0x2B);
/// assert_eq!(cpu.pc(), 4);
/// assert_eq!(cpu.cycles(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Cpu<M: MemoryBus = DataSpace> {
    /// Byte address of the next instruction
    pc: u32,

    /// Total cycles executed
    cycles: u64,

    /// Flash image
    program: ProgramStore,

    /// Registers, I/O and SRAM
    memory: M,
}

impl Cpu<DataSpace> {
    /// Creates a CPU with the default (ATmega328P) layout and `image` loaded
    /// at program address 0.
    ///
    /// # Errors
    ///
    /// [`Error::ImageTooLarge`] if the image exceeds the program store.
    pub fn new(image: &[u8]) -> Result<Self, Error> {
        Self::with_config(image, CpuConfig::default())
    }

    /// Creates a CPU with an explicit memory layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use libavr::{Cpu, CpuConfig, StackInit};
    ///
    /// let config = CpuConfig {
    ///     stack_init: StackInit::Unset,
    ///     ..CpuConfig::default()
    /// };
    /// let cpu = Cpu::with_config(&[], config).unwrap();
    /// assert_eq!(cpu.stack_pointer(), 0x0000);
    ///
    /// let cpu = Cpu::new(&[]).unwrap();
    /// assert_eq!(cpu.stack_pointer(), 0x08FF);
    /// ```
    pub fn with_config(image: &[u8], config: CpuConfig) -> Result<Self, Error> {
        config.validate()?;
        let memory = DataSpace::new(config.data_space_size);
        Self::with_memory(image, config, memory)
    }
}

impl<M: MemoryBus> Cpu<M> {
    /// Creates a CPU over a caller-supplied data space.
    ///
    /// `config.data_space_size` is taken from `memory.size()`; the rest of
    /// the configuration applies as given.
    pub fn with_memory(image: &[u8], config: CpuConfig, memory: M) -> Result<Self, Error> {
        let config = CpuConfig {
            data_space_size: memory.size(),
            ..config
        };
        config.validate()?;

        let program =
            ProgramStore::new(image, config.program_store_size).ok_or(Error::ImageTooLarge {
                image_len: image.len(),
                capacity: config.program_store_size,
            })?;

        let mut cpu = Self {
            pc: 0,
            cycles: 0,
            program,
            memory,
        };

        if let Some(sp) = config.initial_stack_pointer() {
            cpu.set_stack_pointer(sp);
        }

        debug!(
            "cpu ready: {} byte image, {} byte program store, {} byte data space, SP={:#06X}",
            image.len(),
            config.program_store_size,
            config.data_space_size,
            cpu.stack_pointer()
        );

        Ok(cpu)
    }

    /// Executes one instruction and returns what was executed.
    ///
    /// Performs the fetch-decode-execute cycle:
    /// 1. Fetch the 16-bit word at PC from the program store
    /// 2. Decode it against the opcode table, most specific pattern first
    /// 3. Run the handler, which updates data space and SREG
    /// 4. Add the handler's cycle cost and PC offset
    /// 5. Reduce PC modulo the program store size
    ///
    /// Unrecognized words come back as [`Instruction::Unknown`] after being
    /// skipped: PC advances by 2 and one cycle is charged.
    ///
    /// # Examples
    ///
    /// ```
    /// use libavr::{Cpu, Instruction};
    ///
    /// let mut cpu = Cpu::new(&[0x00, 0x00]).unwrap(); // nop, not implemented
    ///
    /// assert_eq!(cpu.step(), Instruction::Unknown(0x0000));
    /// assert_eq!(cpu.pc(), 2);
    /// assert_eq!(cpu.cycles(), 1);
    /// ```
    pub fn step(&mut self) -> Instruction {
        let word = self.program.fetch(self.pc as usize);
        let instruction = decode(word);

        trace!(
            "{:#06X}: {:04X} {}",
            self.pc,
            word,
            instruction.mnemonic()
        );

        let retire = instructions::execute(self, instruction);

        self.cycles += retire.cycles as u64;
        let len = self.program.len() as i64;
        self.pc = (self.pc as i64 + retire.pc_offset as i64).rem_euclid(len) as u32;

        instruction
    }

    /// Executes `steps` instructions.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Runs until at least `cycle_budget` cycles have elapsed.
    ///
    /// Returns the cycles actually consumed, which can exceed the budget by
    /// the cost of the last instruction.
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> u64 {
        let start_cycles = self.cycles;
        let target_cycles = start_cycles.saturating_add(cycle_budget);

        while self.cycles < target_cycles {
            self.step();
        }

        self.cycles - start_cycles
    }

    // ========== Program Counter and Cycles ==========

    /// Byte address of the next instruction.
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Sets the program counter, reduced modulo the program store size.
    pub fn set_pc(&mut self, pc: u32) {
        self.pc = (pc as usize % self.program.len()) as u32;
    }

    /// Total cycles executed since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    // ========== Registers ==========

    /// Returns general register `Rn`.
    ///
    /// Panics if `n` is not in 0..=31.
    pub fn register(&self, n: u8) -> u8 {
        self.memory.read(register_address(n))
    }

    /// Sets general register `Rn`.
    pub fn set_register(&mut self, n: u8, value: u8) {
        self.memory.write(register_address(n), value);
    }

    /// Returns the little-endian pair `Rn+1:Rn`.
    pub fn register_pair(&self, n: u8) -> u16 {
        self.memory.read_u16(pair_address(n))
    }

    /// Sets the little-endian pair `Rn+1:Rn`.
    pub fn set_register_pair(&mut self, n: u8, value: u16) {
        self.memory.write_u16(pair_address(n), value);
    }

    /// All 32 general registers, R0 first.
    pub fn registers(&self) -> [u8; REGISTER_COUNT as usize] {
        let mut registers = [0; REGISTER_COUNT as usize];
        for (n, register) in registers.iter_mut().enumerate() {
            *register = self.register(n as u8);
        }
        registers
    }

    // ========== Stack Pointer and Status Register ==========

    /// Stack pointer, read from SPH:SPL as one 16-bit value.
    pub fn stack_pointer(&self) -> u16 {
        self.memory.read_u16(SPL)
    }

    /// Writes SPL and SPH together.
    pub fn set_stack_pointer(&mut self, sp: u16) {
        self.memory.write_u16(SPL, sp);
    }

    /// Status register as a packed byte (ITHSVNZC).
    pub fn status(&self) -> u8 {
        self.memory.read(SREG)
    }

    /// Overwrites the whole status register.
    pub fn set_status(&mut self, value: u8) {
        self.memory.write(SREG, value);
    }

    /// Returns true if `flag` is set in SREG.
    pub fn flag(&self, flag: Flag) -> bool {
        self.status() & flag.mask() != 0
    }

    /// Sets or clears one SREG bit.
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let update = FlagUpdate::new().with(flag, value);
        self.update_flags(update);
    }

    /// Writes exactly the flags `update` defines.
    pub(crate) fn update_flags(&mut self, update: FlagUpdate) {
        let status = update.apply(self.status());
        self.set_status(status);
    }

    // ========== Memory Access ==========

    /// The data space.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Mutable access to the data space.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Snapshot of the whole data space, address 0 first.
    pub fn data(&self) -> Vec<u8> {
        match self.memory.as_slice() {
            Some(bytes) => bytes.to_vec(),
            None => (0..self.memory.size())
                .map(|addr| self.memory.read(addr as u16))
                .collect(),
        }
    }

    /// The 64 I/O registers, 0x20 first.
    pub fn io_registers(&self) -> [u8; IO_REGISTER_COUNT] {
        let mut io = [0; IO_REGISTER_COUNT];
        for (offset, register) in io.iter_mut().enumerate() {
            *register = self.memory.read(IO_REGISTERS_START + offset as u16);
        }
        io
    }

    /// The program store.
    pub fn program(&self) -> &ProgramStore {
        &self.program
    }
}

/// Data-space address of register `Rn`.
fn register_address(n: u8) -> u16 {
    assert!(n < REGISTER_COUNT, "register R{} does not exist", n);
    n as u16
}

/// Data-space address of the low register of pair `Rn+1:Rn`.
fn pair_address(n: u8) -> u16 {
    assert!(
        n < REGISTER_COUNT - 1,
        "register pair R{}:R{} does not exist",
        n as u16 + 1,
        n
    );
    n as u16
}
