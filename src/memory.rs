//! # Memory Model
//!
//! The AVR exposes two address spaces to the core:
//!
//! - **Data space**: one flat byte array that unifies the general registers,
//!   the I/O registers and SRAM. Every instruction operand resolves to an
//!   address in this space.
//! - **Program store**: the flash image instructions are fetched from,
//!   padded with the erased-cell value 0xFF.
//!
//! | Region            | Address range  | Contents                                   |
//! |-------------------|----------------|--------------------------------------------|
//! | General registers | 0x0000-0x001F  | R0-R31; R24..R31 double as W, X, Y, Z pairs |
//! | I/O registers     | 0x0020-0x005F  | SPL (0x5D), SPH (0x5E), SREG (0x5F)         |
//! | Extended I/O      | 0x0060-0x00FF  | peripheral registers                        |
//! | Data memory       | 0x0100-end     | SRAM; stack grows down from the top         |
//!
//! Data-space accesses are bounds-checked. An address outside the space is a
//! defect in the core, so [`DataSpace`] panics rather than wrapping.

/// First I/O register address in data space.
pub const IO_REGISTERS_START: u16 = 0x20;

/// One past the last I/O register address.
pub const IO_REGISTERS_END: u16 = 0x60;

/// First SRAM address in data space.
pub const DATA_MEMORY_START: u16 = 0x100;

/// Stack pointer low byte.
pub const SPL: u16 = 0x5D;

/// Stack pointer high byte.
pub const SPH: u16 = 0x5E;

/// Status register.
pub const SREG: u16 = 0x5F;

/// Value of an erased flash cell.
pub const ERASED_FLASH: u8 = 0xFF;

/// Byte-addressable data space seen by the CPU.
///
/// Implementations back the general registers, the I/O window and SRAM. The
/// CPU accesses all of them through this trait, so a caller can substitute a
/// bus that observes or maps I/O writes.
///
/// # Examples
///
/// ```
/// use libavr::{DataSpace, MemoryBus};
///
/// let mut mem = DataSpace::new(0x900);
/// mem.write_u16(0x5D, 0x08FF);
///
/// assert_eq!(mem.read(0x5D), 0xFF);
/// assert_eq!(mem.read(0x5E), 0x08);
/// assert_eq!(mem.read_u16(0x5D), 0x08FF);
/// ```
pub trait MemoryBus {
    /// Reads the byte at `addr`.
    ///
    /// Panics if `addr` is outside the data space.
    fn read(&self, addr: u16) -> u8;

    /// Writes `value` to `addr`.
    ///
    /// Panics if `addr` is outside the data space.
    fn write(&mut self, addr: u16, value: u8);

    /// Number of addressable bytes.
    fn size(&self) -> usize;

    /// Reads a little-endian 16-bit value from `addr` and `addr + 1`.
    fn read_u16(&self, addr: u16) -> u16 {
        let low = self.read(addr);
        let high = self.read(high_byte_address(addr));
        u16::from_le_bytes([low, high])
    }

    /// Writes a little-endian 16-bit value to `addr` and `addr + 1`.
    fn write_u16(&mut self, addr: u16, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.write(addr, low);
        self.write(high_byte_address(addr), high);
    }

    /// Raw view of the whole space, if the implementation has one.
    fn as_slice(&self) -> Option<&[u8]> {
        None
    }
}

fn high_byte_address(addr: u16) -> u16 {
    match addr.checked_add(1) {
        Some(next) => next,
        None => panic!("16-bit access at {:#06X} runs past the address space", addr),
    }
}

/// Flat, zero-initialized data space.
///
/// # Examples
///
/// ```
/// use libavr::{DataSpace, MemoryBus};
///
/// let mut mem = DataSpace::new(0x900);
/// mem.write(0x0100, 0x42);
/// assert_eq!(mem.read(0x0100), 0x42);
/// assert_eq!(mem.size(), 0x900);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSpace {
    bytes: Vec<u8>,
}

impl DataSpace {
    /// Creates a data space of `size` bytes, all zero.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// All bytes of the space.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    fn index(&self, addr: u16) -> usize {
        let index = addr as usize;
        if index >= self.bytes.len() {
            panic!(
                "data space access out of bounds: address {:#06X}, size {:#06X}",
                addr,
                self.bytes.len()
            );
        }
        index
    }
}

impl MemoryBus for DataSpace {
    fn read(&self, addr: u16) -> u8 {
        self.bytes[self.index(addr)]
    }

    fn write(&mut self, addr: u16, value: u8) {
        let index = self.index(addr);
        self.bytes[index] = value;
    }

    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn as_slice(&self) -> Option<&[u8]> {
        Some(&self.bytes)
    }
}

/// Flash image the CPU fetches instruction words from.
///
/// The image is loaded at address 0 and the remainder is filled with 0xFF.
/// The store is immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramStore {
    bytes: Vec<u8>,
}

impl ProgramStore {
    /// Builds a store of `capacity` bytes holding `image` at address 0.
    ///
    /// Returns `None` if the image does not fit.
    pub fn new(image: &[u8], capacity: usize) -> Option<Self> {
        if image.len() > capacity {
            return None;
        }

        let mut bytes = vec![ERASED_FLASH; capacity];
        bytes[..image.len()].copy_from_slice(image);
        Some(Self { bytes })
    }

    /// Fetches the little-endian instruction word at byte address `addr`.
    ///
    /// The high byte of a word straddling the end of the store comes from
    /// address 0.
    pub fn fetch(&self, addr: usize) -> u16 {
        let len = self.bytes.len();
        let low = self.bytes[addr % len];
        let high = self.bytes[(addr + 1) % len];
        u16::from_le_bytes([low, high])
    }

    /// Store capacity in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the store has no capacity.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// All bytes of the store.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
