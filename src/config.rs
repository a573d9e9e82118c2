//! # CPU Configuration
//!
//! Sizes of the two memory spaces and the stack pointer policy applied at
//! construction. The default is the ATmega328P layout:
//!
//! | Space        | Size          | Notes                                   |
//! |--------------|---------------|-----------------------------------------|
//! | Program store | 32768 bytes  | 16K instruction words                   |
//! | Data space   | 2304 bytes    | 32 registers + 64 I/O + 160 ext I/O + 2K SRAM |

use crate::memory::DATA_MEMORY_START;
use crate::Error;

/// ATmega328P program store size in bytes.
pub const ATMEGA328P_FLASH_SIZE: usize = 32 * 1024;

/// ATmega328P data space size in bytes (RAMEND = 0x08FF).
pub const ATMEGA328P_DATA_SIZE: usize = 32 + 64 + 160 + 2 * 1024;

/// How the stack pointer is initialized when a CPU is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackInit {
    /// SP points at the last byte of data memory (RAMEND).
    #[default]
    TopOfDataMemory,

    /// SP stays 0x0000 until firmware writes SPL/SPH.
    Unset,
}

/// Construction-time configuration for a [`Cpu`](crate::Cpu).
///
/// # Examples
///
/// ```
/// use libavr::{CpuConfig, StackInit};
///
/// let config = CpuConfig {
///     stack_init: StackInit::Unset,
///     ..CpuConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuConfig {
    /// Program store capacity in bytes. Must be even and non-zero.
    pub program_store_size: usize,

    /// Data space size in bytes, including the register and I/O windows.
    pub data_space_size: usize,

    /// Stack pointer policy.
    pub stack_init: StackInit,
}

impl CpuConfig {
    /// The ATmega328P layout.
    pub const fn atmega328p() -> Self {
        Self {
            program_store_size: ATMEGA328P_FLASH_SIZE,
            data_space_size: ATMEGA328P_DATA_SIZE,
            stack_init: StackInit::TopOfDataMemory,
        }
    }

    /// Checks that the sizes describe a memory layout the core can run on.
    pub fn validate(&self) -> Result<(), Error> {
        if self.program_store_size == 0 || self.program_store_size % 2 != 0 {
            return Err(Error::InvalidConfig(format!(
                "program store size must be a non-zero even number of bytes, got {}",
                self.program_store_size
            )));
        }

        if self.data_space_size < DATA_MEMORY_START as usize {
            return Err(Error::InvalidConfig(format!(
                "data space must cover registers and I/O (at least {} bytes), got {}",
                DATA_MEMORY_START, self.data_space_size
            )));
        }

        if self.data_space_size > 0x1_0000 {
            return Err(Error::InvalidConfig(format!(
                "data space cannot exceed the 16-bit address range, got {} bytes",
                self.data_space_size
            )));
        }

        Ok(())
    }

    /// The stack pointer value applied at construction.
    pub(crate) fn initial_stack_pointer(&self) -> Option<u16> {
        match self.stack_init {
            StackInit::TopOfDataMemory => Some((self.data_space_size - 1) as u16),
            StackInit::Unset => None,
        }
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self::atmega328p()
    }
}
