//! RV32 Processor State.
//!
//! This module implements the architectural state of the single emulated hart.
//! It performs the following:
//! 1. **Storage:** Maintains 32 integer registers (`x0`-`x31`) and the program counter.
//! 2. **Register-zero policy:** Treats `x0` as a plain register or as hardwired zero.
//! 3. **Debugging:** Renders the complete register state for dumps.

use std::fmt;

use crate::common::constants::{INSTRUCTION_SIZE, NUM_REGISTERS};
use crate::config::ZeroRegister;
use crate::isa::abi::{REG_NAMES, REG_ZERO};

/// Mask applied to register indices; register fields are five bits wide.
const REG_INDEX_MASK: usize = NUM_REGISTERS - 1;

/// Register file and program counter of the emulated hart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Processor {
    regs: [u32; NUM_REGISTERS],
    pc: u32,
    zero: ZeroRegister,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor {
    /// Creates a processor with every register and the pc set to zero.
    ///
    /// `x0` behaves as a plain register.
    pub fn new() -> Self {
        Self::with_zero_register(ZeroRegister::Plain)
    }

    /// Creates a zeroed processor with the given register-zero policy.
    pub fn with_zero_register(zero: ZeroRegister) -> Self {
        Self {
            regs: [0; NUM_REGISTERS],
            pc: 0,
            zero,
        }
    }

    /// Reads a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index; only the low five bits are used.
    ///
    /// # Returns
    ///
    /// The 32-bit register value. Under [`ZeroRegister::Hardwired`], `x0` reads as 0.
    #[inline]
    pub fn read_reg(&self, idx: usize) -> u32 {
        let idx = idx & REG_INDEX_MASK;
        if idx == REG_ZERO && self.zero == ZeroRegister::Hardwired {
            0
        } else {
            self.regs[idx]
        }
    }

    /// Writes a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index; only the low five bits are used.
    /// * `val` - The 32-bit value to write. Dropped for `x0` under [`ZeroRegister::Hardwired`].
    #[inline]
    pub fn write_reg(&mut self, idx: usize, val: u32) {
        let idx = idx & REG_INDEX_MASK;
        if idx == REG_ZERO && self.zero == ZeroRegister::Hardwired {
            return;
        }
        self.regs[idx] = val;
    }

    /// Returns the program counter.
    #[inline]
    pub fn read_pc(&self) -> u32 {
        self.pc
    }

    /// Sets the program counter.
    #[inline]
    pub fn write_pc(&mut self, addr: u32) {
        self.pc = addr;
    }

    /// Address of the sequentially next instruction (`pc + 4`, wrapping).
    #[inline]
    pub fn next_pc(&self) -> u32 {
        self.pc.wrapping_add(INSTRUCTION_SIZE)
    }

    /// Returns a copy of all 32 registers as stored.
    pub fn registers(&self) -> [u32; NUM_REGISTERS] {
        self.regs
    }

    /// Returns the register-zero policy.
    pub fn zero_register(&self) -> ZeroRegister {
        self.zero
    }
}

impl fmt::Display for Processor {
    /// Formats the pc and registers in pairs, hexadecimal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pc   = {:#010x}", self.pc)?;
        for i in (0..NUM_REGISTERS).step_by(2) {
            writeln!(
                f,
                "x{:<2} ({:>4}) = {:#010x}   x{:<2} ({:>4}) = {:#010x}",
                i,
                REG_NAMES[i],
                self.read_reg(i),
                i + 1,
                REG_NAMES[i + 1],
                self.read_reg(i + 1)
            )?;
        }
        Ok(())
    }
}
