//! Global Emulator Constants.
//!
//! This module defines constants shared across the emulator. It includes:
//! 1. **Instruction Constants:** Instruction size and the opcode mask.
//! 2. **ELF Constants:** The machine identifier accepted by the loader.
//! 3. **Memory Constants:** Default placement and size of the stack region, and the
//!    default cap on mapped image memory.

/// Size of a standard (32-bit) RISC-V instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Bit mask for extracting the opcode field from a RISC-V instruction.
pub const OPCODE_MASK: u32 = 0x7F;

/// Number of distinct opcode values (7-bit field).
pub const OPCODE_COUNT: usize = 128;

/// Number of general-purpose registers.
pub const NUM_REGISTERS: usize = 32;

/// ELF `e_machine` value for RISC-V.
pub const EM_RISCV: u16 = object::elf::EM_RISCV;

/// Default top-of-stack address loaded into `sp` at startup.
///
/// Kept 16-byte aligned, as the RISC-V calling convention requires.
pub const DEFAULT_STACK_TOP: u32 = 0x7FFF_FFF0;

/// Default size of the zero-filled stack region below `DEFAULT_STACK_TOP` (64 KiB).
pub const DEFAULT_STACK_SIZE: u32 = 64 * 1024;

/// Default cap on the total bytes mapped for one image, stack included (256 MiB).
pub const DEFAULT_MAX_IMAGE_SIZE: u64 = 256 * 1024 * 1024;
