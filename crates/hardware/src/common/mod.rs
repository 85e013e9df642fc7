//! Common utilities and types used throughout the emulator.
//!
//! This module provides fundamental building blocks shared by all components. It includes:
//! 1. **Constants:** Instruction, ELF, and memory-layout constants.
//! 2. **Error Handling:** Load errors, memory errors, handler errors, and run faults.

/// Common constants used throughout the emulator.
pub mod constants;

/// Error types and fault definitions.
pub mod error;

pub use constants::{
    DEFAULT_MAX_IMAGE_SIZE, DEFAULT_STACK_SIZE, DEFAULT_STACK_TOP, INSTRUCTION_SIZE,
};
pub use error::{ConfigError, ExecError, Fault, FaultKind, LoadError, MemoryError};
