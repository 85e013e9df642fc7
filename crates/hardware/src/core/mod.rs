//! Emulated hart.
//!
//! This module holds the architectural state and the instruction semantics:
//! the register file and pc, the segmented address space, the per-opcode
//! execution handlers, and the table that dispatches to them.

/// Opcode-to-handler dispatch table.
pub mod dispatch;

/// Per-opcode execution handlers and the load/store width tables.
pub mod execute;

/// Segmented little-endian address space.
pub mod memory;

/// Register file, program counter, and register-zero policy.
pub mod processor;

pub use self::dispatch::DispatchTable;
pub use self::memory::{Memory, Segment, Width};
pub use self::processor::Processor;
