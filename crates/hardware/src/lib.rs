//! RV32I subset emulator library.
//!
//! This crate loads a statically linked RISC-V ELF32 executable and interprets it:
//! 1. **ISA:** Field extraction, sign extension, and disassembly for the R/I/S/B/U/J formats.
//! 2. **Core:** Register file, pc, segmented memory, and per-opcode execution handlers.
//! 3. **Simulation:** ELF loading, the fetch-execute loop, and a retirement observer hook.
//! 4. **Support:** Structured errors, JSON configuration, and execution statistics.
//!
//! ```no_run
//! use rv32emu_core::{Config, Simulator, sim::loader};
//!
//! let config = Config::default();
//! let memory = loader::load_with("program.elf", &config.memory)?;
//! let summary = Simulator::new(memory, &config).run()?;
//! println!("Number of executed instructions: {}", summary.instructions_executed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Common constants and error types.
pub mod common;
/// Emulator configuration (defaults, enums, section structures).
pub mod config;
/// Hart state, memory, execution handlers, and dispatch.
pub mod core;
/// Instruction set (fields, decode, disassembly, ABI names, RV32I encodings).
pub mod isa;
/// ELF loader and fetch-execute loop.
pub mod sim;
/// Execution statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Segmented address space built by the loader.
pub use crate::core::Memory;
/// Register file and program counter.
pub use crate::core::Processor;
/// Fetch-execute loop and its result.
pub use crate::sim::{ExecutionSummary, Simulator};
