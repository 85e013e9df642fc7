//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains definitions for opcodes, function codes, field extraction, and
//! decoding logic for the RV32I subset the emulator executes.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Per-format field decoding and sign extension.
pub mod decode;

/// Instruction disassembler for debug tracing and diagnostics.
pub mod disasm;

/// Instruction format tags, field views, and the bit-extraction primitive.
pub mod instruction;

/// Base integer instruction set encodings.
pub mod rv32i;
