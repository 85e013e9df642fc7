//! RISC-V Base Integer Instruction Set (RV32I subset).
//!
//! Defines the encodings the emulator understands.
//!
//! # Structure
//!
//! - `opcodes`: Major opcodes (Load, Store, Branch, Jal, OpImm, OpReg, Lui).
//! - `funct3`: Minor opcodes distinguishing instructions within a major opcode.
//! - `funct7`: Additional opcode bits for R-type instructions.

/// Function code 3 definitions.
pub mod funct3;

/// Function code 7 definitions.
pub mod funct7;

/// Major opcodes.
pub mod opcodes;
