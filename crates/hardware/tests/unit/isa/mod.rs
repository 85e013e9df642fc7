//! # ISA Unit Tests
//!
//! Instruction field extraction, immediate sign extension, and disassembly.
