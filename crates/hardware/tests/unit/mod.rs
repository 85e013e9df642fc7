//! # Unit Components
//!
//! Tests grouped by the crate module they exercise.

/// Error types and their conversions.
pub mod common;



/// Field extraction, sign extension, and disassembly.
pub mod isa;
