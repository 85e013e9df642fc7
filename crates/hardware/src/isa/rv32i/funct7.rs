//! RISC-V Base Integer (I) Function Codes (funct7).
//!
//! The `funct7` field (bits 31-25) is used in R-type instructions to
//! distinguish between operations that share the same `funct3`.

/// Default operation (ADD).
pub const DEFAULT: u32 = 0b0000000;

/// Multiply, sharing funct3 `000` with ADD.
pub const MUL: u32 = 0b0000001;
