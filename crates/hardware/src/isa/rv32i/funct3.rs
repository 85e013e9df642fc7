//! RISC-V Base Integer (I) Function Codes (funct3).
//!
//! The `funct3` field (bits 14-12) distinguishes between instructions sharing
//! the same major opcode (e.g., LB vs LH, BEQ vs BNE).
//!
//! The ALU encodings below are the emulator's own: immediate arithmetic maps
//! `001` to shift-left and `010` to subtract, and register arithmetic maps
//! `010` to subtract. Canonical RV32I assigns SLLI/SLTI and SLT to these slots.

/// Load Byte (signed).
pub const LB: u32 = 0b000;
/// Load Halfword (signed).
pub const LH: u32 = 0b001;
/// Load Word.
pub const LW: u32 = 0b010;
/// Load Byte Unsigned.
pub const LBU: u32 = 0b100;
/// Load Halfword Unsigned.
pub const LHU: u32 = 0b101;

/// Store Byte.
pub const SB: u32 = 0b000;
/// Store Halfword.
pub const SH: u32 = 0b001;
/// Store Word.
pub const SW: u32 = 0b010;

/// Branch Equal.
pub const BEQ: u32 = 0b000;
/// Branch Not Equal.
pub const BNE: u32 = 0b001;
/// Branch Less Than (signed).
pub const BLT: u32 = 0b100;
/// Branch Greater or Equal (signed).
pub const BGE: u32 = 0b101;
/// Branch Less Than Unsigned.
pub const BLTU: u32 = 0b110;
/// Branch Greater or Equal Unsigned.
pub const BGEU: u32 = 0b111;

/// Add immediate.
pub const ADDI: u32 = 0b000;
/// Shift left by the low five immediate bits.
pub const SHLI: u32 = 0b001;
/// Subtract immediate.
pub const SUBI: u32 = 0b010;

/// Add / Multiply (selected by funct7).
pub const ADD_MUL: u32 = 0b000;
/// Subtract.
pub const SUB: u32 = 0b010;
