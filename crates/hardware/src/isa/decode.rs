//! RISC-V Instruction Decoder.
//!
//! This module decodes 32-bit RISC-V instruction words into per-format field
//! structures. Decoding is pure bit extraction: each `decode_*` function reads
//! one format's fields from the word and never looks at the opcode, so the
//! caller decides which view applies.
//!
//! Immediates follow these rules:
//! - I and S: 12-bit field, sign-extended.
//! - B and J: scattered bits assembled into a 13-/21-bit value and returned
//!   unextended; [`BType::offset`] and [`JType::offset`] give the signed value.
//! - U: upper 20 bits in place, never extended.

use super::instruction::{BType, IType, InstructionBits, JType, RType, SType, UType, bits};

/// Bit position and width of the I-Type immediate (`imm[11:0]`).
const I_IMM_LSB: u32 = 20;
const I_IMM_LEN: u32 = 12;

/// S-Type immediate pieces: `imm[11:5]` at bit 25, `imm[4:0]` at bit 7.
const S_IMM_HIGH_LSB: u32 = 25;
const S_IMM_HIGH_LEN: u32 = 7;
const S_IMM_LOW_LSB: u32 = 7;
const S_IMM_LOW_LEN: u32 = 5;

/// Width of the 12-bit I/S immediates.
const IS_IMM_BITS: u32 = 12;

/// Width of the assembled B-Type offset (sign bit at position 12).
pub const B_IMM_BITS: u32 = 13;

/// Width of the assembled J-Type offset (sign bit at position 20).
pub const J_IMM_BITS: u32 = 21;

/// Sign-extends the low `width` bits of `value`.
///
/// If bit `width - 1` is set the result is `value - 2^width`, otherwise
/// `value` unchanged. Bits above `width` are ignored.
///
/// # Arguments
///
/// * `value` - Raw immediate.
/// * `width` - Number of significant bits (1-32).
pub const fn sign_extend(value: u32, width: u32) -> i32 {
    if width >= 32 {
        return value as i32;
    }
    let value = bits(value, 0, width) as i64;
    let result = if value & (1 << (width - 1)) != 0 {
        value - (1i64 << width)
    } else {
        value
    };
    result as i32
}

/// Decodes the fields of an R-type word.
pub fn decode_r(inst: u32) -> RType {
    RType {
        rd: inst.rd(),
        funct3: inst.funct3(),
        rs1: inst.rs1(),
        rs2: inst.rs2(),
        funct7: inst.funct7(),
    }
}

/// Decodes the fields of an I-type word.
///
/// I-Type format: `imm[11:0] | rs1 | funct3 | rd | opcode`
pub fn decode_i(inst: u32) -> IType {
    IType {
        rd: inst.rd(),
        funct3: inst.funct3(),
        rs1: inst.rs1(),
        imm: sign_extend(bits(inst, I_IMM_LSB, I_IMM_LEN), IS_IMM_BITS),
    }
}

/// Decodes the fields of an S-type word.
///
/// S-Type format: `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`
pub fn decode_s(inst: u32) -> SType {
    let high = bits(inst, S_IMM_HIGH_LSB, S_IMM_HIGH_LEN);
    let low = bits(inst, S_IMM_LOW_LSB, S_IMM_LOW_LEN);
    SType {
        funct3: inst.funct3(),
        rs1: inst.rs1(),
        rs2: inst.rs2(),
        imm: sign_extend((high << S_IMM_LOW_LEN) | low, IS_IMM_BITS),
    }
}

/// Decodes the fields of a B-type word.
///
/// B-Type format: `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`
pub fn decode_b(inst: u32) -> BType {
    let imm = (bits(inst, 31, 1) << 12)
        | (bits(inst, 7, 1) << 11)
        | (bits(inst, 25, 6) << 5)
        | (bits(inst, 8, 4) << 1);
    BType {
        funct3: inst.funct3(),
        rs1: inst.rs1(),
        rs2: inst.rs2(),
        imm,
    }
}

/// Decodes the fields of a U-type word.
///
/// U-Type format: `imm[31:12] | rd | opcode`
pub fn decode_u(inst: u32) -> UType {
    UType {
        rd: inst.rd(),
        imm: bits(inst, 12, 20) << 12,
    }
}

/// Decodes the fields of a J-type word.
///
/// J-Type format: `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`
pub fn decode_j(inst: u32) -> JType {
    let imm = (bits(inst, 31, 1) << 20)
        | (bits(inst, 12, 8) << 12)
        | (bits(inst, 20, 1) << 11)
        | (bits(inst, 21, 10) << 1);
    JType {
        rd: inst.rd(),
        imm,
    }
}

impl BType {
    /// Branch offset as a signed 13-bit value.
    pub const fn offset(&self) -> i32 {
        sign_extend(self.imm, B_IMM_BITS)
    }
}

impl JType {
    /// Jump offset as a signed 21-bit value.
    pub const fn offset(&self) -> i32 {
        sign_extend(self.imm, J_IMM_BITS)
    }
}
