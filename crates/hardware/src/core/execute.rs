//! Execution Engine.
//!
//! One handler per opcode class. Every handler has the same shape,
//! `(memory, processor, instruction word) -> next pc`, decodes its own operands,
//! and confines side effects to register and memory writes. The loop writes the
//! returned address into the pc; handlers never do.
//!
//! All arithmetic wraps modulo 2^32. Unhandled funct3/funct7 combinations fail
//! with [`ExecError::UnimplementedOperation`] before any state is modified.

use crate::common::error::ExecError;
use crate::core::memory::{Memory, Width};
use crate::core::processor::Processor;
use crate::isa::abi::REG_RA;
use crate::isa::decode::{decode_b, decode_i, decode_j, decode_r, decode_s, decode_u, sign_extend};
use crate::isa::instruction::InstructionBits;
use crate::isa::rv32i::{funct3 as f3, funct7 as f7};

/// Signature shared by all execution handlers.
pub type Handler = fn(&mut Memory, &mut Processor, u32) -> Result<u32, ExecError>;

/// Width and extension of a load, selected by funct3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOp {
    /// Access width.
    pub width: Width,
    /// Sign-extend (`true`) or zero-extend (`false`) to 32 bits.
    pub signed: bool,
}

/// Load table: funct3 to access width and extension.
pub const fn load_op(funct3: u32) -> Option<LoadOp> {
    let (width, signed) = match funct3 {
        f3::LB => (Width::Byte, true),
        f3::LH => (Width::Half, true),
        f3::LW => (Width::Word, false),
        f3::LBU => (Width::Byte, false),
        f3::LHU => (Width::Half, false),
        _ => return None,
    };
    Some(LoadOp { width, signed })
}

/// Store table: funct3 to access width.
pub const fn store_width(funct3: u32) -> Option<Width> {
    match funct3 {
        f3::SB => Some(Width::Byte),
        f3::SH => Some(Width::Half),
        f3::SW => Some(Width::Word),
        _ => None,
    }
}

/// Branch condition for `funct3`, or `None` if the encoding is not a branch.
pub const fn branch_taken(funct3: u32, a: u32, b: u32) -> Option<bool> {
    let taken = match funct3 {
        f3::BEQ => a == b,
        f3::BNE => a != b,
        f3::BLT => (a as i32) < (b as i32),
        f3::BGE => (a as i32) >= (b as i32),
        f3::BLTU => a < b,
        f3::BGEU => a >= b,
        _ => return None,
    };
    Some(taken)
}

fn unimplemented(inst: u32) -> ExecError {
    ExecError::UnimplementedOperation {
        opcode: inst.opcode(),
        funct3: inst.funct3(),
        funct7: inst.funct7(),
    }
}

/// LOAD: `rd = mem[rs1 + imm]`, width and extension from [`load_op`].
///
/// # Errors
///
/// Unknown funct3, or a misaligned/unmapped address.
pub fn load(mem: &mut Memory, proc: &mut Processor, inst: u32) -> Result<u32, ExecError> {
    let i = decode_i(inst);
    let op = load_op(i.funct3).ok_or_else(|| unimplemented(inst))?;
    let addr = proc.read_reg(i.rs1).wrapping_add_signed(i.imm);

    let raw = mem.read(addr, op.width)?;
    let value = if op.signed {
        sign_extend(raw, op.width.bits()) as u32
    } else {
        raw
    };

    proc.write_reg(i.rd, value);
    Ok(proc.next_pc())
}

/// STORE: `mem[rs1 + imm] = rs2`, truncated to the width from [`store_width`].
///
/// # Errors
///
/// Unknown funct3, or a misaligned/unmapped address.
pub fn store(mem: &mut Memory, proc: &mut Processor, inst: u32) -> Result<u32, ExecError> {
    let s = decode_s(inst);
    let width = store_width(s.funct3).ok_or_else(|| unimplemented(inst))?;
    let addr = proc.read_reg(s.rs1).wrapping_add_signed(s.imm);

    mem.write(addr, width, proc.read_reg(s.rs2))?;
    Ok(proc.next_pc())
}

/// ALU with immediate: add (`000`), shift-left by `imm & 0x1F` (`001`), subtract (`010`).
///
/// # Errors
///
/// Any other funct3.
pub fn alu_imm(_mem: &mut Memory, proc: &mut Processor, inst: u32) -> Result<u32, ExecError> {
    let i = decode_i(inst);
    let src = proc.read_reg(i.rs1);

    let value = match i.funct3 {
        f3::ADDI => src.wrapping_add_signed(i.imm),
        f3::SHLI => src << (i.imm as u32 & 0x1F),
        f3::SUBI => src.wrapping_sub(i.imm as u32),
        _ => return Err(unimplemented(inst)),
    };

    proc.write_reg(i.rd, value);
    Ok(proc.next_pc())
}

/// ALU with registers: add or multiply (`000`, by funct7), subtract (`010`).
///
/// # Errors
///
/// Any other funct3/funct7 combination.
pub fn alu_reg(_mem: &mut Memory, proc: &mut Processor, inst: u32) -> Result<u32, ExecError> {
    let r = decode_r(inst);
    let a = proc.read_reg(r.rs1);
    let b = proc.read_reg(r.rs2);

    let value = match (r.funct3, r.funct7) {
        (f3::ADD_MUL, f7::DEFAULT) => a.wrapping_add(b),
        (f3::ADD_MUL, f7::MUL) => a.wrapping_mul(b),
        (f3::SUB, _) => a.wrapping_sub(b),
        _ => return Err(unimplemented(inst)),
    };

    proc.write_reg(r.rd, value);
    Ok(proc.next_pc())
}

/// LUI: `rd = imm` (upper 20 bits, low 12 clear).
///
/// # Errors
///
/// Never fails.
pub fn lui(_mem: &mut Memory, proc: &mut Processor, inst: u32) -> Result<u32, ExecError> {
    let u = decode_u(inst);
    proc.write_reg(u.rd, u.imm);
    Ok(proc.next_pc())
}

/// JAL: links `pc + 4` into `ra` (the rd field is ignored) and jumps to `pc + offset`.
///
/// # Errors
///
/// Never fails.
pub fn jal(_mem: &mut Memory, proc: &mut Processor, inst: u32) -> Result<u32, ExecError> {
    let j = decode_j(inst);
    let pc = proc.read_pc();
    proc.write_reg(REG_RA, proc.next_pc());
    Ok(pc.wrapping_add_signed(j.offset()))
}

/// Conditional branch: `pc + offset` if the funct3 condition holds, else `pc + 4`.
///
/// # Errors
///
/// funct3 `010` or `011`.
pub fn branch(_mem: &mut Memory, proc: &mut Processor, inst: u32) -> Result<u32, ExecError> {
    let b = decode_b(inst);
    let taken = branch_taken(b.funct3, proc.read_reg(b.rs1), proc.read_reg(b.rs2))
        .ok_or_else(|| unimplemented(inst))?;

    if taken {
        Ok(proc.read_pc().wrapping_add_signed(b.offset()))
    } else {
        Ok(proc.next_pc())
    }
}
