//! Instruction Disassembler for the emulated RV32I subset.
//!
//! Converts a 32-bit instruction encoding into a human-readable mnemonic
//! string for debug tracing, logging, and test diagnostics. Mnemonics follow
//! the emulator's own ALU encoding, so immediate funct3 `010` prints as `subi`.
//!
//! # Usage
//!
//! ```
//! use rv32emu_core::isa::disasm::disassemble;
//! let text = disassemble(0x00A00513);
//! assert_eq!(text, "addi a0, zero, 10");
//! ```

use crate::isa::abi::reg_name;
use crate::isa::decode::{decode_b, decode_i, decode_j, decode_r, decode_s, decode_u};
use crate::isa::instruction::{Format, Instruction};
use crate::isa::rv32i::{funct3 as f3, funct7 as f7, opcodes as op};

/// Disassembles a 32-bit instruction word into a human-readable string.
///
/// Returns a mnemonic like `"add a0, a1, a2"`; encodings the emulator does
/// not execute render as `"unknown (0x...)"` or with a `??` mnemonic.
///
/// # Arguments
///
/// * `inst` - The raw 32-bit instruction encoding.
pub fn disassemble(inst: u32) -> String {
    let Some(decoded) = Instruction::decode(inst) else {
        return format!("unknown ({inst:#010x})");
    };

    let w = decoded.raw();
    match decoded.format() {
        Format::R => {
            let r = decode_r(w);
            let mn = match (r.funct3, r.funct7) {
                (f3::ADD_MUL, f7::DEFAULT) => "add",
                (f3::ADD_MUL, f7::MUL) => "mul",
                (f3::SUB, _) => "sub",
                _ => "r??",
            };
            format!(
                "{mn} {}, {}, {}",
                reg_name(r.rd),
                reg_name(r.rs1),
                reg_name(r.rs2)
            )
        }
        Format::I => {
            let i = decode_i(w);
            if w & 0x7F == op::OP_LOAD {
                let mn = match i.funct3 {
                    f3::LB => "lb",
                    f3::LH => "lh",
                    f3::LW => "lw",
                    f3::LBU => "lbu",
                    f3::LHU => "lhu",
                    _ => "l??",
                };
                return format!("{mn} {}, {}({})", reg_name(i.rd), i.imm, reg_name(i.rs1));
            }
            let (mn, imm) = match i.funct3 {
                f3::ADDI => ("addi", i.imm),
                f3::SHLI => ("slli", i.imm & 0x1F),
                f3::SUBI => ("subi", i.imm),
                _ => ("i??", i.imm),
            };
            format!("{mn} {}, {}, {imm}", reg_name(i.rd), reg_name(i.rs1))
        }
        Format::S => {
            let s = decode_s(w);
            let mn = match s.funct3 {
                f3::SB => "sb",
                f3::SH => "sh",
                f3::SW => "sw",
                _ => "s??",
            };
            format!("{mn} {}, {}({})", reg_name(s.rs2), s.imm, reg_name(s.rs1))
        }
        Format::B => {
            let b = decode_b(w);
            let mn = match b.funct3 {
                f3::BEQ => "beq",
                f3::BNE => "bne",
                f3::BLT => "blt",
                f3::BGE => "bge",
                f3::BLTU => "bltu",
                f3::BGEU => "bgeu",
                _ => "b??",
            };
            format!(
                "{mn} {}, {}, {}",
                reg_name(b.rs1),
                reg_name(b.rs2),
                b.offset()
            )
        }
        Format::U => {
            let u = decode_u(w);
            format!("lui {}, {:#x}", reg_name(u.rd), u.imm >> 12)
        }
        Format::J => {
            let j = decode_j(w);
            format!("jal {}", j.offset())
        }
    }
}
