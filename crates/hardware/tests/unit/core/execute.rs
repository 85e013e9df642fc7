//! Execution handler tests.
//!
//! Handlers are invoked directly through the dispatch table so the pc stays at
//! [`CODE_BASE`] and the returned next-pc can be checked on its own.

use pretty_assertions::assert_eq;
use rstest::rstest;

use rv32emu_core::common::error::{ExecError, MemoryError};
use rv32emu_core::isa::abi::{REG_A0, REG_RA};
use rv32emu_core::isa::rv32i::funct3 as f3;
use rv32emu_core::isa::rv32i::opcodes::{OP_IMM, OP_LOAD, OP_REG, OP_STORE};

use crate::common::builder::*;
use crate::common::harness::{CODE_BASE, DATA_BASE, TestContext};

const NEXT: u32 = CODE_BASE + 4;

// ─── ALU ─────────────────────────────────────────────────────────────────────

#[test]
fn test_addi_from_zero() {
    let mut ctx = TestContext::new();
    assert_eq!(ctx.exec(addi(10, 0, 5)), Ok(NEXT));
    assert_eq!(ctx.get_reg(10), 5);
}

#[test]
fn test_addi_negative_wraps() {
    let mut ctx = TestContext::new();
    assert_eq!(ctx.exec(addi(10, 0, -1)), Ok(NEXT));
    assert_eq!(ctx.get_reg(10), 0xFFFF_FFFF);
}

#[test]
fn test_slli_masks_shift_amount() {
    let mut ctx = TestContext::new();
    ctx.set_reg(5, 1);
    // imm 0x23: low five bits are 3
    let _next = ctx.exec(slli(6, 5, 0x23)).unwrap();
    assert_eq!(ctx.get_reg(6), 8);
}

#[test]
fn test_subi_subtracts_immediate() {
    let mut ctx = TestContext::new();
    ctx.set_reg(5, 10);
    let _next = ctx.exec(subi(6, 5, 3)).unwrap();
    assert_eq!(ctx.get_reg(6), 7);
    let _next = ctx.exec(subi(6, 5, -3)).unwrap();
    assert_eq!(ctx.get_reg(6), 13);
}

#[rstest]
#[case(add(10, 11, 12), 6, 7, 13)]
#[case(mul(10, 11, 12), 6, 7, 42)]
#[case(sub(10, 11, 12), 6, 7, 0xFFFF_FFFF)]
#[case(add(10, 11, 12), 0xFFFF_FFFF, 2, 1)]
#[case(mul(10, 11, 12), 0x8000_0000, 2, 0)]
fn test_alu_reg(#[case] inst: u32, #[case] a: u32, #[case] b: u32, #[case] expected: u32) {
    let mut ctx = TestContext::new();
    ctx.set_reg(11, a);
    ctx.set_reg(12, b);
    assert_eq!(ctx.exec(inst), Ok(NEXT));
    assert_eq!(ctx.get_reg(10), expected);
}

#[test]
fn test_sub_ignores_funct7() {
    let mut ctx = TestContext::new();
    ctx.set_reg(11, 9);
    ctx.set_reg(12, 4);
    let _next = ctx.exec(r_type(OP_REG, 10, f3::SUB, 11, 12, 0b0100000)).unwrap();
    assert_eq!(ctx.get_reg(10), 5);
}

#[rstest]
#[case(i_type(OP_IMM, 10, 0b011, 0, 1), OP_IMM, 0b011, 0)]
#[case(i_type(OP_IMM, 10, 0b111, 0, 1), OP_IMM, 0b111, 0)]
#[case(r_type(OP_REG, 10, 0b000, 11, 12, 0b0100000), OP_REG, 0b000, 0b0100000)]
#[case(r_type(OP_REG, 10, 0b100, 11, 12, 0), OP_REG, 0b100, 0)]
#[case(i_type(OP_LOAD, 10, 0b011, 0, 0), OP_LOAD, 0b011, 0)]
#[case(s_type(OP_STORE, 0b100, 0, 0, 0), OP_STORE, 0b100, 0)]
fn test_unimplemented_leaves_state(
    #[case] inst: u32,
    #[case] opcode: u32,
    #[case] funct3: u32,
    #[case] funct7: u32,
) {
    let mut ctx = TestContext::new();
    ctx.set_reg(10, 0x5555_5555);
    let before = (ctx.processor.clone(), ctx.memory.clone());

    assert_eq!(
        ctx.exec(inst),
        Err(ExecError::UnimplementedOperation {
            opcode,
            funct3,
            funct7
        })
    );
    assert_eq!((ctx.processor, ctx.memory), before);
}

// ─── LUI / JAL ───────────────────────────────────────────────────────────────

#[test]
fn test_lui_clears_low_bits() {
    let mut ctx = TestContext::new();
    ctx.set_reg(10, 0xFFFF_FFFF);
    assert_eq!(ctx.exec(lui(10, 0xABCDE)), Ok(NEXT));
    assert_eq!(ctx.get_reg(10), 0xABCD_E000);
}

#[test]
fn test_jal_links_ra_regardless_of_rd() {
    let mut ctx = TestContext::new();
    // rd = a0 in the encoding; the link still goes to ra
    let inst = j_type(rv32emu_core::isa::rv32i::opcodes::OP_JAL, REG_A0 as u32, 16);
    assert_eq!(ctx.exec(inst), Ok(CODE_BASE + 16));
    assert_eq!(ctx.get_reg(REG_RA), NEXT);
    assert_eq!(ctx.get_reg(REG_A0), 0);
}

#[test]
fn test_jal_backwards() {
    let mut ctx = TestContext::new();
    ctx.processor.write_pc(CODE_BASE + 0x20);
    assert_eq!(ctx.exec(jal(-0x20)), Ok(CODE_BASE));
    assert_eq!(ctx.get_reg(REG_RA), CODE_BASE + 0x24);
}

#[test]
fn test_jal_self_is_halt_target() {
    let mut ctx = TestContext::new();
    assert_eq!(ctx.exec(halt()), Ok(CODE_BASE));
}

// ─── Loads / stores ──────────────────────────────────────────────────────────

#[test]
fn test_sw_then_lw_round_trip() {
    let mut ctx = TestContext::new();
    ctx.set_reg(5, DATA_BASE);
    ctx.set_reg(6, 0x1234_5678);
    assert_eq!(ctx.exec(sw(6, 5, 8)), Ok(NEXT));
    assert_eq!(ctx.memory.read_u32(DATA_BASE + 8), Ok(0x1234_5678));
    assert_eq!(ctx.exec(lw(7, 5, 8)), Ok(NEXT));
    assert_eq!(ctx.get_reg(7), 0x1234_5678);
}

#[test]
fn test_byte_sign_and_zero_extension() {
    let mut ctx = TestContext::new();
    ctx.set_reg(5, DATA_BASE);
    ctx.set_reg(6, 0xFF);
    let _next = ctx.exec(sb(6, 5, 0)).unwrap();

    let _next = ctx.exec(lb(7, 5, 0)).unwrap();
    assert_eq!(ctx.get_reg(7), 0xFFFF_FFFF);
    let _next = ctx.exec(lbu(7, 5, 0)).unwrap();
    assert_eq!(ctx.get_reg(7), 0xFF);
}

#[rstest]
#[case(f3::LH, 0xFFFF_8001)]
#[case(f3::LHU, 0x0000_8001)]
#[case(f3::LW, 0x7F00_8001)]
fn test_half_and_word_loads(#[case] funct3: u32, #[case] expected: u32) {
    let mut ctx = TestContext::new();
    ctx.memory.write_u32(DATA_BASE, 0x7F00_8001).unwrap();
    ctx.set_reg(5, DATA_BASE);
    let _next = ctx.exec(load(funct3, 7, 5, 0)).unwrap();
    assert_eq!(ctx.get_reg(7), expected);
}

#[test]
fn test_store_half_keeps_neighbours() {
    let mut ctx = TestContext::new();
    ctx.memory.write_u32(DATA_BASE, 0xAAAA_AAAA).unwrap();
    ctx.set_reg(5, DATA_BASE);
    ctx.set_reg(6, 0x1234_5678);
    let _next = ctx.exec(store(f3::SH, 6, 5, 2)).unwrap();
    assert_eq!(ctx.memory.read_u32(DATA_BASE), Ok(0x5678_AAAA));
}

#[test]
fn test_negative_offset_addressing() {
    let mut ctx = TestContext::new();
    ctx.memory.write_u32(DATA_BASE, 99).unwrap();
    ctx.set_reg(5, DATA_BASE + 16);
    let _next = ctx.exec(lw(7, 5, -16)).unwrap();
    assert_eq!(ctx.get_reg(7), 99);
}

#[test]
fn test_unaligned_load_faults_without_writing_rd() {
    let mut ctx = TestContext::new();
    ctx.set_reg(5, DATA_BASE + 2);
    ctx.set_reg(7, 1);
    assert_eq!(
        ctx.exec(lw(7, 5, 0)),
        Err(ExecError::Memory(MemoryError::Unaligned {
            address: DATA_BASE + 2,
            width: 4
        }))
    );
    assert_eq!(ctx.get_reg(7), 1);
}

#[test]
fn test_store_outside_segments_faults() {
    let mut ctx = TestContext::new();
    ctx.set_reg(5, 0x4000);
    assert_eq!(
        ctx.exec(sw(0, 5, 0)),
        Err(ExecError::Memory(MemoryError::OutOfRange {
            address: 0x4000,
            width: 4
        }))
    );
}
