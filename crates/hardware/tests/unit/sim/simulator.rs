//! # Fetch-Execute Loop Tests

use pretty_assertions::assert_eq;

use rv32emu_core::common::error::{Fault, FaultKind};
use rv32emu_core::config::{Config, ZeroRegister};
use rv32emu_core::isa::abi::{REG_A0, REG_SP};
use rv32emu_core::isa::rv32i::funct3 as f3;
use rv32emu_core::sim::{Retired, Simulator};

use crate::common::builder::*;
use crate::common::harness::{CODE_BASE, DATA_BASE, DATA_SIZE, TestContext};

fn with_limit(limit: u64) -> Config {
    let mut config = Config::default();
    config.general.max_instructions = Some(limit);
    config
}

#[test]
fn test_halt_only_program_counts_one() {
    let summary = TestContext::new()
        .load_program(CODE_BASE, &[halt()])
        .run()
        .unwrap();
    assert_eq!(summary.instructions_executed, 1);
    assert_eq!(summary.final_pc, CODE_BASE);
}

#[test]
fn test_straight_line_program() {
    let mut sim = TestContext::new()
        .load_program(CODE_BASE, &[addi(10, 0, 6), addi(11, 0, 7), mul(10, 10, 11), halt()])
        .simulator();
    let summary = sim.run().unwrap();

    assert_eq!(summary.instructions_executed, 4);
    assert_eq!(summary.final_pc, CODE_BASE + 12);
    assert_eq!(sim.processor().read_reg(REG_A0), 42);
}

#[test]
fn test_countdown_loop() {
    let program = [
        addi(5, 0, 3),
        subi(5, 5, 1),
        branch(f3::BNE, 5, 0, -4),
        halt(),
    ];
    let summary = TestContext::new()
        .load_program(CODE_BASE, &program)
        .run()
        .unwrap();

    assert_eq!(summary.instructions_executed, 8);
    assert_eq!(summary.stats.inst_branch, 3);
    assert_eq!(summary.stats.branches_taken, 2);
    assert_eq!(summary.stats.inst_alu, 4);
    assert_eq!(summary.stats.inst_jump, 1);
}

#[test]
fn test_memory_round_trip_through_program() {
    let program = [
        lui(5, DATA_BASE >> 12),
        addi(6, 0, -2),
        sw(6, 5, 4),
        lbu(10, 5, 4),
        lb(11, 5, 4),
        halt(),
    ];
    let mut sim = TestContext::new().load_program(CODE_BASE, &program).simulator();
    let _summary = sim.run().unwrap();

    assert_eq!(sim.processor().read_reg(10), 0xFE);
    assert_eq!(sim.processor().read_reg(11), 0xFFFF_FFFE);
    assert_eq!(sim.memory().read_u32(DATA_BASE + 4), Ok(0xFFFF_FFFE));
    assert_eq!(sim.stats().inst_store, 1);
    assert_eq!(sim.stats().inst_load, 2);
    assert_eq!(sim.stats().inst_lui, 1);
}

#[test]
fn test_step_updates_pc_and_reports_retirement() {
    let mut sim = TestContext::new()
        .load_program(CODE_BASE, &[addi(10, 0, 1), halt()])
        .simulator();

    let first = sim.step().unwrap();
    assert_eq!(
        first,
        Retired {
            pc: CODE_BASE,
            instruction: addi(10, 0, 1),
            next_pc: CODE_BASE + 4
        }
    );
    assert!(!first.is_halt());
    assert_eq!(sim.processor().read_pc(), CODE_BASE + 4);

    let second = sim.step().unwrap();
    assert!(second.is_halt());
    assert_eq!(sim.stats().instructions, 2);
}

#[test]
fn test_new_sets_entry_and_stack_pointer() {
    let ctx = TestContext::new();
    let sim = Simulator::new(ctx.memory, &Config::default());
    assert_eq!(sim.processor().read_pc(), CODE_BASE);
    assert_eq!(sim.processor().read_reg(REG_SP), DATA_BASE + DATA_SIZE as u32);
}

#[test]
fn test_unknown_opcode_fault() {
    let err = TestContext::new()
        .load_program(CODE_BASE, &[addi(10, 0, 1), 0x0000_0073])
        .run()
        .unwrap_err();
    assert_eq!(
        err,
        Fault {
            pc: CODE_BASE + 4,
            instruction: Some(0x73),
            kind: FaultKind::UnknownOpcode { opcode: 0x73 },
        }
    );
}

#[test]
fn test_zero_word_is_unknown_opcode() {
    let err = TestContext::new().run().unwrap_err();
    assert_eq!(err.kind, FaultKind::UnknownOpcode { opcode: 0 });
    assert_eq!(err.pc, CODE_BASE);
}

#[test]
fn test_unaligned_fetch_fault() {
    let err = TestContext::new()
        .load_program(CODE_BASE, &[jal(2)])
        .run()
        .unwrap_err();
    assert_eq!(
        err,
        Fault {
            pc: CODE_BASE + 2,
            instruction: None,
            kind: FaultKind::UnalignedAccess {
                address: CODE_BASE + 2,
                width: 4
            },
        }
    );
}

#[test]
fn test_fetch_outside_segments() {
    let mut ctx = TestContext::new();
    ctx.processor.write_pc(0x10);
    let err = ctx.run().unwrap_err();
    assert_eq!(err.instruction, None);
    assert_eq!(
        err.kind,
        FaultKind::OutOfRangeAccess {
            address: 0x10,
            width: 4
        }
    );
}

#[test]
fn test_handler_fault_leaves_pc_at_instruction() {
    let program = [addi(5, 0, 3), lw(6, 5, 0), halt()];
    let mut sim = TestContext::new().load_program(CODE_BASE, &program).simulator();

    let err = sim.run().unwrap_err();
    assert_eq!(err.pc, CODE_BASE + 4);
    assert_eq!(err.instruction, Some(lw(6, 5, 0)));
    assert_eq!(err.kind, FaultKind::UnalignedAccess { address: 3, width: 4 });
    assert_eq!(sim.processor().read_pc(), CODE_BASE + 4);
    assert_eq!(sim.stats().instructions, 1);
}

#[test]
fn test_unimplemented_funct3_fault() {
    let err = TestContext::new()
        .load_program(CODE_BASE, &[branch(0b010, 0, 0, 8)])
        .run()
        .unwrap_err();
    assert!(matches!(
        err.kind,
        FaultKind::UnimplementedOperation { funct3: 0b010, .. }
    ));
}

#[test]
fn test_instruction_limit_exceeded() {
    let ctx = TestContext::new().load_program(CODE_BASE, &[jal(4), jal(-4)]);
    let mut sim = Simulator::new(ctx.memory, &with_limit(10));

    let err = sim.run().unwrap_err();
    assert_eq!(err.kind, FaultKind::InstructionLimitExceeded { limit: 10 });
    assert_eq!(sim.stats().instructions, 10);
}

#[test]
fn test_halting_on_the_last_allowed_instruction_succeeds() {
    let ctx = TestContext::new().load_program(CODE_BASE, &[addi(10, 0, 1), halt()]);
    let mut sim = Simulator::new(ctx.memory, &with_limit(2));
    assert_eq!(sim.run().unwrap().instructions_executed, 2);
}

#[test]
fn test_set_max_instructions() {
    let mut sim = TestContext::new()
        .load_program(CODE_BASE, &[jal(0x10), halt()])
        .simulator();
    sim.set_max_instructions(Some(1));
    assert!(matches!(
        sim.run(),
        Err(Fault {
            kind: FaultKind::InstructionLimitExceeded { limit: 1 },
            ..
        })
    ));
}

#[test]
fn test_zero_register_policy_from_config() {
    let program = [addi(0, 0, 5), addi(10, 0, 1), halt()];

    let ctx = TestContext::new().load_program(CODE_BASE, &program);
    let mut plain = Simulator::new(ctx.memory, &Config::default());
    let _summary = plain.run().unwrap();
    assert_eq!(plain.processor().read_reg(0), 5);
    assert_eq!(plain.processor().read_reg(10), 6);

    let mut config = Config::default();
    config.core.zero_register = ZeroRegister::Hardwired;
    let ctx = TestContext::new().load_program(CODE_BASE, &program);
    let mut hardwired = Simulator::new(ctx.memory, &config);
    let _summary = hardwired.run().unwrap();
    assert_eq!(hardwired.processor().read_reg(0), 0);
    assert_eq!(hardwired.processor().read_reg(10), 1);
}

#[test]
fn test_into_parts_returns_final_state() {
    let mut sim = TestContext::new()
        .load_program(CODE_BASE, &[addi(10, 0, 9), halt()])
        .simulator();
    let _summary = sim.run().unwrap();
    let (memory, processor) = sim.into_parts();
    assert_eq!(processor.read_reg(10), 9);
    assert_eq!(memory.fetch(CODE_BASE), Ok(addi(10, 0, 9)));
}
