//! # End-to-End Runs
//!
//! Crafted executables go through the whole path: file on disk, loader,
//! simulator built from configuration, and the halt convention.

use pretty_assertions::assert_eq;

use rv32emu_core::common::error::FaultKind;
use rv32emu_core::config::Config;
use rv32emu_core::isa::abi::{REG_A0, REG_SP};
use rv32emu_core::isa::rv32i::funct3 as f3;
use rv32emu_core::sim::{Simulator, loader};

use crate::common::builder::*;
use crate::common::elf::ElfBuilder;
use crate::common::harness::init_tracing;

const TEXT: u32 = 0x1_0000;
const DATA: u32 = 0x1_1000;

#[test]
fn test_addi_and_halt() {
    init_tracing();
    let file = ElfBuilder::new(TEXT)
        .program(TEXT, &[addi(10, 0, 5), halt()])
        .write_temp();

    let config = Config::default();
    let memory = loader::load_with(file.path(), &config.memory).unwrap();
    let mut sim = Simulator::new(memory, &config);
    let summary = sim.run().unwrap();

    assert_eq!(summary.instructions_executed, 2);
    assert_eq!(summary.final_pc, TEXT + 4);
    assert_eq!(sim.processor().read_reg(REG_A0), 5);
}

#[test]
fn test_sum_array_from_data_segment() {
    init_tracing();
    let words: Vec<u8> = [3u32, 5, 7, 11].iter().flat_map(|w| w.to_le_bytes()).collect();
    // t0 = &data, t1 = remaining, a0 = sum
    let program = [
        lui(5, DATA >> 12),
        addi(6, 0, 4),
        lw(7, 5, 0),
        add(10, 10, 7),
        addi(5, 5, 4),
        subi(6, 6, 1),
        branch(f3::BNE, 6, 0, -16),
        halt(),
    ];
    let file = ElfBuilder::new(TEXT)
        .program(TEXT, &program)
        .load(DATA, &words)
        .write_temp();

    let config = Config::default();
    let memory = loader::load_with(file.path(), &config.memory).unwrap();
    let summary = {
        let mut sim = Simulator::new(memory, &config);
        let summary = sim.run().unwrap();
        assert_eq!(sim.processor().read_reg(REG_A0), 26);
        summary
    };
    assert_eq!(summary.instructions_executed, 2 + 4 * 5 + 1);
}

#[test]
fn test_stack_usage() {
    init_tracing();
    let program = [
        addi(2, 2, -16),
        addi(5, 0, 77),
        sw(5, 2, 12),
        lw(10, 2, 12),
        addi(2, 2, 16),
        halt(),
    ];
    let file = ElfBuilder::new(TEXT).program(TEXT, &program).write_temp();

    let config = Config::default();
    let memory = loader::load_with(file.path(), &config.memory).unwrap();
    let mut sim = Simulator::new(memory, &config);
    let _summary = sim.run().unwrap();

    assert_eq!(sim.processor().read_reg(REG_A0), 77);
    assert_eq!(sim.processor().read_reg(REG_SP), config.memory.stack_top);
    assert_eq!(sim.memory().read_u32(config.memory.stack_top - 4), Ok(77));
}

#[test]
fn test_bss_reads_as_zero() {
    let program = [lui(5, DATA >> 12), lw(10, 5, 0x40), halt()];
    let image = ElfBuilder::new(TEXT)
        .program(TEXT, &program)
        .load_with_memsz(DATA, &[1, 0, 0, 0], 0x100)
        .build();

    let config = Config::default();
    let memory = loader::load_elf(&image, &config.memory).unwrap();
    let mut sim = Simulator::new(memory, &config);
    let _summary = sim.run().unwrap();
    assert_eq!(sim.processor().read_reg(REG_A0), 0);
}

#[test]
fn test_running_off_the_image_faults() {
    let image = ElfBuilder::new(TEXT).program(TEXT, &[addi(10, 0, 1)]).build();
    let config = Config::default();
    let memory = loader::load_elf(&image, &config.memory).unwrap();

    let err = Simulator::new(memory, &config).run().unwrap_err();
    assert_eq!(err.pc, TEXT + 4);
    assert_eq!(err.instruction, None);
    assert_eq!(
        err.kind,
        FaultKind::OutOfRangeAccess {
            address: TEXT + 4,
            width: 4
        }
    );
}
