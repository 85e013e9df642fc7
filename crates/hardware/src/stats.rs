//! Execution statistics collection and reporting.
//!
//! This module tracks what the fetch-execute loop retired. It provides:
//! 1. **Instruction count:** Total retired instructions, including the halting one.
//! 2. **Instruction mix:** Counts by opcode class (load, store, ALU, LUI, jump, branch).
//! 3. **Branch outcome:** Taken versus not-taken conditional branches.

use std::fmt;
use std::time::{Duration, Instant};

use crate::isa::rv32i::opcodes as op;

/// Statistics for one simulation run.
#[derive(Clone, Debug)]
pub struct ExecStats {
    start_time: Instant,
    /// Number of instructions retired.
    pub instructions: u64,
    /// Count of load instructions retired.
    pub inst_load: u64,
    /// Count of store instructions retired.
    pub inst_store: u64,
    /// Count of ALU instructions (register and immediate forms) retired.
    pub inst_alu: u64,
    /// Count of LUI instructions retired.
    pub inst_lui: u64,
    /// Count of JAL instructions retired.
    pub inst_jump: u64,
    /// Count of conditional branches retired.
    pub inst_branch: u64,
    /// Conditional branches whose condition held.
    pub branches_taken: u64,
}

impl Default for ExecStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            instructions: 0,
            inst_load: 0,
            inst_store: 0,
            inst_alu: 0,
            inst_lui: 0,
            inst_jump: 0,
            inst_branch: 0,
            branches_taken: 0,
        }
    }
}

impl PartialEq for ExecStats {
    /// Compares counters only; the wall-clock start is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.instructions == other.instructions
            && self.inst_load == other.inst_load
            && self.inst_store == other.inst_store
            && self.inst_alu == other.inst_alu
            && self.inst_lui == other.inst_lui
            && self.inst_jump == other.inst_jump
            && self.inst_branch == other.inst_branch
            && self.branches_taken == other.branches_taken
    }
}

impl ExecStats {
    /// Records one retired instruction.
    ///
    /// # Arguments
    ///
    /// * `inst` - The retired instruction word.
    /// * `pc` - Address it was fetched from.
    /// * `next_pc` - Address the handler returned.
    pub fn record(&mut self, inst: u32, pc: u32, next_pc: u32) {
        self.instructions += 1;
        match inst & 0x7F {
            op::OP_LOAD => self.inst_load += 1,
            op::OP_STORE => self.inst_store += 1,
            op::OP_IMM | op::OP_REG => self.inst_alu += 1,
            op::OP_LUI => self.inst_lui += 1,
            op::OP_JAL => self.inst_jump += 1,
            op::OP_BRANCH => {
                self.inst_branch += 1;
                if next_pc != pc.wrapping_add(4) {
                    self.branches_taken += 1;
                }
            }
            _ => {}
        }
    }

    /// Wall-clock time since these statistics were created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        print!("{self}");
    }
}

impl fmt::Display for ExecStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.instructions.max(1) as f64;
        let pct = |n: u64| (n as f64 / total) * 100.0;
        let seconds = self.elapsed().as_secs_f64();

        writeln!(f, "==========================================================")?;
        writeln!(f, "RV32 EMULATION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "host_seconds             {seconds:.4} s")?;
        writeln!(f, "sim_insts                {}", self.instructions)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "INSTRUCTION MIX")?;
        for (name, count) in [
            ("op.load", self.inst_load),
            ("op.store", self.inst_store),
            ("op.alu", self.inst_alu),
            ("op.lui", self.inst_lui),
            ("op.jump", self.inst_jump),
            ("op.branch", self.inst_branch),
        ] {
            writeln!(f, "  {name:<22} {count} ({:.2}%)", pct(count))?;
        }
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "BRANCHES")?;
        writeln!(f, "  branch.taken           {}", self.branches_taken)?;
        writeln!(
            f,
            "  branch.not_taken       {}",
            self.inst_branch - self.branches_taken
        )?;
        writeln!(f, "==========================================================")
    }
}
