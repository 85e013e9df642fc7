//! Fetch-Execute Loop.
//!
//! The simulator owns the memory image and the processor for the whole run and
//! drives them one instruction at a time:
//! 1. **Fetch:** Reads the aligned word at the pc.
//! 2. **Dispatch:** Looks up the handler for the low seven bits in the [`DispatchTable`].
//! 3. **Retire:** Writes the handler's result into the pc and updates statistics.
//! 4. **Halt:** Stops once an instruction's next pc equals its own pc.

use tracing::{info, trace};

use crate::common::error::{Fault, FaultKind};
use crate::config::Config;
use crate::core::dispatch::DispatchTable;
use crate::core::memory::Memory;
use crate::core::processor::Processor;
use crate::isa::abi::REG_SP;
use crate::isa::disasm::disassemble;
use crate::isa::instruction::InstructionBits;
use crate::sim::observer::{ExecutionObserver, NoopObserver, Retired};
use crate::stats::ExecStats;

/// Result of a run that reached the halt convention.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionSummary {
    /// Instructions executed, including the halting one.
    pub instructions_executed: u64,
    /// Program counter at halt.
    pub final_pc: u32,
    /// Instruction mix of the run.
    pub stats: ExecStats,
}

/// Top-level emulator: memory image, hart state, and dispatch table.
#[derive(Debug)]
pub struct Simulator {
    memory: Memory,
    processor: Processor,
    dispatch: DispatchTable,
    stats: ExecStats,
    max_instructions: Option<u64>,
}

impl Simulator {
    /// Creates a simulator ready to run the loaded program.
    ///
    /// The pc is set to the entry point, `sp` to the stack top, and the
    /// register-zero policy and instruction limit are taken from `config`.
    pub fn new(memory: Memory, config: &Config) -> Self {
        let mut processor = Processor::with_zero_register(config.core.zero_register);
        processor.write_pc(memory.entry_point());
        processor.write_reg(REG_SP, memory.stack_top());

        let mut sim = Self::from_parts(memory, processor, DispatchTable::rv32i());
        sim.max_instructions = config.general.max_instructions;
        sim
    }

    /// Creates a simulator from already initialized parts, with no instruction limit.
    pub fn from_parts(memory: Memory, processor: Processor, dispatch: DispatchTable) -> Self {
        Self {
            memory,
            processor,
            dispatch,
            stats: ExecStats::default(),
            max_instructions: None,
        }
    }

    /// Sets or clears the instruction limit.
    pub fn set_max_instructions(&mut self, limit: Option<u64>) {
        self.max_instructions = limit;
    }

    /// Memory image.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Hart state.
    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Statistics gathered so far.
    pub fn stats(&self) -> &ExecStats {
        &self.stats
    }

    /// Consumes the simulator, returning the memory image and hart state.
    pub fn into_parts(self) -> (Memory, Processor) {
        (self.memory, self.processor)
    }

    /// Executes exactly one instruction.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] if the fetch fails, no handler exists for the opcode,
    /// or the handler fails. The pc and statistics are unchanged in that case.
    pub fn step(&mut self) -> Result<Retired, Fault> {
        let pc = self.processor.read_pc();
        let inst = self.memory.fetch(pc).map_err(|e| Fault::fetch(pc, e))?;

        let handler = self.dispatch.lookup(inst).ok_or_else(|| {
            Fault::at(
                pc,
                inst,
                FaultKind::UnknownOpcode {
                    opcode: inst.opcode(),
                },
            )
        })?;

        let next_pc = handler(&mut self.memory, &mut self.processor, inst)
            .map_err(|e| Fault::at(pc, inst, e))?;
        self.processor.write_pc(next_pc);
        self.stats.record(inst, pc, next_pc);

        trace!(
            "{:#010x}: {:08x}  {:<28} -> {:#010x}",
            pc,
            inst,
            disassemble(inst),
            next_pc
        );

        Ok(Retired {
            pc,
            instruction: inst,
            next_pc,
        })
    }

    /// Runs until the program halts.
    ///
    /// # Errors
    ///
    /// Any fault from [`Simulator::step`], or
    /// [`FaultKind::InstructionLimitExceeded`] when a limit is set and reached.
    pub fn run(&mut self) -> Result<ExecutionSummary, Fault> {
        self.run_with(&mut NoopObserver)
    }

    /// Runs until the program halts, reporting each retired instruction to `observer`.
    ///
    /// # Errors
    ///
    /// Same as [`Simulator::run`].
    pub fn run_with(
        &mut self,
        observer: &mut dyn ExecutionObserver,
    ) -> Result<ExecutionSummary, Fault> {
        info!(
            "starting execution at {:#010x} (sp {:#010x}, x0 {:?})",
            self.processor.read_pc(),
            self.memory.stack_top(),
            self.processor.zero_register()
        );

        loop {
            let retired = self.step()?;
            observer.on_retire(&retired, &self.processor);

            if retired.is_halt() {
                info!(
                    "halted at {:#010x} after {} instructions",
                    retired.pc, self.stats.instructions
                );
                return Ok(self.summary());
            }

            if let Some(limit) = self.max_instructions
                && self.stats.instructions >= limit
            {
                info!("instruction limit of {limit} reached at {:#010x}", retired.pc);
                return Err(Fault::at(
                    retired.pc,
                    retired.instruction,
                    FaultKind::InstructionLimitExceeded { limit },
                ));
            }
        }
    }

    /// Snapshot of the counters and final pc.
    pub fn summary(&self) -> ExecutionSummary {
        ExecutionSummary {
            instructions_executed: self.stats.instructions,
            final_pc: self.processor.read_pc(),
            stats: self.stats.clone(),
        }
    }
}

/// Runs `processor` against `memory` with the default dispatch table until halt.
///
/// The processor is used as given; its pc must already hold the start address.
///
/// # Errors
///
/// Any [`Fault`] raised by the loop.
pub fn run(memory: Memory, processor: Processor) -> Result<ExecutionSummary, Fault> {
    Simulator::from_parts(memory, processor, DispatchTable::rv32i()).run()
}
