//! Retirement observer hook.
//!
//! The loop reports every retired instruction to an [`ExecutionObserver`] after
//! the pc has been updated. Observers see state read-only and cannot alter the
//! run; the CLI uses one to print `--trace` output.

use crate::core::processor::Processor;

/// One retired instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retired {
    /// Address the instruction was fetched from.
    pub pc: u32,
    /// The instruction word.
    pub instruction: u32,
    /// Address returned by the handler and written into the pc.
    pub next_pc: u32,
}

impl Retired {
    /// Whether this instruction jumped to itself, which ends the run.
    pub const fn is_halt(&self) -> bool {
        self.next_pc == self.pc
    }
}

/// Callback invoked once per retired instruction.
pub trait ExecutionObserver {
    /// Called after `retired` has executed and the pc holds `retired.next_pc`.
    fn on_retire(&mut self, retired: &Retired, processor: &Processor);
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ExecutionObserver for NoopObserver {
    fn on_retire(&mut self, _retired: &Retired, _processor: &Processor) {}
}
