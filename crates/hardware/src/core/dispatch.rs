//! Opcode Dispatch Table.
//!
//! Maps the 7-bit major opcode to the [`Handler`] that executes it. The table
//! is an owned value built once per simulator; an opcode with no registered
//! handler is reported by the loop as an unknown-opcode fault.

use std::fmt;

use crate::common::constants::{OPCODE_COUNT, OPCODE_MASK};
use crate::core::execute::{self, Handler};
use crate::isa::rv32i::opcodes as op;

/// Fixed-size opcode-to-handler table.
#[derive(Clone)]
pub struct DispatchTable {
    handlers: [Option<Handler>; OPCODE_COUNT],
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opcodes: Vec<String> = self
            .handlers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.is_some())
            .map(|(i, _)| format!("{i:#09b}"))
            .collect();
        f.debug_struct("DispatchTable")
            .field("opcodes", &opcodes)
            .finish()
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::rv32i()
    }
}

impl DispatchTable {
    /// Creates a table with no handlers.
    pub const fn empty() -> Self {
        Self {
            handlers: [None; OPCODE_COUNT],
        }
    }

    /// Creates the table for the seven supported opcode classes.
    pub fn rv32i() -> Self {
        let mut table = Self::empty();
        table.register(op::OP_LOAD, execute::load);
        table.register(op::OP_IMM, execute::alu_imm);
        table.register(op::OP_STORE, execute::store);
        table.register(op::OP_REG, execute::alu_reg);
        table.register(op::OP_LUI, execute::lui);
        table.register(op::OP_BRANCH, execute::branch);
        table.register(op::OP_JAL, execute::jal);
        table
    }

    /// Installs `handler` for `opcode`, replacing any previous entry.
    ///
    /// Only the low seven bits of `opcode` are used.
    pub fn register(&mut self, opcode: u32, handler: Handler) {
        self.handlers[(opcode & OPCODE_MASK) as usize] = Some(handler);
    }

    /// Returns the handler registered for the opcode bits of `opcode`.
    pub fn lookup(&self, opcode: u32) -> Option<Handler> {
        self.handlers[(opcode & OPCODE_MASK) as usize]
    }

    /// Number of opcodes with a registered handler.
    pub fn len(&self) -> usize {
        self.handlers.iter().filter(|h| h.is_some()).count()
    }

    /// Whether no opcode has a handler.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
