//! Load Error and Execution Fault definitions.
//!
//! This module defines the error handling model of the emulator. It provides:
//! 1. **Load Errors:** Failures while reading and parsing the ELF image, raised before execution.
//! 2. **Memory Errors:** Misaligned or unmapped accesses reported by the memory subsystem.
//! 3. **Handler Errors:** What an execution handler can report for a single instruction.
//! 4. **Faults:** Handler and dispatch errors tagged with the faulting pc and instruction word.
//! 5. **Configuration Errors:** Failures while reading a JSON configuration file.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::constants::EM_RISCV;

/// Errors raised while loading an ELF32 image into memory.
///
/// All of these are unrecoverable for the run and are reported before any
/// instruction executes.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The binary could not be opened or read.
    #[error("unable to read '{}': {source}", .path.display())]
    FileUnreadable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The ELF `e_machine` field is not RISC-V.
    #[error("invalid machine type: {machine} (expected {})", EM_RISCV)]
    UnsupportedMachine {
        /// Machine value found in the header.
        machine: u16,
    },

    /// The ELF header declares zero program headers.
    #[error("no program header table found")]
    MissingProgramHeaders,

    /// The program header table contains no `PT_LOAD` entry.
    #[error("no loadable segment in program header table")]
    NoLoadableSegments,

    /// The image is truncated or internally inconsistent.
    #[error("malformed ELF image: {0}")]
    MalformedElf(String),

    /// The mapped segments, stack included, need more memory than the configured limit.
    #[error("image needs {size:#x} bytes of memory, over the {limit:#x}-byte limit")]
    ImageTooLarge {
        /// Bytes requested so far, including the segment that crossed the limit.
        size: u64,
        /// Configured `max_image_size`.
        limit: u64,
    },

    /// The host refused to allocate a segment buffer.
    #[error("unable to allocate {size:#x} bytes for a segment")]
    AllocationFailed {
        /// Requested buffer size.
        size: usize,
    },
}

/// Errors raised by the memory subsystem for a single access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// A 2- or 4-byte access whose address is not a multiple of its width.
    #[error("unaligned {width}-byte access at {address:#010x}")]
    Unaligned {
        /// Requested address.
        address: u32,
        /// Access width in bytes.
        width: u32,
    },

    /// An access not fully contained in a single mapped segment.
    #[error("{width}-byte access at {address:#010x} is outside every mapped segment")]
    OutOfRange {
        /// Requested address.
        address: u32,
        /// Access width in bytes.
        width: u32,
    },
}

/// Errors an execution handler can report for one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ExecError {
    /// A load or store faulted.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// The opcode is known but its funct3/funct7 combination is not implemented.
    #[error(
        "unimplemented operation (opcode {opcode:#09b}, funct3 {funct3:#05b}, funct7 {funct7:#09b})"
    )]
    UnimplementedOperation {
        /// Opcode field.
        opcode: u32,
        /// funct3 field.
        funct3: u32,
        /// funct7 field.
        funct7: u32,
    },
}

/// Reason a run stopped abnormally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FaultKind {
    /// Half-word or word access (or instruction fetch) not naturally aligned.
    #[error("unaligned {width}-byte access at {address:#010x}")]
    UnalignedAccess {
        /// Requested address.
        address: u32,
        /// Access width in bytes.
        width: u32,
    },

    /// Access (or instruction fetch) outside every mapped segment.
    #[error("out-of-range {width}-byte access at {address:#010x}")]
    OutOfRangeAccess {
        /// Requested address.
        address: u32,
        /// Access width in bytes.
        width: u32,
    },

    /// No handler is registered for the opcode.
    #[error("unknown opcode {opcode:#09b}")]
    UnknownOpcode {
        /// Opcode field.
        opcode: u32,
    },

    /// Known opcode with an unsupported funct3/funct7 combination.
    #[error(
        "unimplemented operation (opcode {opcode:#09b}, funct3 {funct3:#05b}, funct7 {funct7:#09b})"
    )]
    UnimplementedOperation {
        /// Opcode field.
        opcode: u32,
        /// funct3 field.
        funct3: u32,
        /// funct7 field.
        funct7: u32,
    },

    /// The configured instruction budget ran out before the program halted.
    #[error("instruction limit of {limit} reached without halting")]
    InstructionLimitExceeded {
        /// Configured limit.
        limit: u64,
    },
}

impl From<MemoryError> for FaultKind {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::Unaligned { address, width } => {
                Self::UnalignedAccess { address, width }
            }
            MemoryError::OutOfRange { address, width } => {
                Self::OutOfRangeAccess { address, width }
            }
        }
    }
}

impl From<ExecError> for FaultKind {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Memory(mem) => mem.into(),
            ExecError::UnimplementedOperation {
                opcode,
                funct3,
                funct7,
            } => Self::UnimplementedOperation {
                opcode,
                funct3,
                funct7,
            },
        }
    }
}

/// A structured execution fault.
///
/// Identifies the program counter and, when the fetch itself succeeded, the
/// instruction word that was being executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fault {
    /// Program counter of the faulting instruction.
    pub pc: u32,
    /// Instruction word, or `None` when the fetch failed.
    pub instruction: Option<u32>,
    /// What went wrong.
    pub kind: FaultKind,
}

impl Fault {
    /// Creates a fault for an instruction that was fetched successfully.
    pub fn at(pc: u32, instruction: u32, kind: impl Into<FaultKind>) -> Self {
        Self {
            pc,
            instruction: Some(instruction),
            kind: kind.into(),
        }
    }

    /// Creates a fault raised while fetching the instruction at `pc`.
    pub fn fetch(pc: u32, kind: impl Into<FaultKind>) -> Self {
        Self {
            pc,
            instruction: None,
            kind: kind.into(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instruction {
            Some(inst) => write!(
                f,
                "{} (pc {:#010x}, instruction {:#010x})",
                self.kind, self.pc, inst
            ),
            None => write!(f, "{} (pc {:#010x}, during fetch)", self.kind, self.pc),
        }
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("unable to read config '{}': {source}", .path.display())]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration text is not valid JSON for [`Config`](crate::config::Config).
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
