//! Instruction encoding structures and bit extraction utilities.
//!
//! Provides the field-access primitive, the per-format field views, and the
//! tagged union that pairs a raw 32-bit word with the format chosen for it.

use super::rv32i::opcodes;

/// Extracts `len` bits of `word` starting at bit `lsb`.
///
/// Computes `(word >> lsb) & ((1 << len) - 1)`; `len` may be 32.
#[inline(always)]
pub const fn bits(word: u32, lsb: u32, len: u32) -> u32 {
    let mask = if len >= 32 { u32::MAX } else { (1u32 << len) - 1 };
    (word >> lsb) & mask
}

/// Trait for extracting the fixed-position fields shared by every format.
pub trait InstructionBits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;

    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;

    /// Extracts the funct3 field (bits 12-14).
    fn funct3(&self) -> u32;

    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;

    /// Extracts the funct7 field (bits 25-31).
    fn funct7(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        bits(*self, 0, 7)
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        bits(*self, 7, 5) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        bits(*self, 12, 3)
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        bits(*self, 15, 5) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        bits(*self, 20, 5) as usize
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        bits(*self, 25, 7)
    }
}

/// Instruction format tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// Register-register.
    R,
    /// Register-immediate and loads.
    I,
    /// Stores.
    S,
    /// Conditional branches.
    B,
    /// Upper immediate.
    U,
    /// Unconditional jump-and-link.
    J,
}

impl Format {
    /// Returns the format used by `opcode`, or `None` for opcodes the emulator does not handle.
    pub const fn of_opcode(opcode: u32) -> Option<Self> {
        match opcode {
            opcodes::OP_REG => Some(Self::R),
            opcodes::OP_LOAD | opcodes::OP_IMM => Some(Self::I),
            opcodes::OP_STORE => Some(Self::S),
            opcodes::OP_BRANCH => Some(Self::B),
            opcodes::OP_LUI => Some(Self::U),
            opcodes::OP_JAL => Some(Self::J),
            _ => None,
        }
    }
}

/// A raw instruction word tagged with its format.
///
/// Formats are views over the same word; the variant only records which view applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// R-type word.
    R(u32),
    /// I-type word.
    I(u32),
    /// S-type word.
    S(u32),
    /// B-type word.
    B(u32),
    /// U-type word.
    U(u32),
    /// J-type word.
    J(u32),
}

impl Instruction {
    /// Wraps `word` in the variant for `format`.
    pub const fn new(format: Format, word: u32) -> Self {
        match format {
            Format::R => Self::R(word),
            Format::I => Self::I(word),
            Format::S => Self::S(word),
            Format::B => Self::B(word),
            Format::U => Self::U(word),
            Format::J => Self::J(word),
        }
    }

    /// Tags `word` using its opcode, or returns `None` if the opcode is unsupported.
    pub const fn decode(word: u32) -> Option<Self> {
        match Format::of_opcode(bits(word, 0, 7)) {
            Some(format) => Some(Self::new(format, word)),
            None => None,
        }
    }

    /// Returns the format tag.
    pub const fn format(&self) -> Format {
        match self {
            Self::R(_) => Format::R,
            Self::I(_) => Format::I,
            Self::S(_) => Format::S,
            Self::B(_) => Format::B,
            Self::U(_) => Format::U,
            Self::J(_) => Format::J,
        }
    }

    /// Returns the raw instruction word.
    pub const fn raw(&self) -> u32 {
        match *self {
            Self::R(w) | Self::I(w) | Self::S(w) | Self::B(w) | Self::U(w) | Self::J(w) => w,
        }
    }
}

/// Fields of an R-type instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RType {
    /// Destination register.
    pub rd: usize,
    /// funct3 field.
    pub funct3: u32,
    /// First source register.
    pub rs1: usize,
    /// Second source register.
    pub rs2: usize,
    /// funct7 field.
    pub funct7: u32,
}

/// Fields of an I-type instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IType {
    /// Destination register.
    pub rd: usize,
    /// funct3 field.
    pub funct3: u32,
    /// Source register.
    pub rs1: usize,
    /// 12-bit immediate, sign-extended.
    pub imm: i32,
}

/// Fields of an S-type instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SType {
    /// funct3 field.
    pub funct3: u32,
    /// Base address register.
    pub rs1: usize,
    /// Data register.
    pub rs2: usize,
    /// 12-bit immediate, sign-extended.
    pub imm: i32,
}

/// Fields of a B-type instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BType {
    /// funct3 field.
    pub funct3: u32,
    /// First compared register.
    pub rs1: usize,
    /// Second compared register.
    pub rs2: usize,
    /// Assembled 13-bit offset (bit 0 always clear), not sign-extended.
    pub imm: u32,
}

/// Fields of a U-type instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UType {
    /// Destination register.
    pub rd: usize,
    /// Immediate already shifted into bits 12-31.
    pub imm: u32,
}

/// Fields of a J-type instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JType {
    /// Destination register field (JAL links into `ra` regardless).
    pub rd: usize,
    /// Assembled 21-bit offset (bit 0 always clear), not sign-extended.
    pub imm: u32,
}
