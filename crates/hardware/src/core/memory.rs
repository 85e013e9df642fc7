//! Segmented Memory Subsystem.
//!
//! This module provides the flat physical address space seen by the hart. It performs:
//! 1. **Segment storage:** Keeps each loaded region as a base address plus a byte vector.
//! 2. **Typed access:** Little-endian byte, half-word, and word reads and writes.
//! 3. **Checking:** Natural alignment for 2- and 4-byte accesses and a hard fault for
//!    any access not fully inside one segment.
//!
//! Memory is built once (normally by [`crate::sim::loader`]) and segment bases never
//! change afterwards; only the contents of existing segments can be written.

use crate::common::constants::{DEFAULT_STACK_TOP, INSTRUCTION_SIZE};
use crate::common::error::MemoryError;

/// Width of a memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    /// 1 byte.
    Byte,
    /// 2 bytes, 2-byte aligned.
    Half,
    /// 4 bytes, 4-byte aligned.
    Word,
}

impl Width {
    /// Number of bytes covered by the access.
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
        }
    }

    /// Number of significant bits in a value of this width.
    pub const fn bits(self) -> u32 {
        self.bytes() * 8
    }

    /// Whether `addr` is naturally aligned for this width.
    pub const fn is_aligned(self, addr: u32) -> bool {
        addr % self.bytes() == 0
    }
}

/// A contiguous block of bytes mapped at a fixed base address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    base: u32,
    data: Vec<u8>,
}

impl Segment {
    /// Creates a segment holding `data` at `base`.
    pub fn new(base: u32, data: Vec<u8>) -> Self {
        Self { base, data }
    }

    /// Creates a zero-filled segment of `len` bytes at `base`.
    pub fn zeroed(base: u32, len: usize) -> Self {
        Self::new(base, vec![0; len])
    }

    /// Base (lowest) address.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the segment has no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// One past the last mapped address, as a 64-bit value so a segment may end at 2^32.
    pub fn end(&self) -> u64 {
        u64::from(self.base) + self.data.len() as u64
    }

    /// Segment contents.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Offset of `addr` if the `len`-byte range starting there lies inside this segment.
    fn offset_of(&self, addr: u32, len: u32) -> Option<usize> {
        let start = u64::from(addr);
        if start >= u64::from(self.base) && start + u64::from(len) <= self.end() {
            Some((addr - self.base) as usize)
        } else {
            None
        }
    }
}

/// The emulated address space: loaded segments, entry point, and stack top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    segments: Vec<Segment>,
    entry: u32,
    stack_top: u32,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(0, DEFAULT_STACK_TOP)
    }
}

impl Memory {
    /// Creates an empty address space.
    ///
    /// # Arguments
    ///
    /// * `entry` - Program entry point.
    /// * `stack_top` - Initial stack pointer value.
    pub fn new(entry: u32, stack_top: u32) -> Self {
        Self {
            segments: Vec::new(),
            entry,
            stack_top,
        }
    }

    /// Maps a segment. Earlier segments win where ranges overlap.
    pub fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Program entry point.
    pub fn entry_point(&self) -> u32 {
        self.entry
    }

    /// Initial stack pointer value.
    pub fn stack_top(&self) -> u32 {
        self.stack_top
    }

    /// All mapped segments, in mapping order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Finds the segment and offset backing a `width` access at `addr`.
    fn locate(&self, addr: u32, width: Width) -> Result<(usize, usize), MemoryError> {
        if !width.is_aligned(addr) {
            return Err(MemoryError::Unaligned {
                address: addr,
                width: width.bytes(),
            });
        }
        self.segments
            .iter()
            .enumerate()
            .find_map(|(i, seg)| seg.offset_of(addr, width.bytes()).map(|off| (i, off)))
            .ok_or(MemoryError::OutOfRange {
                address: addr,
                width: width.bytes(),
            })
    }

    /// Reads `width` bytes at `addr`, little-endian, zero-extended to 32 bits.
    ///
    /// # Errors
    ///
    /// [`MemoryError::Unaligned`] for a misaligned half-word or word, and
    /// [`MemoryError::OutOfRange`] if the bytes are not inside one segment.
    pub fn read(&self, addr: u32, width: Width) -> Result<u32, MemoryError> {
        let (seg, off) = self.locate(addr, width)?;
        let bytes = &self.segments[seg].data[off..off + width.bytes() as usize];
        Ok(bytes
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
    }

    /// Writes the low `width` bytes of `value` at `addr`, little-endian.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Memory::read`]; nothing is written on error.
    pub fn write(&mut self, addr: u32, width: Width, value: u32) -> Result<(), MemoryError> {
        let (seg, off) = self.locate(addr, width)?;
        let len = width.bytes() as usize;
        let bytes = value.to_le_bytes();
        self.segments[seg].data[off..off + len].copy_from_slice(&bytes[..len]);
        Ok(())
    }

    /// Reads one byte.
    pub fn read_u8(&self, addr: u32) -> Result<u8, MemoryError> {
        self.read(addr, Width::Byte).map(|v| v as u8)
    }

    /// Reads a 2-byte aligned half-word.
    pub fn read_u16(&self, addr: u32) -> Result<u16, MemoryError> {
        self.read(addr, Width::Half).map(|v| v as u16)
    }

    /// Reads a 4-byte aligned word.
    pub fn read_u32(&self, addr: u32) -> Result<u32, MemoryError> {
        self.read(addr, Width::Word)
    }

    /// Writes one byte.
    pub fn write_u8(&mut self, addr: u32, value: u8) -> Result<(), MemoryError> {
        self.write(addr, Width::Byte, u32::from(value))
    }

    /// Writes a 2-byte aligned half-word.
    pub fn write_u16(&mut self, addr: u32, value: u16) -> Result<(), MemoryError> {
        self.write(addr, Width::Half, u32::from(value))
    }

    /// Writes a 4-byte aligned word.
    pub fn write_u32(&mut self, addr: u32, value: u32) -> Result<(), MemoryError> {
        self.write(addr, Width::Word, value)
    }

    /// Fetches the instruction word at `pc`.
    ///
    /// # Errors
    ///
    /// Fails like a word read: `pc` must be 4-byte aligned and mapped.
    pub fn fetch(&self, pc: u32) -> Result<u32, MemoryError> {
        debug_assert_eq!(Width::Word.bytes(), INSTRUCTION_SIZE);
        self.read(pc, Width::Word)
    }
}
