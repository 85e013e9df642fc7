//! Human-readable dumps for the CLI: segment contents and per-step tracing.

use std::fmt;
use std::io::{self, Write};

use rv32emu_core::Processor;
use rv32emu_core::core::Segment;
use rv32emu_core::isa::disasm::disassemble;
use rv32emu_core::sim::{ExecutionObserver, Retired};
use tracing::warn;

/// Words printed per line of a segment dump.
const WORDS_PER_LINE: usize = 4;

/// Hex dump of one segment as little-endian 32-bit words.
///
/// A trailing partial word is padded with zero bytes.
pub struct SegmentDump<'a> {
    index: usize,
    segment: &'a Segment,
}

impl<'a> SegmentDump<'a> {
    pub fn new(index: usize, segment: &'a Segment) -> Self {
        Self { index, segment }
    }
}

impl fmt::Display for SegmentDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self.segment.base();
        writeln!(
            f,
            "segment {} @ {:#010x} ({} bytes)",
            self.index,
            base,
            self.segment.len()
        )?;

        let line_bytes = WORDS_PER_LINE * 4;
        for (line, chunk) in self.segment.bytes().chunks(line_bytes).enumerate() {
            let addr = base.wrapping_add((line * line_bytes) as u32);
            write!(f, "{addr:#010x}:")?;
            for word in chunk.chunks(4) {
                let mut le = [0u8; 4];
                le[..word.len()].copy_from_slice(word);
                write!(f, " {:08x}", u32::from_le_bytes(le))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Observer that prints every retired instruction with its disassembly.
///
/// The first write error stops further output and is kept for [`StepPrinter::finish`].
pub struct StepPrinter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> StepPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Returns the writer, or the error that interrupted the trace.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }
}

impl<W: Write> ExecutionObserver for StepPrinter<W> {
    fn on_retire(&mut self, retired: &Retired, _processor: &Processor) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(
            self.out,
            "{:#010x}: {:08x}  {}",
            retired.pc,
            retired.instruction,
            disassemble(retired.instruction)
        ) {
            warn!("instruction trace stopped: {err}");
            self.error = Some(err);
        }
    }
}
