//! RV32I subset emulator CLI.
//!
//! Loads a RISC-V ELF32 executable, runs it until it jumps to itself, and
//! prints the number of executed instructions. It also provides:
//! 1. **Configuration:** An optional JSON file, overridden by command-line flags.
//! 2. **Diagnostics:** Per-instruction tracing, a register dump, and a segment hex dump.
//! 3. **Logging:** `tracing` output on stderr, filtered by `RUST_LOG` (default `warn`).

mod dump;

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rv32emu_core::config::{Config, ZeroRegister};
use rv32emu_core::sim::{Simulator, loader};

use crate::dump::{SegmentDump, StepPrinter};

#[derive(Parser, Debug)]
#[command(
    name = "rv32emu",
    author,
    version,
    about = "RV32I subset emulator",
    long_about = "Run a statically linked RISC-V ELF32 executable until it jumps to itself.\n\nExamples:\n  rv32emu program.elf\n  rv32emu --trace --dump-regs program.elf\n  rv32emu --config emu.json --max-instructions 1000000 program.elf"
)]
struct Cli {
    /// RISC-V ELF32 executable to run.
    program: PathBuf,

    /// JSON configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fail if the program has not halted after this many instructions.
    #[arg(long, value_name = "N")]
    max_instructions: Option<u64>,

    /// Make x0 read as zero and discard writes to it.
    #[arg(long)]
    hardwire_zero: bool,

    /// Print every retired instruction with its disassembly.
    #[arg(long)]
    trace: bool,

    /// Print the register file after the run.
    #[arg(long)]
    dump_regs: bool,

    /// Print a loaded segment as 32-bit hex words before running.
    #[arg(long, value_name = "INDEX")]
    dump_segment: Option<usize>,

    /// Print the instruction mix after a successful run.
    #[arg(long)]
    stats: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .compact()
        .init();

    if let Err(e) = cmd_run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Builds the effective configuration: file values first, then flags.
fn resolve_config(cli: &Cli) -> Result<Config, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(limit) = cli.max_instructions {
        config.general.max_instructions = Some(limit);
    }
    if cli.hardwire_zero {
        config.core.zero_register = ZeroRegister::Hardwired;
    }
    if cli.trace {
        config.general.trace_instructions = true;
    }
    Ok(config)
}

/// Loads the program, runs it, and prints the requested reports.
///
/// The register dump is printed even when the run faults.
fn cmd_run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(cli)?;
    let memory = loader::load_with(&cli.program, &config.memory)?;

    if let Some(index) = cli.dump_segment {
        let segment = memory.segments().get(index).ok_or_else(|| {
            format!(
                "no segment {index} (the image has {} segments)",
                memory.segments().len()
            )
        })?;
        print!("{}", SegmentDump::new(index, segment));
    }

    let mut sim = Simulator::new(memory, &config);
    let (outcome, trace_output) = if config.general.trace_instructions {
        let mut printer = StepPrinter::new(io::stdout().lock());
        let outcome = sim.run_with(&mut printer);
        (outcome, printer.finish().map(drop))
    } else {
        (sim.run(), Ok(()))
    };

    if cli.dump_regs {
        print!("{}", sim.processor());
    }

    let summary = outcome?;
    trace_output?;
    println!(
        "Number of executed instructions: {}",
        summary.instructions_executed
    );
    if cli.stats {
        summary.stats.print();
    }
    Ok(())
}
