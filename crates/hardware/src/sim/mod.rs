//! Program loading and execution.
//!
//! Provides the ELF loader that builds the initial memory image and the
//! fetch-execute loop that runs it to completion.

pub mod loader;

pub mod observer;

/// Fetch-execute loop and run summary.
pub mod simulator;

pub use self::observer::{ExecutionObserver, NoopObserver, Retired};
pub use self::simulator::{ExecutionSummary, Simulator, run};
