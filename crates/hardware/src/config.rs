//! Configuration system for the emulator.
//!
//! This module defines all configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline constants for the stack region and run limits.
//! 2. **Structures:** Hierarchical config for general, memory, and core behavior.
//! 3. **Enums:** Register-zero policy.
//!
//! Configuration is supplied as JSON (see [`Config::from_json`]) or use `Config::default()`
//! for the CLI. Every section and field is optional in JSON.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::constants::{DEFAULT_MAX_IMAGE_SIZE, DEFAULT_STACK_SIZE, DEFAULT_STACK_TOP};
use crate::common::error::ConfigError;

/// Default configuration constants for the emulator.
mod defaults {
    /// No instruction limit; run until the program halts.
    pub const MAX_INSTRUCTIONS: Option<u64> = None;

    /// Instruction tracing disabled.
    pub const TRACE_INSTRUCTIONS: bool = false;
}

/// How register index 0 behaves.
///
/// The emulator historically treats `x0` as an ordinary register. `Hardwired`
/// enables architectural semantics: reads return zero and writes are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroRegister {
    /// `x0` stores whatever is written to it.
    #[default]
    Plain,
    /// `x0` always reads as zero.
    Hardwired,
}

/// General run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Emit a trace line for every retired instruction.
    pub trace_instructions: bool,
    /// Stop with a fault after this many instructions if the program has not halted.
    pub max_instructions: Option<u64>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: defaults::TRACE_INSTRUCTIONS,
            max_instructions: defaults::MAX_INSTRUCTIONS,
        }
    }
}

/// Memory layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Initial stack pointer; the stack region ends here.
    pub stack_top: u32,
    /// Size in bytes of the zero-filled stack region below `stack_top`.
    pub stack_size: u32,
    /// Upper bound on the bytes mapped for the image, stack included.
    pub max_image_size: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            stack_top: DEFAULT_STACK_TOP,
            stack_size: DEFAULT_STACK_SIZE,
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
        }
    }
}

impl MemoryConfig {
    /// Lowest address of the stack region.
    pub fn stack_base(&self) -> u32 {
        self.stack_top.saturating_sub(self.stack_size)
    }
}

/// Processor behavior configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Register-zero policy.
    pub zero_register: ZeroRegister,
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run limits and tracing.
    pub general: GeneralConfig,
    /// Memory layout.
    pub memory: MemoryConfig,
    /// Processor behavior.
    pub core: CoreConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid JSON or has
    /// fields of the wrong type.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if its contents are invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}
