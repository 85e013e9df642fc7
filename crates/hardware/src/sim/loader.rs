//! ELF Program Loader.
//!
//! This module builds the emulated address space from an ELF32 executable. It performs:
//! 1. **Reading:** Loads the whole file into memory once.
//! 2. **Validation:** Parses the file header with bounds checks and requires a RISC-V,
//!    little-endian image with a program header table.
//! 3. **Mapping:** Copies every `PT_LOAD` segment to its virtual address, zero-filling
//!    up to `p_memsz`, then maps a zero-filled stack below the configured stack top.
//!
//! Segment sizes come from the file, so the total mapped size is capped by
//! `MemoryConfig::max_image_size` and every buffer is reserved fallibly.

use std::fs;
use std::path::Path;

use object::Endian;
use object::Endianness;
use object::elf::{FileHeader32, PT_LOAD};
use object::read::elf::{FileHeader as _, ProgramHeader as _};
use tracing::{debug, warn};

use crate::common::constants::EM_RISCV;
use crate::common::error::LoadError;
use crate::config::MemoryConfig;
use crate::core::memory::{Memory, Segment};

/// Size of the 32-bit address space; no segment may extend past it.
const ADDRESS_SPACE_END: u64 = 1 << 32;

fn malformed(err: object::read::Error) -> LoadError {
    LoadError::MalformedElf(err.to_string())
}

/// Adds `len` bytes to the running image size, failing once it passes the limit.
const fn account(mapped: &mut u64, len: usize, config: &MemoryConfig) -> Result<(), LoadError> {
    let size = mapped.saturating_add(len as u64);
    if size > config.max_image_size {
        return Err(LoadError::ImageTooLarge {
            size,
            limit: config.max_image_size,
        });
    }
    *mapped = size;
    Ok(())
}

/// Allocates a `len`-byte buffer starting with `prefix` and zero-filled after it.
fn segment_bytes(prefix: &[u8], len: usize) -> Result<Vec<u8>, LoadError> {
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|_| LoadError::AllocationFailed { size: len })?;
    bytes.extend_from_slice(prefix);
    bytes.resize(len, 0);
    Ok(bytes)
}

/// Loads an ELF executable from disk with the default stack layout.
///
/// # Errors
///
/// See [`load_elf`]; additionally [`LoadError::FileUnreadable`] if the file cannot be read.
pub fn load(path: impl AsRef<Path>) -> Result<Memory, LoadError> {
    load_with(path, &MemoryConfig::default())
}

/// Loads an ELF executable from disk.
///
/// # Arguments
///
/// * `path` - Path to the executable.
/// * `config` - Stack placement.
///
/// # Errors
///
/// [`LoadError::FileUnreadable`] if the file cannot be read, otherwise as [`load_elf`].
pub fn load_with(path: impl AsRef<Path>, config: &MemoryConfig) -> Result<Memory, LoadError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| LoadError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {}", data.len(), path.display());
    load_elf(&data, config)
}

/// Builds a memory image from the bytes of an ELF32 executable.
///
/// # Arguments
///
/// * `data` - The complete file contents.
/// * `config` - Stack placement.
///
/// # Returns
///
/// The address space holding every loadable segment in program header order,
/// followed by the stack segment, with the entry point and stack top recorded.
///
/// # Errors
///
/// * [`LoadError::MalformedElf`] for a truncated or inconsistent header or segment.
/// * [`LoadError::UnsupportedMachine`] if `e_machine` is not RISC-V.
/// * [`LoadError::MissingProgramHeaders`] if there is no program header table.
/// * [`LoadError::NoLoadableSegments`] if no non-empty `PT_LOAD` entry exists.
/// * [`LoadError::ImageTooLarge`] if the segments and stack exceed `config.max_image_size`.
/// * [`LoadError::AllocationFailed`] if the host cannot provide a segment buffer.
pub fn load_elf(data: &[u8], config: &MemoryConfig) -> Result<Memory, LoadError> {
    let header = FileHeader32::<Endianness>::parse(data).map_err(malformed)?;
    let endian = header.endian().map_err(malformed)?;
    if !endian.is_little_endian() {
        return Err(LoadError::MalformedElf(
            "big-endian images are not supported".to_string(),
        ));
    }

    let machine = header.e_machine(endian);
    if machine != EM_RISCV {
        return Err(LoadError::UnsupportedMachine { machine });
    }

    let entry = header.e_entry(endian);
    let phdrs = header.program_headers(endian, data).map_err(malformed)?;
    if phdrs.is_empty() {
        return Err(LoadError::MissingProgramHeaders);
    }
    debug!(
        "ELF32 machine {machine}, entry {entry:#010x}, {} program headers",
        phdrs.len()
    );

    let mut memory = Memory::new(entry, config.stack_top);
    let mut loaded = 0usize;
    let mut mapped = 0u64;

    for (index, phdr) in phdrs.iter().enumerate() {
        if phdr.p_type(endian) != PT_LOAD {
            continue;
        }

        let vaddr = phdr.p_vaddr(endian);
        let offset = phdr.p_offset(endian) as usize;
        let filesz = phdr.p_filesz(endian) as usize;
        let memsz = phdr.p_memsz(endian) as usize;

        if memsz == 0 {
            warn!("skipping empty PT_LOAD segment {index} at {vaddr:#010x}");
            continue;
        }
        if memsz < filesz {
            return Err(LoadError::MalformedElf(format!(
                "segment {index}: p_memsz {memsz:#x} is smaller than p_filesz {filesz:#x}"
            )));
        }
        if u64::from(vaddr) + memsz as u64 > ADDRESS_SPACE_END {
            return Err(LoadError::MalformedElf(format!(
                "segment {index}: {memsz:#x} bytes at {vaddr:#010x} exceed the address space"
            )));
        }

        let file_bytes = offset
            .checked_add(filesz)
            .and_then(|end| data.get(offset..end))
            .ok_or_else(|| {
                LoadError::MalformedElf(format!(
                    "segment {index}: file range {offset:#x}+{filesz:#x} exceeds image size {:#x}",
                    data.len()
                ))
            })?;

        account(&mut mapped, memsz, config)?;
        let bytes = segment_bytes(file_bytes, memsz)?;

        debug!("segment {index}: {vaddr:#010x} filesz {filesz:#x} memsz {memsz:#x}");
        memory.add_segment(Segment::new(vaddr, bytes));
        loaded += 1;
    }

    if loaded == 0 {
        return Err(LoadError::NoLoadableSegments);
    }

    let stack_base = config.stack_base();
    let stack_len = (config.stack_top - stack_base) as usize;
    if stack_len > 0 {
        account(&mut mapped, stack_len, config)?;
        debug!("stack: {stack_base:#010x}..{:#010x}", config.stack_top);
        memory.add_segment(Segment::new(stack_base, segment_bytes(&[], stack_len)?));
    }

    Ok(memory)
}
