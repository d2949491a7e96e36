use serde::Deserialize;
use serde::Serialize;
use serde_with::serde_as;
use tracing::trace;

use crate::VmError;

/// The number of addressable bytes.
pub const MEMORY_SIZE: usize = 0x1000;

/// The flat, byte-addressed memory of the machine. Addresses run from `0x000` to `0xFFF`.
///
/// Layout by convention:
///   0x000-0x04F  font table
///   0x050-0x1FF  unused
///   0x200-0xFFF  program image and working memory
///
/// Every access is bounds checked. Addresses are taken as `usize` so that callers can hand over
/// the raw result of address arithmetic (e.g. `I + offset`) and have it rejected here rather than
/// silently wrapped.
#[serde_as]
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBank {
    #[serde_as(as = "serde_with::Bytes")]
    bytes: [u8; MEMORY_SIZE],
}

impl MemoryBank {
    /// Constructs a memory bank with every byte set to 0.
    pub fn new() -> Self {
        Self {
            bytes: [0; MEMORY_SIZE],
        }
    }

    /// Reads the byte at the given address.
    pub fn load(&self, address: usize) -> Result<u8, VmError> {
        Self::check(address)?;
        Ok(self.bytes[address])
    }

    /// Writes a byte to the given address.
    pub fn store(&mut self, address: usize, value: u8) -> Result<(), VmError> {
        Self::check(address)?;
        trace!("Write into memory: 0x{address:0>4X} <- 0x{value:0>2X}");
        self.bytes[address] = value;
        Ok(())
    }

    /// Copies a run of bytes into memory starting at `start`. The whole range is validated before
    /// anything is written, so a rejected write leaves memory untouched.
    pub fn store_slice(&mut self, start: usize, data: &[u8]) -> Result<(), VmError> {
        Self::check(start)?;
        if let Some(last) = data.len().checked_sub(1) {
            Self::check(start + last)?;
        }
        self.bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Returns the entire contents of memory.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn check(address: usize) -> Result<(), VmError> {
        if address < MEMORY_SIZE {
            Ok(())
        } else {
            Err(VmError::AddressOutOfRange { address })
        }
    }
}

impl Default for MemoryBank {
    fn default() -> Self {
        Self::new()
    }
}
