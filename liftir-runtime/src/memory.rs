//! Sparse byte-addressable memory image
//!
//! Grows lazily on write; `size()` reports the number of bytes ever written,
//! which register-to-register arithmetic must leave at 0. An optional valid
//! range turns accesses outside it into faults.

use liftir_spec::{Endianness, OperandSize};
use std::collections::HashMap;
use std::ops::Range;

/// Faulting address of an out-of-range access.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MemoryFault {
    pub address: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryImage {
    bytes: HashMap<u64, u8>,
    range: Option<Range<u64>>,
}

impl MemoryImage {
    /// Unrestricted image: every address is in range.
    pub fn new() -> Self {
        MemoryImage::default()
    }

    /// Image that faults on access outside `range`.
    pub fn with_range(range: Option<Range<u64>>) -> Self {
        MemoryImage { bytes: HashMap::new(), range }
    }

    fn check(&self, address: u64, len: u32) -> Result<(), MemoryFault> {
        for i in 0..len as u64 {
            let addr = address
                .checked_add(i)
                .ok_or(MemoryFault { address: u64::MAX })?;
            if let Some(range) = &self.range {
                if !range.contains(&addr) {
                    return Err(MemoryFault { address: addr });
                }
            }
        }
        Ok(())
    }

    /// Store the low `size` bytes of `value` at `address`.
    pub fn store(
        &mut self,
        address: u64,
        value: u128,
        size: OperandSize,
        endianness: Endianness,
    ) -> Result<(), MemoryFault> {
        self.check(address, size.bytes())?;
        let n = size.bytes() as u64;
        for i in 0..n {
            let shift = match endianness {
                Endianness::Little => i * 8,
                Endianness::Big => (n - 1 - i) * 8,
            };
            let byte = ((value >> shift) & 0xFF) as u8;
            self.bytes.insert(address + i, byte);
        }
        Ok(())
    }

    /// Load `size` bytes from `address`. Bytes never written read as zero.
    pub fn load(
        &self,
        address: u64,
        size: OperandSize,
        endianness: Endianness,
    ) -> Result<u128, MemoryFault> {
        self.check(address, size.bytes())?;
        let n = size.bytes() as u64;
        let mut value = 0u128;
        for i in 0..n {
            let byte = self.bytes.get(&(address + i)).copied().unwrap_or(0) as u128;
            let shift = match endianness {
                Endianness::Little => i * 8,
                Endianness::Big => (n - 1 - i) * 8,
            };
            value |= byte << shift;
        }
        Ok(value)
    }

    pub fn byte(&self, address: u64) -> Option<u8> {
        self.bytes.get(&address).copied()
    }

    /// Total bytes ever written.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
