//! Per-architecture CPU policy
//!
//! Lifters and the interpreter never consult ambient per-architecture
//! tables; everything flows through a [`CpuPolicy`] value injected at
//! construction time.

use crate::operand::OperandSize;
use serde::{Deserialize, Serialize};

/// Byte order used by memory loads and stores.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endianness {
    Little,
    Big,
}

/// Two named registers jointly forming one logical double-width register,
/// high half first (e.g. MIPS `HILO` = {HI, LO}).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CombinedRegister {
    /// Logical name lifters look the pair up by.
    pub name: &'static str,
    pub high: &'static str,
    pub low: &'static str,
    /// Combined width; each half is `size.bytes() / 2` wide.
    pub size: OperandSize,
}

/// Static per-architecture register catalog.
pub trait CpuPolicy {
    fn architecture(&self) -> &'static str;

    /// All native registers with their widths.
    fn registers(&self) -> &[(&'static str, OperandSize)];

    /// Combined-register definitions. Empty for architectures whose paired
    /// registers are named by operands instead.
    fn combined_registers(&self) -> &[CombinedRegister] {
        &[]
    }

    /// Name of the architecture's program counter register, if the
    /// interpreter should keep it updated during execution. Must be listed
    /// in [`CpuPolicy::registers`].
    fn program_counter(&self) -> Option<&'static str> {
        None
    }

    fn register_width(&self, name: &str) -> Option<OperandSize> {
        self.registers()
            .iter()
            .find(|(reg, _)| *reg == name)
            .map(|&(_, size)| size)
    }

    fn is_register(&self, name: &str) -> bool {
        self.register_width(name).is_some()
    }

    fn combined_register(&self, name: &str) -> Option<&CombinedRegister> {
        self.combined_registers().iter().find(|c| c.name == name)
    }
}

/// Temporary register names issued during translation (`t0`, `t1`, ...).
/// Recognized by the interpreter but not part of any native register set.
pub fn is_temporary(name: &str) -> bool {
    match name.strip_prefix('t') {
        Some(rest) => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
