//! Operand model: sizes and operand values
//!
//! Every operand carries an explicit size. Arithmetic results are truncated
//! to the out operand's declared size at write time, so the size annotations
//! are the single source of truth for wraparound behavior.

use crate::instruction::Pc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operand width in bytes.
///
/// Sizes follow the `b1`/`b2`/`b4`/`b8`/`b16` prefixes used by operand
/// trees: a native dword register is annotated `b4`, the qword result of a
/// widening 32x32 multiply is `b8`.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperandSize {
    Byte = 1,
    Word = 2,
    Dword = 4,
    Qword = 8,
    Oword = 16,
}

impl OperandSize {
    /// Width in bytes.
    #[inline]
    pub fn bytes(self) -> u32 {
        self as u32
    }

    /// Width in bits.
    #[inline]
    pub fn bits(self) -> u32 {
        self.bytes() * 8
    }

    /// Bit mask selecting exactly this width.
    #[inline]
    pub fn mask(self) -> u128 {
        match self {
            OperandSize::Oword => u128::MAX,
            _ => (1u128 << self.bits()) - 1,
        }
    }

    /// The next larger size, if any. A widening operation on size `n`
    /// produces a result of size `n.double()`.
    pub fn double(self) -> Option<Self> {
        match self {
            OperandSize::Byte => Some(OperandSize::Word),
            OperandSize::Word => Some(OperandSize::Dword),
            OperandSize::Dword => Some(OperandSize::Qword),
            OperandSize::Qword => Some(OperandSize::Oword),
            OperandSize::Oword => None,
        }
    }

    /// Parse a size prefix such as `b4`.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "b1" => Some(OperandSize::Byte),
            "b2" => Some(OperandSize::Word),
            "b4" => Some(OperandSize::Dword),
            "b8" => Some(OperandSize::Qword),
            "b16" => Some(OperandSize::Oword),
            _ => None,
        }
    }

    /// The `b4`-style prefix for this size.
    pub fn prefix(self) -> &'static str {
        match self {
            OperandSize::Byte => "b1",
            OperandSize::Word => "b2",
            OperandSize::Dword => "b4",
            OperandSize::Qword => "b8",
            OperandSize::Oword => "b16",
        }
    }
}

impl fmt::Display for OperandSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// An operand's value: a named register, a literal, or a micro-op address
/// (the target of an intra-translation jump).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrValue {
    Register(String),
    Immediate(u128),
    SubAddress(Pc),
}

/// A sized operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrOperand {
    size: OperandSize,
    value: IrValue,
}

impl IrOperand {
    pub fn register(size: OperandSize, name: impl Into<String>) -> Self {
        IrOperand {
            size,
            value: IrValue::Register(name.into()),
        }
    }

    /// Signed immediate, stored two's-complement truncated to `size`.
    /// `immediate(Dword, -1)` stores `0xFFFF_FFFF`.
    pub fn immediate(size: OperandSize, value: i64) -> Self {
        IrOperand {
            size,
            value: IrValue::Immediate(value as u128 & size.mask()),
        }
    }

    /// Unsigned immediate, truncated to `size`.
    pub fn immediate_unsigned(size: OperandSize, value: u128) -> Self {
        IrOperand {
            size,
            value: IrValue::Immediate(value & size.mask()),
        }
    }

    /// Micro-op address operand, used as a `Jcc` target.
    pub fn sub_address(pc: Pc) -> Self {
        IrOperand {
            size: OperandSize::Qword,
            value: IrValue::SubAddress(pc),
        }
    }

    #[inline]
    pub fn size(&self) -> OperandSize {
        self.size
    }

    #[inline]
    pub fn value(&self) -> &IrValue {
        &self.value
    }

    /// Register name, if this operand is a register.
    pub fn register_name(&self) -> Option<&str> {
        match &self.value {
            IrValue::Register(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for IrOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            IrValue::Register(name) => write!(f, "{} {}", self.size, name),
            IrValue::Immediate(value) => write!(f, "{} {:#x}", self.size, value),
            IrValue::SubAddress(pc) => write!(f, "{}", pc),
        }
    }
}
