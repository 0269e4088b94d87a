//! Micro-op instructions and the (address, sub) program counter

use crate::opcode::Opcode;
use crate::operand::IrOperand;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Program counter of a micro-op: the native instruction's address plus the
/// ordinal of the micro-op within that instruction's translation.
///
/// The derived `Ord` (address first, then sub) is the execution order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pc {
    pub address: u64,
    pub sub: u16,
}

impl Pc {
    pub fn new(address: u64, sub: u16) -> Self {
        Pc { address, sub }
    }

    /// First micro-op of a native instruction. Control transfers always
    /// land here.
    pub fn entry(address: u64) -> Self {
        Pc { address, sub: 0 }
    }
}

impl fmt::Display for Pc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}.{}", self.address, self.sub)
    }
}

/// One micro-op. Immutable once appended to a block.
///
/// Operand positions follow the in1/in2/out convention; unused positions are
/// `None` (e.g. `str` and `bisz` leave in2 empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrInstruction {
    pc: Pc,
    opcode: Opcode,
    operand1: Option<IrOperand>,
    operand2: Option<IrOperand>,
    operand3: Option<IrOperand>,
}

impl IrInstruction {
    pub fn new(
        pc: Pc,
        opcode: Opcode,
        operand1: Option<IrOperand>,
        operand2: Option<IrOperand>,
        operand3: Option<IrOperand>,
    ) -> Self {
        IrInstruction {
            pc,
            opcode,
            operand1,
            operand2,
            operand3,
        }
    }

    #[inline]
    pub fn pc(&self) -> Pc {
        self.pc
    }

    #[inline]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    #[inline]
    pub fn operand1(&self) -> Option<&IrOperand> {
        self.operand1.as_ref()
    }

    #[inline]
    pub fn operand2(&self) -> Option<&IrOperand> {
        self.operand2.as_ref()
    }

    #[inline]
    pub fn operand3(&self) -> Option<&IrOperand> {
        self.operand3.as_ref()
    }
}

impl fmt::Display for IrInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn slot(op: Option<&IrOperand>) -> String {
            op.map_or_else(|| "-".to_string(), |op| op.to_string())
        }
        write!(
            f,
            "{}: {} ({}, {}, {})",
            self.pc,
            self.opcode,
            slot(self.operand1.as_ref()),
            slot(self.operand2.as_ref()),
            slot(self.operand3.as_ref()),
        )
    }
}
