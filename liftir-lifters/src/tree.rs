//! Native instruction and operand tree model
//!
//! The external disassembler hands each operand over as a small tree whose
//! root is a size annotation (`b4` etc.) with a single child leaf. The
//! variants are a closed set; the adapter resolves a tree exactly once and
//! translators only ever see the typed result.

use liftir_spec::OperandSize;

/// One node of a size-annotated operand tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandExpr {
    /// Size annotation over a single child leaf. Must be the root.
    SizePrefix {
        size: OperandSize,
        child: Box<OperandExpr>,
    },
    Register(String),
    Immediate(i64),
    /// Memory dereference of an address leaf.
    Dereference(Box<OperandExpr>),
}

/// One operand of a native instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandTree {
    pub root: OperandExpr,
}

impl OperandTree {
    pub fn new(root: OperandExpr) -> Self {
        OperandTree { root }
    }

    /// Well-formed register operand: `size` prefix over a register leaf.
    pub fn register(size: OperandSize, name: impl Into<String>) -> Self {
        OperandTree {
            root: OperandExpr::SizePrefix {
                size,
                child: Box::new(OperandExpr::Register(name.into())),
            },
        }
    }

    /// Well-formed immediate operand.
    pub fn immediate(size: OperandSize, value: i64) -> Self {
        OperandTree {
            root: OperandExpr::SizePrefix {
                size,
                child: Box::new(OperandExpr::Immediate(value)),
            },
        }
    }

    /// Well-formed memory operand dereferencing `address`.
    pub fn memory(size: OperandSize, address: OperandExpr) -> Self {
        OperandTree {
            root: OperandExpr::SizePrefix {
                size,
                child: Box::new(OperandExpr::Dereference(Box::new(address))),
            },
        }
    }
}

/// A disassembled native instruction: mnemonic plus ordered operand trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeInstruction {
    address: u64,
    mnemonic: String,
    operands: Vec<OperandTree>,
}

impl NativeInstruction {
    pub fn new(address: u64, mnemonic: impl Into<String>, operands: Vec<OperandTree>) -> Self {
        NativeInstruction {
            address,
            mnemonic: mnemonic.into(),
            operands,
        }
    }

    #[inline]
    pub fn address(&self) -> u64 {
        self.address
    }

    #[inline]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    #[inline]
    pub fn operands(&self) -> &[OperandTree] {
        &self.operands
    }
}
