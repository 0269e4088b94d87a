//! Operand tree adapter
//!
//! Normalizes a size-annotated operand tree into a [`TypedOperand`] exactly
//! once; translators work on the typed result and never re-inspect trees.
//! Register leaves are resolved against the CPU policy.

use crate::error::TranslationError;
use crate::tree::{NativeInstruction, OperandExpr, OperandTree};
use liftir_spec::{CpuPolicy, IrOperand, OperandSize};

/// Resolved operand value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Register(String),
    Immediate(i64),
    /// Memory operand; the address leaf is a register or a literal.
    Memory(MemoryAddress),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryAddress {
    Register(String),
    Immediate(u64),
}

/// A typed operand with its resolved size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedOperand {
    size: OperandSize,
    value: TypedValue,
}

impl TypedOperand {
    #[inline]
    pub fn size(&self) -> OperandSize {
        self.size
    }

    #[inline]
    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    /// Register or immediate as a micro-op operand. Memory operands are not
    /// plain values and fail with an addressing-mode error.
    pub fn as_ir_operand(&self, insn: &NativeInstruction) -> Result<IrOperand, TranslationError> {
        match &self.value {
            TypedValue::Register(name) => Ok(IrOperand::register(self.size, name.clone())),
            TypedValue::Immediate(value) => Ok(IrOperand::immediate(self.size, *value)),
            TypedValue::Memory(_) => Err(TranslationError::UnsupportedAddressingMode {
                mnemonic: insn.mnemonic().to_string(),
            }),
        }
    }

    /// Register name, or an error for non-register operands.
    pub fn expect_register(&self, insn: &NativeInstruction) -> Result<&str, TranslationError> {
        match &self.value {
            TypedValue::Register(name) => Ok(name.as_str()),
            _ => Err(TranslationError::RegisterOperandRequired {
                mnemonic: insn.mnemonic().to_string(),
            }),
        }
    }
}

fn resolve_register(
    policy: &dyn CpuPolicy,
    insn: &NativeInstruction,
    name: &str,
    annotated: OperandSize,
) -> Result<TypedValue, TranslationError> {
    match policy.register_width(name) {
        Some(declared) if declared == annotated => Ok(TypedValue::Register(name.to_string())),
        Some(declared) => Err(TranslationError::OperandSizeMismatch {
            mnemonic: insn.mnemonic().to_string(),
            name: name.to_string(),
            declared,
            annotated,
        }),
        None => Err(TranslationError::UnknownRegister {
            mnemonic: insn.mnemonic().to_string(),
            name: name.to_string(),
        }),
    }
}

/// Adapt one operand tree of `insn` into a typed operand.
///
/// The root must be a size prefix over a single leaf; anything else is a
/// shape error.
pub fn adapt(
    policy: &dyn CpuPolicy,
    insn: &NativeInstruction,
    tree: &OperandTree,
) -> Result<TypedOperand, TranslationError> {
    let (size, child) = match &tree.root {
        OperandExpr::SizePrefix { size, child } => (*size, child.as_ref()),
        _ => {
            return Err(TranslationError::MissingSizePrefix {
                mnemonic: insn.mnemonic().to_string(),
            })
        }
    };

    let value = match child {
        OperandExpr::Register(name) => resolve_register(policy, insn, name, size)?,
        OperandExpr::Immediate(value) => TypedValue::Immediate(*value),
        OperandExpr::Dereference(address) => {
            let address = match address.as_ref() {
                OperandExpr::Register(name) => match policy.register_width(name) {
                    Some(_) => MemoryAddress::Register(name.clone()),
                    None => {
                        return Err(TranslationError::UnknownRegister {
                            mnemonic: insn.mnemonic().to_string(),
                            name: name.clone(),
                        })
                    }
                },
                OperandExpr::Immediate(value) if *value >= 0 => {
                    MemoryAddress::Immediate(*value as u64)
                }
                _ => {
                    return Err(TranslationError::MalformedOperand {
                        mnemonic: insn.mnemonic().to_string(),
                        reason: "dereference address must be a register or literal",
                    })
                }
            };
            TypedValue::Memory(address)
        }
        OperandExpr::SizePrefix { .. } => {
            return Err(TranslationError::MalformedOperand {
                mnemonic: insn.mnemonic().to_string(),
                reason: "nested size prefix",
            })
        }
    };

    Ok(TypedOperand { size, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mips::CpuPolicyMips;

    fn insn(operands: Vec<OperandTree>) -> NativeInstruction {
        NativeInstruction::new(0x100, "maddu", operands)
    }

    #[test]
    fn test_adapt_register() {
        let policy = CpuPolicyMips;
        let tree = OperandTree::register(OperandSize::Dword, "$v1");
        let insn = insn(vec![tree.clone()]);
        let operand = adapt(&policy, &insn, &tree).unwrap();
        assert_eq!(operand.size(), OperandSize::Dword);
        assert_eq!(operand.value(), &TypedValue::Register("$v1".to_string()));
    }

    #[test]
    fn test_adapt_immediate() {
        let policy = CpuPolicyMips;
        let tree = OperandTree::immediate(OperandSize::Dword, -7);
        let insn = insn(vec![tree.clone()]);
        let operand = adapt(&policy, &insn, &tree).unwrap();
        assert_eq!(operand.value(), &TypedValue::Immediate(-7));
    }

    #[test]
    fn test_adapt_memory() {
        let policy = CpuPolicyMips;
        let tree = OperandTree::memory(
            OperandSize::Dword,
            OperandExpr::Register("$sp".to_string()),
        );
        let insn = insn(vec![tree.clone()]);
        let operand = adapt(&policy, &insn, &tree).unwrap();
        assert_eq!(
            operand.value(),
            &TypedValue::Memory(MemoryAddress::Register("$sp".to_string()))
        );
    }

    #[test]
    fn test_missing_size_prefix() {
        let policy = CpuPolicyMips;
        let tree = OperandTree::new(OperandExpr::Register("$v1".to_string()));
        let insn = insn(vec![tree.clone()]);
        let err = adapt(&policy, &insn, &tree).unwrap_err();
        assert!(matches!(err, TranslationError::MissingSizePrefix { .. }));
    }

    #[test]
    fn test_unknown_register() {
        let policy = CpuPolicyMips;
        let tree = OperandTree::register(OperandSize::Dword, "$v9");
        let insn = insn(vec![tree.clone()]);
        let err = adapt(&policy, &insn, &tree).unwrap_err();
        assert!(matches!(err, TranslationError::UnknownRegister { ref name, .. } if name == "$v9"));
    }

    #[test]
    fn test_size_mismatch() {
        let policy = CpuPolicyMips;
        let tree = OperandTree::register(OperandSize::Qword, "$v1");
        let insn = insn(vec![tree.clone()]);
        let err = adapt(&policy, &insn, &tree).unwrap_err();
        assert!(matches!(err, TranslationError::OperandSizeMismatch { .. }));
    }

    #[test]
    fn test_nested_prefix_rejected() {
        let policy = CpuPolicyMips;
        let tree = OperandTree::new(OperandExpr::SizePrefix {
            size: OperandSize::Dword,
            child: Box::new(OperandExpr::SizePrefix {
                size: OperandSize::Dword,
                child: Box::new(OperandExpr::Register("$v1".to_string())),
            }),
        });
        let insn = insn(vec![tree.clone()]);
        let err = adapt(&policy, &insn, &tree).unwrap_err();
        assert!(matches!(err, TranslationError::MalformedOperand { .. }));
    }
}
