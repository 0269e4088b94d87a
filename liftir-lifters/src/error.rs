//! Translation error types
//!
//! Translation failures are local to one call and never disturb entries
//! already in the shared output block.

use liftir_spec::OperandSize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("{mnemonic}: operand is missing its size prefix")]
    MissingSizePrefix { mnemonic: String },

    #[error("{mnemonic}: malformed operand tree: {reason}")]
    MalformedOperand {
        mnemonic: String,
        reason: &'static str,
    },

    #[error("{mnemonic}: unknown register {name}")]
    UnknownRegister { mnemonic: String, name: String },

    #[error("{mnemonic}: register {name} is {declared} wide, operand annotated {annotated}")]
    OperandSizeMismatch {
        mnemonic: String,
        name: String,
        declared: OperandSize,
        annotated: OperandSize,
    },

    #[error("{architecture}: unsupported mnemonic {mnemonic}")]
    UnsupportedMnemonic {
        architecture: &'static str,
        mnemonic: String,
    },

    #[error("{mnemonic}: expected {expected} operands, found {found}")]
    OperandCount {
        mnemonic: String,
        expected: usize,
        found: usize,
    },

    #[error("{mnemonic}: unsupported operand size {size}")]
    UnsupportedOperandSize {
        mnemonic: String,
        size: OperandSize,
    },

    #[error("{mnemonic}: operand must be a register")]
    RegisterOperandRequired { mnemonic: String },

    #[error("{mnemonic}: memory operands are not supported for this opcode")]
    UnsupportedAddressingMode { mnemonic: String },

    #[error("{architecture} policy does not define combined register {name}")]
    MissingCombinedRegister {
        architecture: &'static str,
        name: &'static str,
    },
}
