//! # liftir lifters
//!
//! Per-architecture translators from native machine instructions to micro-op
//! sequences. The input is a mnemonic plus size-annotated operand trees (as
//! produced by an external disassembler); the output is an ordered,
//! append-only micro-op sequence with the same runtime effect.
//!
//! Lifters are pure given their inputs: all architecture parameters flow
//! through the [`CpuPolicy`] carried by the [`TranslationEnvironment`], and a
//! failed translation leaves the shared output block untouched.
//!
//! ## Example
//!
//! ```rust
//! use liftir_lifters::{Lifter, TranslationEnvironment};
//! use liftir_lifters::mips::MipsLifter;
//! use liftir_lifters::tree::{NativeInstruction, OperandTree};
//! use liftir_spec::{IrBlock, OperandSize};
//!
//! let lifter = MipsLifter::new();
//! let mut env = TranslationEnvironment::new(lifter.policy());
//! let mut block = IrBlock::new();
//!
//! let insn = NativeInstruction::new(
//!     0x100,
//!     "maddu",
//!     vec![
//!         OperandTree::register(OperandSize::Dword, "$v1"),
//!         OperandTree::register(OperandSize::Dword, "$v2"),
//!     ],
//! );
//! lifter.translate(&mut env, &insn, &mut block).unwrap();
//! assert!(!block.is_empty());
//! ```

pub mod adapter;
pub mod arm;
pub mod environment;
pub mod error;
mod helpers;
pub mod mips;
pub mod tree;

pub use adapter::{adapt, TypedOperand, TypedValue};
pub use environment::TranslationEnvironment;
pub use error::TranslationError;
pub use tree::{NativeInstruction, OperandExpr, OperandTree};

use liftir_spec::{CpuPolicy, IrBlock};

/// A per-architecture translator.
///
/// `translate` appends zero or more micro-ops for one native instruction to
/// `out`; it never reorders or removes prior entries, so one block can
/// accumulate a whole routine's translation across many calls.
pub trait Lifter {
    /// The architecture's register catalog.
    fn policy(&self) -> &dyn CpuPolicy;

    fn translate(
        &self,
        env: &mut TranslationEnvironment<'_>,
        insn: &NativeInstruction,
        out: &mut IrBlock,
    ) -> Result<(), TranslationError>;
}
