//! MIPS lifter
//!
//! Covers the 32-bit arithmetic family; anything else is an
//! unsupported-mnemonic translation error the caller can skip or flag.

pub(crate) mod arith;
mod mult;
mod policy;

pub use policy::CpuPolicyMips;

use crate::environment::TranslationEnvironment;
use crate::error::TranslationError;
use crate::tree::NativeInstruction;
use crate::Lifter;
use liftir_spec::{CpuPolicy, IrBlock};
use tracing::trace;

#[derive(Debug, Clone, Copy, Default)]
pub struct MipsLifter {
    policy: CpuPolicyMips,
}

impl MipsLifter {
    pub const fn new() -> Self {
        MipsLifter {
            policy: CpuPolicyMips,
        }
    }
}

impl Lifter for MipsLifter {
    fn policy(&self) -> &dyn CpuPolicy {
        &self.policy
    }

    fn translate(
        &self,
        env: &mut TranslationEnvironment<'_>,
        insn: &NativeInstruction,
        out: &mut IrBlock,
    ) -> Result<(), TranslationError> {
        let mnemonic = insn.mnemonic().to_ascii_lowercase();
        trace!(address = insn.address(), mnemonic = %mnemonic, "lifting mips instruction");

        match mnemonic.as_str() {
            "add" | "addu" | "addi" | "addiu" => arith::translate_add(env, insn, out),
            "sub" | "subu" => arith::translate_sub(env, insn, out),
            "mul" => mult::translate_mul(env, insn, out),
            "mult" => mult::translate_mult(env, insn, out),
            "multu" => mult::translate_multu(env, insn, out),
            "madd" => mult::translate_madd(env, insn, out),
            "maddu" => mult::translate_maddu(env, insn, out),
            "msub" => mult::translate_msub(env, insn, out),
            "msubu" => mult::translate_msubu(env, insn, out),
            _ => Err(TranslationError::UnsupportedMnemonic {
                architecture: "mips",
                mnemonic,
            }),
        }
    }
}
