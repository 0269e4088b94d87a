//! ARM lifter
//!
//! Covers the data-processing add/sub and the multiply family. Flag-setting
//! S variants (`adds`, `muls`, `umulls`, ...) are not modeled and fall
//! through to the unsupported-mnemonic error like any other mnemonic.

pub(crate) mod arith;
mod mult;
mod policy;

pub use policy::CpuPolicyArm;

use crate::environment::TranslationEnvironment;
use crate::error::TranslationError;
use crate::tree::NativeInstruction;
use crate::Lifter;
use liftir_spec::{CpuPolicy, IrBlock};
use tracing::trace;

#[derive(Debug, Clone, Copy, Default)]
pub struct ArmLifter {
    policy: CpuPolicyArm,
}

impl ArmLifter {
    pub const fn new() -> Self {
        ArmLifter {
            policy: CpuPolicyArm,
        }
    }
}

impl Lifter for ArmLifter {
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
        trace!(address = insn.address(), mnemonic = %mnemonic, "lifting arm instruction");

        match mnemonic.as_str() {
            "add" => arith::translate_add(env, insn, out),
            "sub" => arith::translate_sub(env, insn, out),
            "mul" => mult::translate_mul(env, insn, out),
            "mla" => mult::translate_mla(env, insn, out),
            "umull" => mult::translate_umull(env, insn, out),
            "umlal" => mult::translate_umlal(env, insn, out),
            "smull" => mult::translate_smull(env, insn, out),
            "smlal" => mult::translate_smlal(env, insn, out),
            _ => Err(TranslationError::UnsupportedMnemonic {
                architecture: "arm",
                mnemonic,
            }),
        }
    }
}
