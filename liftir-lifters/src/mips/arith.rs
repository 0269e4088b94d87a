//! MIPS add/subtract family
//!
//! All results are computed into a qword temporary and masked back to dword,
//! so carries out of bit 31 are discarded exactly as the hardware does. The
//! overflow trap of `add`/`addi` is not modeled; they lift identically to
//! their unsigned-suffixed forms.

use crate::adapter::adapt;
use crate::environment::TranslationEnvironment;
use crate::error::TranslationError;
use crate::helpers::{dword_mask, qword};
use crate::tree::NativeInstruction;
use liftir_spec::{IrBlock, IrOperand, OperandSize};

/// Adapt `rd, rs, rt` where rd must be a register and rs/rt may be a
/// register or an immediate. Everything must be dword-sized.
pub(crate) fn three_operands(
    env: &TranslationEnvironment<'_>,
    insn: &NativeInstruction,
) -> Result<(IrOperand, IrOperand, IrOperand), TranslationError> {
    let operands = insn.operands();
    if operands.len() != 3 {
        return Err(TranslationError::OperandCount {
            mnemonic: insn.mnemonic().to_string(),
            expected: 3,
            found: operands.len(),
        });
    }

    let rd = adapt(env.policy(), insn, &operands[0])?;
    let rs = adapt(env.policy(), insn, &operands[1])?;
    let rt = adapt(env.policy(), insn, &operands[2])?;

    for operand in [&rd, &rs, &rt] {
        if operand.size() != OperandSize::Dword {
            return Err(TranslationError::UnsupportedOperandSize {
                mnemonic: insn.mnemonic().to_string(),
                size: operand.size(),
            });
        }
    }
    rd.expect_register(insn)?;

    Ok((
        rd.as_ir_operand(insn)?,
        rs.as_ir_operand(insn)?,
        rt.as_ir_operand(insn)?,
    ))
}

/// add/addu/addi/addiu: rd = (rs + rt) mod 2^32.
pub(crate) fn translate_add(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    let (rd, rs, rt) = three_operands(env, insn)?;

    let mut emit = out.emitter(insn.address());
    let sum = env.temp();
    emit.add(rs, rt, qword(&sum));
    emit.and(qword(&sum), dword_mask(), rd);
    Ok(())
}

/// sub/subu: rd = (rs - rt) mod 2^32.
pub(crate) fn translate_sub(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    let (rd, rs, rt) = three_operands(env, insn)?;

    let mut emit = out.emitter(insn.address());
    let difference = env.temp();
    emit.sub(rs, rt, qword(&difference));
    emit.and(qword(&difference), dword_mask(), rd);
    Ok(())
}
