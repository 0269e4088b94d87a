//! ARM multiply family
//!
//! `mul`/`mla` keep only the low 32 bits, so the unsigned widening multiply
//! covers both signedness interpretations. The long forms name their own
//! destination pair (`rdlo, rdhi, rm, rs`), unlike a fixed accumulator.

use crate::arm::arith::dword_operands;
use crate::environment::TranslationEnvironment;
use crate::error::TranslationError;
use crate::helpers::{
    dword_mask, qword, read_pair, signed_product, unsigned_product, write_pair,
};
use crate::tree::NativeInstruction;
use liftir_spec::IrBlock;

/// mul rd, rm, rs: rd = low 32 bits of rm * rs.
pub(crate) fn translate_mul(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    let operands = dword_operands(env, insn, 3)?;
    operands[0].expect_register(insn)?;
    let rd = operands[0].as_ir_operand(insn)?;
    let rm = operands[1].as_ir_operand(insn)?;
    let rs = operands[2].as_ir_operand(insn)?;

    let mut emit = out.emitter(insn.address());
    let product = unsigned_product(env, &mut emit, &rm, &rs);
    emit.and(qword(&product), dword_mask(), rd);
    Ok(())
}

/// mla rd, rm, rs, rn: rd = low 32 bits of rm * rs + rn.
pub(crate) fn translate_mla(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    let operands = dword_operands(env, insn, 4)?;
    operands[0].expect_register(insn)?;
    let rd = operands[0].as_ir_operand(insn)?;
    let rm = operands[1].as_ir_operand(insn)?;
    let rs = operands[2].as_ir_operand(insn)?;
    let rn = operands[3].as_ir_operand(insn)?;

    let mut emit = out.emitter(insn.address());
    let product = unsigned_product(env, &mut emit, &rm, &rs);
    let sum = env.temp();
    emit.add(qword(&product), rn, qword(&sum));
    emit.and(qword(&sum), dword_mask(), rd);
    Ok(())
}

/// Shared body of the four long multiplies: `rdlo, rdhi, rm, rs`.
fn translate_long(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
    signed: bool,
    accumulate: bool,
) -> Result<(), TranslationError> {
    let operands = dword_operands(env, insn, 4)?;
    let rdlo = operands[0].expect_register(insn)?.to_string();
    let rdhi = operands[1].expect_register(insn)?.to_string();
    let rm = operands[2].as_ir_operand(insn)?;
    let rs = operands[3].as_ir_operand(insn)?;

    let mut emit = out.emitter(insn.address());
    let product = if signed {
        signed_product(env, &mut emit, &rm, &rs)
    } else {
        unsigned_product(env, &mut emit, &rm, &rs)
    };
    let result = if accumulate {
        let current = read_pair(env, &mut emit, &rdhi, &rdlo);
        let updated = env.temp();
        emit.add(qword(&current), qword(&product), qword(&updated));
        updated
    } else {
        product
    };
    write_pair(env, &mut emit, &result, &rdhi, &rdlo);
    Ok(())
}

/// umull rdlo, rdhi, rm, rs: rdhi:rdlo = rm * rs (unsigned).
pub(crate) fn translate_umull(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    translate_long(env, insn, out, false, false)
}

/// umlal rdlo, rdhi, rm, rs: rdhi:rdlo = (rdhi:rdlo + rm * rs) mod 2^64.
pub(crate) fn translate_umlal(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    translate_long(env, insn, out, false, true)
}

/// smull rdlo, rdhi, rm, rs: rdhi:rdlo = rm * rs (signed).
pub(crate) fn translate_smull(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    translate_long(env, insn, out, true, false)
}

/// smlal rdlo, rdhi, rm, rs: rdhi:rdlo = (rdhi:rdlo + rm * rs) mod 2^64.
pub(crate) fn translate_smlal(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    translate_long(env, insn, out, true, true)
}
