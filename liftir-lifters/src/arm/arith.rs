//! ARM add/subtract
//!
//! Only the register/immediate data-processing forms are covered; shifted
//! operands and the flag-setting S variants are rejected at dispatch.

use crate::adapter::{adapt, TypedOperand};
use crate::environment::TranslationEnvironment;
use crate::error::TranslationError;
use crate::helpers::{dword_mask, qword};
use crate::tree::NativeInstruction;
use liftir_spec::{IrBlock, OperandSize};

/// Adapt exactly `expected` dword-sized operands.
pub(crate) fn dword_operands(
    env: &TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    expected: usize,
) -> Result<Vec<TypedOperand>, TranslationError> {
    let operands = insn.operands();
    if operands.len() != expected {
        return Err(TranslationError::OperandCount {
            mnemonic: insn.mnemonic().to_string(),
            expected,
            found: operands.len(),
        });
    }

    let mut adapted = Vec::with_capacity(expected);
    for tree in operands {
        let operand = adapt(env.policy(), insn, tree)?;
        if operand.size() != OperandSize::Dword {
            return Err(TranslationError::UnsupportedOperandSize {
                mnemonic: insn.mnemonic().to_string(),
                size: operand.size(),
            });
        }
        adapted.push(operand);
    }
    Ok(adapted)
}

/// add rd, rn, op2: rd = (rn + op2) mod 2^32.
pub(crate) fn translate_add(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    let operands = dword_operands(env, insn, 3)?;
    operands[0].expect_register(insn)?;
    let rd = operands[0].as_ir_operand(insn)?;
    let rn = operands[1].as_ir_operand(insn)?;
    let op2 = operands[2].as_ir_operand(insn)?;

    let mut emit = out.emitter(insn.address());
    let sum = env.temp();
    emit.add(rn, op2, qword(&sum));
    emit.and(qword(&sum), dword_mask(), rd);
    Ok(())
}

/// sub rd, rn, op2: rd = (rn - op2) mod 2^32.
pub(crate) fn translate_sub(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    let operands = dword_operands(env, insn, 3)?;
    operands[0].expect_register(insn)?;
    let rd = operands[0].as_ir_operand(insn)?;
    let rn = operands[1].as_ir_operand(insn)?;
    let op2 = operands[2].as_ir_operand(insn)?;

    let mut emit = out.emitter(insn.address());
    let difference = env.temp();
    emit.sub(rn, op2, qword(&difference));
    emit.and(qword(&difference), dword_mask(), rd);
    Ok(())
}
