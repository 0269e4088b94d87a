//! MIPS multiply family
//!
//! `mult`/`multu` write a full 64-bit product into HI:LO; `madd*`/`msub*`
//! accumulate into it with wraparound at 64 bits. The accumulator pair comes
//! from the CPU policy's combined-register table; the lifters never hardcode
//! HI/LO themselves.
//!
//! Composition for the accumulate forms (the IR has no widening
//! multiply-accumulate):
//! 1. widening 32x32 -> 64 product into a qword temporary
//! 2. read HI:LO as one qword (high half first)
//! 3. add or subtract, wrapping at 2^64
//! 4. split back into HI and LO, both marked defined

use crate::adapter::adapt;
use crate::environment::TranslationEnvironment;
use crate::error::TranslationError;
use crate::helpers::{
    dword_mask, qword, read_pair, signed_product, unsigned_product, write_pair,
};
use crate::mips::arith::three_operands;
use crate::tree::NativeInstruction;
use liftir_spec::{CombinedRegister, IrBlock, IrOperand, OperandSize};

/// Adapt the `rs, rt` source pair of a two-operand multiply.
fn two_sources(
    env: &TranslationEnvironment<'_>,
    insn: &NativeInstruction,
) -> Result<(IrOperand, IrOperand), TranslationError> {
    let operands = insn.operands();
    if operands.len() != 2 {
        return Err(TranslationError::OperandCount {
            mnemonic: insn.mnemonic().to_string(),
            expected: 2,
            found: operands.len(),
        });
    }

    let rs = adapt(env.policy(), insn, &operands[0])?;
    let rt = adapt(env.policy(), insn, &operands[1])?;
    for operand in [&rs, &rt] {
        if operand.size() != OperandSize::Dword {
            return Err(TranslationError::UnsupportedOperandSize {
                mnemonic: insn.mnemonic().to_string(),
                size: operand.size(),
            });
        }
        operand.expect_register(insn)?;
    }

    Ok((rs.as_ir_operand(insn)?, rt.as_ir_operand(insn)?))
}

/// The HI:LO accumulator, or a translation error if the policy lacks it.
fn accumulator(
    env: &TranslationEnvironment<'_>,
) -> Result<CombinedRegister, TranslationError> {
    env.policy()
        .combined_register("HILO")
        .copied()
        .ok_or(TranslationError::MissingCombinedRegister {
            architecture: env.policy().architecture(),
            name: "HILO",
        })
}

/// multu: HI:LO = rs * rt (unsigned).
pub(crate) fn translate_multu(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    let (rs, rt) = two_sources(env, insn)?;
    let acc = accumulator(env)?;

    let mut emit = out.emitter(insn.address());
    let product = unsigned_product(env, &mut emit, &rs, &rt);
    write_pair(env, &mut emit, &product, acc.high, acc.low);
    Ok(())
}

/// mult: HI:LO = rs * rt (signed).
pub(crate) fn translate_mult(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    let (rs, rt) = two_sources(env, insn)?;
    let acc = accumulator(env)?;

    let mut emit = out.emitter(insn.address());
    let product = signed_product(env, &mut emit, &rs, &rt);
    write_pair(env, &mut emit, &product, acc.high, acc.low);
    Ok(())
}

fn translate_accumulate(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
    signed: bool,
    subtract: bool,
) -> Result<(), TranslationError> {
    let (rs, rt) = two_sources(env, insn)?;
    let acc = accumulator(env)?;

    let mut emit = out.emitter(insn.address());
    let product = if signed {
        signed_product(env, &mut emit, &rs, &rt)
    } else {
        unsigned_product(env, &mut emit, &rs, &rt)
    };
    let current = read_pair(env, &mut emit, acc.high, acc.low);
    let updated = env.temp();
    if subtract {
        emit.sub(qword(&current), qword(&product), qword(&updated));
    } else {
        emit.add(qword(&current), qword(&product), qword(&updated));
    }
    write_pair(env, &mut emit, &updated, acc.high, acc.low);
    Ok(())
}

/// maddu: HI:LO = (HI:LO + rs * rt) mod 2^64 (unsigned).
pub(crate) fn translate_maddu(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    translate_accumulate(env, insn, out, false, false)
}

/// madd: HI:LO = (HI:LO + rs * rt) mod 2^64 (signed product).
pub(crate) fn translate_madd(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    translate_accumulate(env, insn, out, true, false)
}

/// msubu: HI:LO = (HI:LO - rs * rt) mod 2^64 (unsigned).
pub(crate) fn translate_msubu(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    translate_accumulate(env, insn, out, false, true)
}

/// msub: HI:LO = (HI:LO - rs * rt) mod 2^64 (signed product).
pub(crate) fn translate_msub(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    translate_accumulate(env, insn, out, true, true)
}

/// mul (MIPS32 three-operand): rd = low 32 bits of rs * rt.
///
/// The low half of the product is sign-agnostic, so the unsigned widening
/// multiply suffices.
pub(crate) fn translate_mul(
    env: &mut TranslationEnvironment<'_>,
    insn: &NativeInstruction,
    out: &mut IrBlock,
) -> Result<(), TranslationError> {
    let (rd, rs, rt) = three_operands(env, insn)?;

    let mut emit = out.emitter(insn.address());
    let product = unsigned_product(env, &mut emit, &rs, &rt);
    emit.and(qword(&product), dword_mask(), rd);
    Ok(())
}
