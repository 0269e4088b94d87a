//! Shared micro-op compositions
//!
//! The IR has no widening multiply-accumulate and no signed multiply; both
//! are fixed compositions built here. All intermediates stay in qword
//! temporaries so nothing is truncated before the final sized writes.

use crate::environment::TranslationEnvironment;
use liftir_spec::{Emitter, IrOperand, OperandSize};

pub(crate) fn dword(name: &str) -> IrOperand {
    IrOperand::register(OperandSize::Dword, name)
}

pub(crate) fn qword(name: &str) -> IrOperand {
    IrOperand::register(OperandSize::Qword, name)
}

fn shift_amount(amount: i64) -> IrOperand {
    IrOperand::immediate(OperandSize::Byte, amount)
}

pub(crate) fn dword_mask() -> IrOperand {
    IrOperand::immediate_unsigned(OperandSize::Qword, 0xFFFF_FFFF)
}

/// Unsigned 32x32 -> 64 product into a fresh qword temporary. The sources
/// are zero-extended by the widening multiply itself; no precision is lost.
pub(crate) fn unsigned_product(
    env: &mut TranslationEnvironment<'_>,
    emit: &mut Emitter<'_>,
    a: &IrOperand,
    b: &IrOperand,
) -> String {
    let product = env.temp();
    emit.mul(a.clone(), b.clone(), qword(&product));
    product
}

/// Signed 32x32 product mod 2^64 into a fresh qword temporary.
///
/// Uses the two's-complement correction identity
/// `a_s * b_s = a_u * b_u - (sign(a) * b_u << 32) - (sign(b) * a_u << 32)`
/// (mod 2^64), so only unsigned micro-ops are needed.
pub(crate) fn signed_product(
    env: &mut TranslationEnvironment<'_>,
    emit: &mut Emitter<'_>,
    a: &IrOperand,
    b: &IrOperand,
) -> String {
    let product = unsigned_product(env, emit, a, b);

    let sign_a = env.temp();
    emit.bsh(a.clone(), shift_amount(-31), dword(&sign_a));
    let correction_a = env.temp();
    emit.mul(dword(&sign_a), b.clone(), qword(&correction_a));
    let correction_a_shifted = env.temp();
    emit.bsh(qword(&correction_a), shift_amount(32), qword(&correction_a_shifted));

    let sign_b = env.temp();
    emit.bsh(b.clone(), shift_amount(-31), dword(&sign_b));
    let correction_b = env.temp();
    emit.mul(dword(&sign_b), a.clone(), qword(&correction_b));
    let correction_b_shifted = env.temp();
    emit.bsh(qword(&correction_b), shift_amount(32), qword(&correction_b_shifted));

    let correction = env.temp();
    emit.add(
        qword(&correction_a_shifted),
        qword(&correction_b_shifted),
        qword(&correction),
    );

    let signed = env.temp();
    emit.sub(qword(&product), qword(&correction), qword(&signed));
    signed
}

/// Read a high:low dword register pair as one qword temporary
/// (`high << 32 | low`).
pub(crate) fn read_pair(
    env: &mut TranslationEnvironment<'_>,
    emit: &mut Emitter<'_>,
    high: &str,
    low: &str,
) -> String {
    let high_shifted = env.temp();
    emit.bsh(dword(high), shift_amount(32), qword(&high_shifted));
    let joined = env.temp();
    emit.or(qword(&high_shifted), dword(low), qword(&joined));
    joined
}

/// Split a qword temporary back into a high:low dword register pair, marking
/// both halves defined.
pub(crate) fn write_pair(
    env: &mut TranslationEnvironment<'_>,
    emit: &mut Emitter<'_>,
    value: &str,
    high: &str,
    low: &str,
) {
    emit.and(qword(value), dword_mask(), dword(low));
    let high_bits = env.temp();
    emit.bsh(qword(value), shift_amount(-32), qword(&high_bits));
    emit.and(qword(&high_bits), dword_mask(), dword(high));
}
