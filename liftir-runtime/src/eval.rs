//! Micro-op evaluation
//!
//! One `execute` call per micro-op. Arithmetic runs in `u128` (at least
//! twice the widest register the lifters emit) and every register or memory
//! write truncates to the declared output size; these are the only
//! truncation points.

use crate::error::{Result, RuntimeError};
use crate::memory::MemoryImage;
use crate::registers::{RegisterFile, RegisterStatus};
use liftir_spec::{
    is_temporary, CpuPolicy, Endianness, IrInstruction, IrOperand, IrValue, Opcode, OperandSize,
    Pc,
};

/// Mutable state a micro-op executes against.
pub(crate) struct EvalContext<'a> {
    pub registers: &'a mut RegisterFile,
    pub memory: &'a mut MemoryImage,
    pub policy: &'a dyn CpuPolicy,
    pub endianness: Endianness,
}

/// Where execution continues after a micro-op.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Next,
    Jump(Pc),
}

fn missing(insn: &IrInstruction, reason: &'static str) -> RuntimeError {
    RuntimeError::MalformedInstruction {
        pc: insn.pc(),
        opcode: insn.opcode(),
        reason,
    }
}

fn operand1(insn: &IrInstruction) -> Result<&IrOperand> {
    insn.operand1().ok_or_else(|| missing(insn, "missing first operand"))
}

fn operand2(insn: &IrInstruction) -> Result<&IrOperand> {
    insn.operand2().ok_or_else(|| missing(insn, "missing second operand"))
}

fn operand3(insn: &IrInstruction) -> Result<&IrOperand> {
    insn.operand3().ok_or_else(|| missing(insn, "missing output operand"))
}

/// Names in the policy table or issued by the translation environment are
/// recognized; anything else is an interpretation error.
fn check_recognized(ctx: &EvalContext<'_>, insn: &IrInstruction, name: &str) -> Result<()> {
    if ctx.policy.is_register(name) || is_temporary(name) {
        Ok(())
    } else {
        Err(RuntimeError::UnknownRegister {
            name: name.to_string(),
            pc: insn.pc(),
            opcode: insn.opcode(),
        })
    }
}

/// Resolve an input operand to its current value, truncated to the
/// operand's declared size.
fn read(ctx: &EvalContext<'_>, insn: &IrInstruction, op: &IrOperand) -> Result<u128> {
    match op.value() {
        IrValue::Immediate(value) => Ok(*value),
        IrValue::Register(name) => {
            check_recognized(ctx, insn, name)?;
            match ctx.registers.value(name) {
                Some(value) => Ok(value & op.size().mask()),
                None => Err(RuntimeError::UndefinedRegister {
                    name: name.clone(),
                    pc: insn.pc(),
                    opcode: insn.opcode(),
                }),
            }
        }
        IrValue::SubAddress(_) => Err(missing(insn, "sub-address operand in value position")),
    }
}

/// Write a register destination, truncating to its declared size and
/// marking it defined.
fn write_register(
    ctx: &mut EvalContext<'_>,
    insn: &IrInstruction,
    op: &IrOperand,
    value: u128,
) -> Result<()> {
    let name = op
        .register_name()
        .ok_or_else(|| missing(insn, "output operand must be a register"))?;
    check_recognized(ctx, insn, name)?;
    ctx.registers
        .set(name, value & op.size().mask(), op.size(), RegisterStatus::Defined);
    Ok(())
}

/// Two's-complement interpretation of `value` at `size`.
fn as_signed(value: u128, size: OperandSize) -> i128 {
    let bits = size.bits();
    if bits == 128 {
        value as i128
    } else if value >> (bits - 1) & 1 != 0 {
        value as i128 - (1i128 << bits)
    } else {
        value as i128
    }
}

fn memory_address(value: u128, insn: &IrInstruction) -> Result<u64> {
    u64::try_from(value).map_err(|_| RuntimeError::MemoryOutOfRange {
        address: u64::MAX,
        pc: insn.pc(),
        opcode: insn.opcode(),
    })
}

/// Execute one micro-op.
pub(crate) fn execute(insn: &IrInstruction, ctx: &mut EvalContext<'_>) -> Result<Flow> {
    let opcode = insn.opcode();
    match opcode {
        Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::Mod
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Bsh => {
            let in1 = operand1(insn)?;
            let in2 = operand2(insn)?;
            let out = operand3(insn)?;
            let a = read(ctx, insn, in1)?;
            let b = read(ctx, insn, in2)?;
            let value = match opcode {
                // Wrapping u128 ops are exact mod 2^128; the write below
                // truncates to the declared output size.
                Opcode::Add => a.wrapping_add(b),
                Opcode::Sub => a.wrapping_sub(b),
                Opcode::Mul => a.wrapping_mul(b),
                Opcode::Div | Opcode::Mod => {
                    if b == 0 {
                        return Err(RuntimeError::DivisionByZero {
                            pc: insn.pc(),
                            opcode,
                        });
                    }
                    if opcode == Opcode::Div {
                        a / b
                    } else {
                        a % b
                    }
                }
                Opcode::And => a & b,
                Opcode::Or => a | b,
                Opcode::Xor => a ^ b,
                Opcode::Bsh => {
                    // Shift amount is signed at in2's size; positive shifts
                    // left, negative shifts right (logical).
                    let shift = as_signed(b, in2.size());
                    if shift >= 0 {
                        if shift >= 128 {
                            0
                        } else {
                            a << shift
                        }
                    } else {
                        let shift = -shift;
                        if shift >= 128 {
                            0
                        } else {
                            a >> shift
                        }
                    }
                }
                _ => unreachable!(),
            };
            write_register(ctx, insn, out, value)?;
            Ok(Flow::Next)
        }

        Opcode::Bisz => {
            let a = read(ctx, insn, operand1(insn)?)?;
            let out = operand3(insn)?;
            write_register(ctx, insn, out, u128::from(a == 0))?;
            Ok(Flow::Next)
        }

        Opcode::Str => {
            let a = read(ctx, insn, operand1(insn)?)?;
            let out = operand3(insn)?;
            write_register(ctx, insn, out, a)?;
            Ok(Flow::Next)
        }

        Opcode::Jcc => {
            let condition = read(ctx, insn, operand1(insn)?)?;
            if condition == 0 {
                return Ok(Flow::Next);
            }
            let target = operand3(insn)?;
            let pc = match target.value() {
                IrValue::SubAddress(pc) => *pc,
                IrValue::Immediate(address) => Pc::entry(memory_address(*address, insn)?),
                IrValue::Register(_) => {
                    let address = read(ctx, insn, target)?;
                    Pc::entry(memory_address(address, insn)?)
                }
            };
            Ok(Flow::Jump(pc))
        }

        Opcode::Ldm => {
            let address = memory_address(read(ctx, insn, operand1(insn)?)?, insn)?;
            let out = operand3(insn)?;
            let value = ctx
                .memory
                .load(address, out.size(), ctx.endianness)
                .map_err(|fault| RuntimeError::MemoryOutOfRange {
                    address: fault.address,
                    pc: insn.pc(),
                    opcode,
                })?;
            write_register(ctx, insn, out, value)?;
            Ok(Flow::Next)
        }

        Opcode::Stm => {
            let value_op = operand1(insn)?;
            let value = read(ctx, insn, value_op)?;
            let address = memory_address(read(ctx, insn, operand3(insn)?)?, insn)?;
            ctx.memory
                .store(address, value, value_op.size(), ctx.endianness)
                .map_err(|fault| RuntimeError::MemoryOutOfRange {
                    address: fault.address,
                    pc: insn.pc(),
                    opcode,
                })?;
            Ok(Flow::Next)
        }

        Opcode::Undef => {
            let out = operand3(insn)?;
            let name = out
                .register_name()
                .ok_or_else(|| missing(insn, "undef operand must be a register"))?;
            check_recognized(ctx, insn, name)?;
            ctx.registers.undefine(name, out.size());
            Ok(Flow::Next)
        }

        Opcode::Nop => Ok(Flow::Next),

        Opcode::Unkn => Err(RuntimeError::Untranslatable { pc: insn.pc() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftir_spec::CombinedRegister;

    struct TestPolicy;

    impl CpuPolicy for TestPolicy {
        fn architecture(&self) -> &'static str {
            "test"
        }

        fn registers(&self) -> &[(&'static str, OperandSize)] {
            &[
                ("r0", OperandSize::Dword),
                ("r1", OperandSize::Dword),
                ("HI", OperandSize::Dword),
                ("LO", OperandSize::Dword),
            ]
        }

        fn combined_registers(&self) -> &[CombinedRegister] {
            &[]
        }
    }

    fn ctx<'a>(
        registers: &'a mut RegisterFile,
        memory: &'a mut MemoryImage,
        policy: &'a TestPolicy,
    ) -> EvalContext<'a> {
        EvalContext {
            registers,
            memory,
            policy,
            endianness: Endianness::Little,
        }
    }

    fn insn(
        opcode: Opcode,
        op1: Option<IrOperand>,
        op2: Option<IrOperand>,
        op3: Option<IrOperand>,
    ) -> IrInstruction {
        IrInstruction::new(Pc::new(0x100, 0), opcode, op1, op2, op3)
    }

    #[test]
    fn test_add_truncates_to_output_size() {
        let mut registers = RegisterFile::new();
        let mut memory = MemoryImage::new();
        let policy = TestPolicy;
        registers.set("r0", 0xFFFF_FFFF, OperandSize::Dword, RegisterStatus::Defined);
        registers.set("r1", 1, OperandSize::Dword, RegisterStatus::Defined);
        let mut ctx = ctx(&mut registers, &mut memory, &policy);

        // Qword output keeps the carry.
        let wide = insn(
            Opcode::Add,
            Some(IrOperand::register(OperandSize::Dword, "r0")),
            Some(IrOperand::register(OperandSize::Dword, "r1")),
            Some(IrOperand::register(OperandSize::Qword, "t0")),
        );
        execute(&wide, &mut ctx).unwrap();
        assert_eq!(ctx.registers.value("t0"), Some(0x1_0000_0000));

        // Dword output wraps.
        let narrow = insn(
            Opcode::Add,
            Some(IrOperand::register(OperandSize::Dword, "r0")),
            Some(IrOperand::register(OperandSize::Dword, "r1")),
            Some(IrOperand::register(OperandSize::Dword, "t1")),
        );
        execute(&narrow, &mut ctx).unwrap();
        assert_eq!(ctx.registers.value("t1"), Some(0));
    }

    #[test]
    fn test_mul_full_precision() {
        let mut registers = RegisterFile::new();
        let mut memory = MemoryImage::new();
        let policy = TestPolicy;
        registers.set("r0", 0xFFFF_FFFF, OperandSize::Dword, RegisterStatus::Defined);
        registers.set("r1", 0xFFFF_FFFF, OperandSize::Dword, RegisterStatus::Defined);
        let mut ctx = ctx(&mut registers, &mut memory, &policy);

        let mul = insn(
            Opcode::Mul,
            Some(IrOperand::register(OperandSize::Dword, "r0")),
            Some(IrOperand::register(OperandSize::Dword, "r1")),
            Some(IrOperand::register(OperandSize::Qword, "t0")),
        );
        execute(&mul, &mut ctx).unwrap();
        assert_eq!(ctx.registers.value("t0"), Some(0xFFFF_FFFE_0000_0001));
    }

    #[test]
    fn test_bsh_directions() {
        let mut registers = RegisterFile::new();
        let mut memory = MemoryImage::new();
        let policy = TestPolicy;
        registers.set("r0", 0x8000_0001, OperandSize::Dword, RegisterStatus::Defined);
        let mut ctx = ctx(&mut registers, &mut memory, &policy);

        let left = insn(
            Opcode::Bsh,
            Some(IrOperand::register(OperandSize::Dword, "r0")),
            Some(IrOperand::immediate(OperandSize::Qword, 32)),
            Some(IrOperand::register(OperandSize::Qword, "t0")),
        );
        execute(&left, &mut ctx).unwrap();
        assert_eq!(ctx.registers.value("t0"), Some(0x8000_0001_0000_0000));

        let right = insn(
            Opcode::Bsh,
            Some(IrOperand::register(OperandSize::Dword, "r0")),
            Some(IrOperand::immediate(OperandSize::Qword, -31)),
            Some(IrOperand::register(OperandSize::Dword, "t1")),
        );
        execute(&right, &mut ctx).unwrap();
        assert_eq!(ctx.registers.value("t1"), Some(1));
    }

    #[test]
    fn test_bsh_right_shift_reaches_past_out_width() {
        let mut registers = RegisterFile::new();
        let mut memory = MemoryImage::new();
        let policy = TestPolicy;
        registers.set(
            "t0",
            0xFFFF_FFFF_0000_0000,
            OperandSize::Qword,
            RegisterStatus::Defined,
        );
        let mut ctx = ctx(&mut registers, &mut memory, &policy);

        // Shift amount equals the dword out width; the qword input's high
        // bits still land in the result.
        let right = insn(
            Opcode::Bsh,
            Some(IrOperand::register(OperandSize::Qword, "t0")),
            Some(IrOperand::immediate(OperandSize::Qword, -32)),
            Some(IrOperand::register(OperandSize::Dword, "t1")),
        );
        execute(&right, &mut ctx).unwrap();
        assert_eq!(ctx.registers.value("t1"), Some(0xFFFF_FFFF));
    }

    #[test]
    fn test_bisz() {
        let mut registers = RegisterFile::new();
        let mut memory = MemoryImage::new();
        let policy = TestPolicy;
        registers.set("r0", 0, OperandSize::Dword, RegisterStatus::Defined);
        registers.set("r1", 0x80, OperandSize::Dword, RegisterStatus::Defined);
        let mut ctx = ctx(&mut registers, &mut memory, &policy);

        let zero = insn(
            Opcode::Bisz,
            Some(IrOperand::register(OperandSize::Dword, "r0")),
            None,
            Some(IrOperand::register(OperandSize::Byte, "t0")),
        );
        execute(&zero, &mut ctx).unwrap();
        assert_eq!(ctx.registers.value("t0"), Some(1));

        let nonzero = insn(
            Opcode::Bisz,
            Some(IrOperand::register(OperandSize::Dword, "r1")),
            None,
            Some(IrOperand::register(OperandSize::Byte, "t1")),
        );
        execute(&nonzero, &mut ctx).unwrap();
        assert_eq!(ctx.registers.value("t1"), Some(0));
    }

    #[test]
    fn test_undefined_read_fails() {
        let mut registers = RegisterFile::new();
        let mut memory = MemoryImage::new();
        let policy = TestPolicy;
        let mut ctx = ctx(&mut registers, &mut memory, &policy);

        let add = insn(
            Opcode::Add,
            Some(IrOperand::register(OperandSize::Dword, "r0")),
            Some(IrOperand::immediate(OperandSize::Dword, 1)),
            Some(IrOperand::register(OperandSize::Dword, "t0")),
        );
        let err = execute(&add, &mut ctx).unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedRegister { ref name, .. } if name == "r0"));
    }

    #[test]
    fn test_unknown_register_fails() {
        let mut registers = RegisterFile::new();
        let mut memory = MemoryImage::new();
        let policy = TestPolicy;
        registers.set("bogus", 1, OperandSize::Dword, RegisterStatus::Defined);
        let mut ctx = ctx(&mut registers, &mut memory, &policy);

        let mov = insn(
            Opcode::Str,
            Some(IrOperand::register(OperandSize::Dword, "bogus")),
            None,
            Some(IrOperand::register(OperandSize::Dword, "t0")),
        );
        let err = execute(&mov, &mut ctx).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownRegister { ref name, .. } if name == "bogus"));
    }

    #[test]
    fn test_division_by_zero_fails() {
        let mut registers = RegisterFile::new();
        let mut memory = MemoryImage::new();
        let policy = TestPolicy;
        registers.set("r0", 10, OperandSize::Dword, RegisterStatus::Defined);
        let mut ctx = ctx(&mut registers, &mut memory, &policy);

        let div = insn(
            Opcode::Div,
            Some(IrOperand::register(OperandSize::Dword, "r0")),
            Some(IrOperand::immediate(OperandSize::Dword, 0)),
            Some(IrOperand::register(OperandSize::Dword, "t0")),
        );
        let err = execute(&div, &mut ctx).unwrap_err();
        assert!(matches!(err, RuntimeError::DivisionByZero { .. }));
    }

    #[test]
    fn test_str_zero_extends_and_truncates() {
        let mut registers = RegisterFile::new();
        let mut memory = MemoryImage::new();
        let policy = TestPolicy;
        registers.set("r0", 0xAABB_CCDD, OperandSize::Dword, RegisterStatus::Defined);
        let mut ctx = ctx(&mut registers, &mut memory, &policy);

        let narrow = insn(
            Opcode::Str,
            Some(IrOperand::register(OperandSize::Dword, "r0")),
            None,
            Some(IrOperand::register(OperandSize::Word, "t0")),
        );
        execute(&narrow, &mut ctx).unwrap();
        assert_eq!(ctx.registers.value("t0"), Some(0xCCDD));

        let widen = insn(
            Opcode::Str,
            Some(IrOperand::register(OperandSize::Dword, "r0")),
            None,
            Some(IrOperand::register(OperandSize::Qword, "t1")),
        );
        execute(&widen, &mut ctx).unwrap();
        assert_eq!(ctx.registers.value("t1"), Some(0xAABB_CCDD));
    }

    #[test]
    fn test_jcc_flow() {
        let mut registers = RegisterFile::new();
        let mut memory = MemoryImage::new();
        let policy = TestPolicy;
        let mut ctx = ctx(&mut registers, &mut memory, &policy);

        let taken = insn(
            Opcode::Jcc,
            Some(IrOperand::immediate(OperandSize::Byte, 1)),
            None,
            Some(IrOperand::sub_address(Pc::new(0x200, 0))),
        );
        assert_eq!(execute(&taken, &mut ctx).unwrap(), Flow::Jump(Pc::new(0x200, 0)));

        let untaken = insn(
            Opcode::Jcc,
            Some(IrOperand::immediate(OperandSize::Byte, 0)),
            None,
            Some(IrOperand::sub_address(Pc::new(0x200, 0))),
        );
        assert_eq!(execute(&untaken, &mut ctx).unwrap(), Flow::Next);
    }

    #[test]
    fn test_memory_round_trip_and_size() {
        let mut registers = RegisterFile::new();
        let mut memory = MemoryImage::new();
        let policy = TestPolicy;
        registers.set("r0", 0xDEAD_BEEF, OperandSize::Dword, RegisterStatus::Defined);
        let mut ctx = ctx(&mut registers, &mut memory, &policy);

        let store = insn(
            Opcode::Stm,
            Some(IrOperand::register(OperandSize::Dword, "r0")),
            None,
            Some(IrOperand::immediate(OperandSize::Qword, 0x1000)),
        );
        execute(&store, &mut ctx).unwrap();
        assert_eq!(ctx.memory.size(), 4);

        let load = insn(
            Opcode::Ldm,
            Some(IrOperand::immediate(OperandSize::Qword, 0x1000)),
            None,
            Some(IrOperand::register(OperandSize::Dword, "t0")),
        );
        execute(&load, &mut ctx).unwrap();
        assert_eq!(ctx.registers.value("t0"), Some(0xDEAD_BEEF));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn binary(
            opcode: Opcode,
            a: u128,
            b: u128,
            out_size: OperandSize,
        ) -> Result<u128> {
            let mut registers = RegisterFile::new();
            let mut memory = MemoryImage::new();
            let policy = TestPolicy;
            registers.set("r0", a, OperandSize::Dword, RegisterStatus::Defined);
            registers.set("r1", b, OperandSize::Dword, RegisterStatus::Defined);
            let mut ctx = ctx(&mut registers, &mut memory, &policy);

            let op = insn(
                opcode,
                Some(IrOperand::register(OperandSize::Dword, "r0")),
                Some(IrOperand::register(OperandSize::Dword, "r1")),
                Some(IrOperand::register(out_size, "t0")),
            );
            execute(&op, &mut ctx)?;
            Ok(registers.value("t0").unwrap())
        }

        proptest! {
            #[test]
            fn prop_add_sub_inverse(a in any::<u32>(), b in any::<u32>()) {
                let sum = binary(Opcode::Add, a as u128, b as u128, OperandSize::Dword).unwrap();
                // Subtracting b back recovers a modulo 2^32.
                let mut registers = RegisterFile::new();
                let mut memory = MemoryImage::new();
                let policy = TestPolicy;
                registers.set("r0", sum, OperandSize::Dword, RegisterStatus::Defined);
                registers.set("r1", b as u128, OperandSize::Dword, RegisterStatus::Defined);
                let mut ctx = ctx(&mut registers, &mut memory, &policy);
                let sub = insn(
                    Opcode::Sub,
                    Some(IrOperand::register(OperandSize::Dword, "r0")),
                    Some(IrOperand::register(OperandSize::Dword, "r1")),
                    Some(IrOperand::register(OperandSize::Dword, "t0")),
                );
                execute(&sub, &mut ctx).unwrap();
                prop_assert_eq!(registers.value("t0"), Some(a as u128));
            }

            #[test]
            fn prop_mul_matches_widening_arithmetic(a in any::<u32>(), b in any::<u32>()) {
                let wide = binary(Opcode::Mul, a as u128, b as u128, OperandSize::Qword).unwrap();
                prop_assert_eq!(wide, (a as u64 as u128) * (b as u64 as u128));
                let narrow = binary(Opcode::Mul, a as u128, b as u128, OperandSize::Dword).unwrap();
                prop_assert_eq!(narrow, wide & OperandSize::Dword.mask());
            }

            #[test]
            fn prop_bsh_left_matches_shift(v in any::<u32>(), s in 0u32..64) {
                let mut registers = RegisterFile::new();
                let mut memory = MemoryImage::new();
                let policy = TestPolicy;
                registers.set("r0", v as u128, OperandSize::Dword, RegisterStatus::Defined);
                let mut ctx = ctx(&mut registers, &mut memory, &policy);
                let op = insn(
                    Opcode::Bsh,
                    Some(IrOperand::register(OperandSize::Dword, "r0")),
                    Some(IrOperand::immediate(OperandSize::Qword, s as i64)),
                    Some(IrOperand::register(OperandSize::Qword, "t0")),
                );
                execute(&op, &mut ctx).unwrap();
                prop_assert_eq!(
                    registers.value("t0"),
                    Some(((v as u128) << s) & OperandSize::Qword.mask())
                );
            }
        }
    }

    #[test]
    fn test_undef_marks_register() {
        let mut registers = RegisterFile::new();
        let mut memory = MemoryImage::new();
        let policy = TestPolicy;
        registers.set("r0", 7, OperandSize::Dword, RegisterStatus::Defined);
        let mut ctx = ctx(&mut registers, &mut memory, &policy);

        let undef = insn(
            Opcode::Undef,
            None,
            None,
            Some(IrOperand::register(OperandSize::Dword, "r0")),
        );
        execute(&undef, &mut ctx).unwrap();
        assert_eq!(ctx.registers.value("r0"), None);
        assert_eq!(ctx.registers.status("r0"), Some(RegisterStatus::Undefined));
    }
}
