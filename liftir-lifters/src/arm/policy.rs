//! ARM (AArch32) register catalog

use liftir_spec::{CpuPolicy, OperandSize};

const REGISTERS: &[(&str, OperandSize)] = &[
    ("r0", OperandSize::Dword),
    ("r1", OperandSize::Dword),
    ("r2", OperandSize::Dword),
    ("r3", OperandSize::Dword),
    ("r4", OperandSize::Dword),
    ("r5", OperandSize::Dword),
    ("r6", OperandSize::Dword),
    ("r7", OperandSize::Dword),
    ("r8", OperandSize::Dword),
    ("r9", OperandSize::Dword),
    ("r10", OperandSize::Dword),
    ("r11", OperandSize::Dword),
    ("r12", OperandSize::Dword),
    ("r13", OperandSize::Dword),
    ("r14", OperandSize::Dword),
    ("r15", OperandSize::Dword),
];

/// ARM register names and widths. The long-multiply destinations are named
/// per instruction, so there is no fixed combined-register table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuPolicyArm;

impl CpuPolicy for CpuPolicyArm {
    fn architecture(&self) -> &'static str {
        "arm"
    }

    fn registers(&self) -> &[(&'static str, OperandSize)] {
        REGISTERS
    }

    fn program_counter(&self) -> Option<&'static str> {
        Some("r15")
    }
}
