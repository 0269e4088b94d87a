//! MIPS register catalog

use liftir_spec::{CombinedRegister, CpuPolicy, OperandSize};

const REGISTERS: &[(&str, OperandSize)] = &[
    ("$zero", OperandSize::Dword),
    ("$at", OperandSize::Dword),
    ("$v0", OperandSize::Dword),
    ("$v1", OperandSize::Dword),
    ("$v2", OperandSize::Dword),
    ("$a0", OperandSize::Dword),
    ("$a1", OperandSize::Dword),
    ("$a2", OperandSize::Dword),
    ("$a3", OperandSize::Dword),
    ("$t0", OperandSize::Dword),
    ("$t1", OperandSize::Dword),
    ("$t2", OperandSize::Dword),
    ("$t3", OperandSize::Dword),
    ("$t4", OperandSize::Dword),
    ("$t5", OperandSize::Dword),
    ("$t6", OperandSize::Dword),
    ("$t7", OperandSize::Dword),
    ("$s0", OperandSize::Dword),
    ("$s1", OperandSize::Dword),
    ("$s2", OperandSize::Dword),
    ("$s3", OperandSize::Dword),
    ("$s4", OperandSize::Dword),
    ("$s5", OperandSize::Dword),
    ("$s6", OperandSize::Dword),
    ("$s7", OperandSize::Dword),
    ("$t8", OperandSize::Dword),
    ("$t9", OperandSize::Dword),
    ("$k0", OperandSize::Dword),
    ("$k1", OperandSize::Dword),
    ("$gp", OperandSize::Dword),
    ("$sp", OperandSize::Dword),
    ("$fp", OperandSize::Dword),
    ("$ra", OperandSize::Dword),
    // Multiply/divide accumulator halves.
    ("HI", OperandSize::Dword),
    ("LO", OperandSize::Dword),
    ("pc", OperandSize::Dword),
];

const COMBINED: &[CombinedRegister] = &[CombinedRegister {
    name: "HILO",
    high: "HI",
    low: "LO",
    size: OperandSize::Qword,
}];

/// MIPS register names, widths and the HI/LO accumulator pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuPolicyMips;

impl CpuPolicy for CpuPolicyMips {
    fn architecture(&self) -> &'static str {
        "mips"
    }

    fn registers(&self) -> &[(&'static str, OperandSize)] {
        REGISTERS
    }

    fn combined_registers(&self) -> &[CombinedRegister] {
        COMBINED
    }

    fn program_counter(&self) -> Option<&'static str> {
        Some("pc")
    }
}
