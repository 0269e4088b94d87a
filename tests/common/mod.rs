//! Shared helpers for the conformance tests
//!
//! Each test lifts one native instruction, interprets the result against a
//! seeded register file, and inspects the final machine state.

use liftir_lifters::{Lifter, NativeInstruction, OperandTree, TranslationEnvironment};
use liftir_runtime::{Interpreter, RegisterStatus};
use liftir_spec::{CpuPolicy, Endianness, IrProgram, OperandSize};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Route per-step interpreter traces through the test writer; enable with
/// `RUST_LOG=liftir_runtime=trace`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Lift `insn` and run it with the given pre-seeded dword registers.
pub fn interpret_one<'a>(
    lifter: &'a dyn Lifter,
    insn: &NativeInstruction,
    seeds: &[(&str, u128)],
) -> Interpreter<'a> {
    init_tracing();
    let mut env = TranslationEnvironment::new(lifter.policy());
    let mut block = liftir_spec::IrBlock::new();
    lifter
        .translate(&mut env, insn, &mut block)
        .expect("translation failed");
    let program = IrProgram::from_block(block).expect("duplicate program counter");

    let mut interpreter = Interpreter::new(Endianness::Little, lifter.policy());
    for &(name, value) in seeds {
        interpreter.set_register(name, value, OperandSize::Dword, RegisterStatus::Defined);
    }
    interpreter
        .interpret(&program, insn.address())
        .expect("interpretation failed");
    interpreter
}

/// Defined registers the architecture actually declares; temporaries left
/// behind by the lifted sequence are filtered out.
pub fn defined_native_registers(
    interpreter: &Interpreter<'_>,
    policy: &dyn CpuPolicy,
) -> Vec<String> {
    interpreter
        .defined_registers()
        .into_iter()
        .filter(|name| policy.is_register(name))
        .collect()
}

pub fn dword_register(name: &str) -> OperandTree {
    OperandTree::register(OperandSize::Dword, name)
}
