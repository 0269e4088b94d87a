//! The interpreter: execution loop and state machine
//!
//! One interpreter owns one register file and one memory image; it is
//! single-threaded and deterministic. Independent exploration of multiple
//! instructions or paths requires independent instances.

use crate::error::{Result, RuntimeError};
use crate::eval::{execute, EvalContext, Flow};
use crate::memory::MemoryImage;
use crate::registers::{RegisterFile, RegisterStatus};
use liftir_spec::{CpuPolicy, Endianness, IrProgram, OperandSize, Pc};
use std::ops::Range;
use tracing::{debug, trace};

/// Interpreter configuration.
///
/// There is deliberately no step or cycle limit here: callers feeding
/// attacker-controlled programs must bound iteration externally.
#[derive(Debug, Clone, Default)]
pub struct InterpreterConfig {
    /// Valid memory range; `None` leaves memory unrestricted.
    pub memory_range: Option<Range<u64>>,
}

/// Execution state, keyed by the (address, sub) program counter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExecutionState {
    Running,
    /// No instruction at the current program counter (normal end).
    Halted,
    /// An interpretation error stopped execution; prior mutations are kept.
    Failed,
}

/// Executes micro-op programs against a register file and memory image.
pub struct Interpreter<'a> {
    policy: &'a dyn CpuPolicy,
    endianness: Endianness,
    registers: RegisterFile,
    memory: MemoryImage,
    state: ExecutionState,
}

impl<'a> Interpreter<'a> {
    pub fn new(endianness: Endianness, policy: &'a dyn CpuPolicy) -> Self {
        Self::with_config(endianness, policy, InterpreterConfig::default())
    }

    pub fn with_config(
        endianness: Endianness,
        policy: &'a dyn CpuPolicy,
        config: InterpreterConfig,
    ) -> Self {
        Interpreter {
            policy,
            endianness,
            registers: RegisterFile::new(),
            memory: MemoryImage::with_range(config.memory_range),
            state: ExecutionState::Halted,
        }
    }

    /// Pre-seed a register before interpretation. The value is truncated to
    /// the declared width. Names are not validated here; recognition is
    /// enforced when micro-ops access them.
    pub fn set_register(
        &mut self,
        name: impl Into<String>,
        value: u128,
        size: OperandSize,
        status: RegisterStatus,
    ) {
        self.registers.set(name, value, size, status);
    }

    /// Current truncated value of a register; `None` while it is undefined.
    pub fn register_value(&self, name: &str) -> Option<u128> {
        self.registers.value(name)
    }

    /// Names of all currently defined registers, temporaries included.
    pub fn defined_registers(&self) -> Vec<String> {
        self.registers.defined_names()
    }

    /// Total bytes ever written to the memory image. Pure register
    /// arithmetic leaves this at 0.
    pub fn memory_size(&self) -> u64 {
        self.memory.size()
    }

    pub fn memory(&self) -> &MemoryImage {
        &self.memory
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// Run `program` from `(entry, 0)` until no instruction exists at the
    /// current program counter (halt) or a micro-op fails.
    ///
    /// On failure the final partial state remains queryable; nothing is
    /// rolled back.
    pub fn interpret(&mut self, program: &IrProgram, entry: u64) -> Result<()> {
        self.state = ExecutionState::Running;
        let mut pc = Pc::entry(entry);

        loop {
            let insn = match program.get(pc) {
                Some(insn) => insn,
                None => {
                    self.state = ExecutionState::Halted;
                    debug!(pc = %pc, "halted: no instruction at program counter");
                    return Ok(());
                }
            };

            trace!(pc = %pc, micro_op = %insn, "step");

            // Keep the architecture's program counter register current; it
            // counts as a defined native register after interpretation.
            if let Some(pc_register) = self.policy.program_counter() {
                let width = self
                    .policy
                    .register_width(pc_register)
                    .unwrap_or(OperandSize::Qword);
                self.registers
                    .set(pc_register, pc.address as u128, width, RegisterStatus::Defined);
            }

            let mut ctx = EvalContext {
                registers: &mut self.registers,
                memory: &mut self.memory,
                policy: self.policy,
                endianness: self.endianness,
            };

            match execute(insn, &mut ctx) {
                Ok(Flow::Next) => match program.next_after(pc) {
                    Some(next) => pc = next,
                    None => {
                        self.state = ExecutionState::Halted;
                        debug!(pc = %pc, "halted: end of program");
                        return Ok(());
                    }
                },
                Ok(Flow::Jump(target)) => pc = target,
                Err(err) => {
                    self.state = ExecutionState::Failed;
                    debug!(pc = %pc, error = %err, "interpretation failed");
                    return Err(err);
                }
            }
        }
    }
}
