//! # liftir specification
//!
//! Architecture-neutral micro-op instruction set for binary analysis.
//!
//! Native machine instructions are lifted into short sequences of micro-ops,
//! each addressed by `(address, sub)` where `address` is the native
//! instruction's address and `sub` is the ordinal of the micro-op within
//! that instruction's translation. The pair is the globally unique, totally
//! ordered program counter.
//!
//! ## Key features
//! - 17 micro-ops (arithmetic, logic, shift, compare-to-zero, move,
//!   conditional jump, load/store, undefine)
//! - Operand sizes of 1, 2, 4, 8 and 16 bytes
//! - Three operand positions per instruction (in1, in2, out), REIL style
//! - Append-only sequence builder for sharing one buffer across a whole
//!   routine's translation pass
//! - Per-architecture CPU policy trait with combined-register definitions
//!   (e.g. the MIPS HI/LO accumulator pair)

pub mod cpu;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod operand;
pub mod program;

pub use cpu::{is_temporary, CombinedRegister, CpuPolicy, Endianness};
pub use error::SpecError;
pub use instruction::{IrInstruction, Pc};
pub use opcode::Opcode;
pub use operand::{IrOperand, IrValue, OperandSize};
pub use program::{Emitter, IrBlock, IrProgram};
