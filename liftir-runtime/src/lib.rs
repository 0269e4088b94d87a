//! # liftir runtime
//!
//! Interprets micro-op programs against a simulated CPU state: a register
//! file with per-register definedness tracking and a sparse byte-addressable
//! memory image.
//!
//! All arithmetic is evaluated in `u128` and truncated to each micro-op's
//! declared output size, so widening operations (e.g. a 32x32 -> 64 multiply
//! lifted from MIPS `maddu`) are bit-exact regardless of host word width.
//!
//! ## Example
//!
//! ```rust,no_run
//! use liftir_runtime::{Interpreter, RegisterStatus};
//! use liftir_spec::{CpuPolicy, Endianness, IrProgram, OperandSize};
//!
//! fn run(policy: &dyn CpuPolicy, program: &IrProgram) {
//!     let mut interpreter = Interpreter::new(Endianness::Little, policy);
//!     interpreter.set_register("$v1", 0x7, OperandSize::Dword, RegisterStatus::Defined);
//!     interpreter.interpret(program, 0x100).unwrap();
//!     println!("$v1 = {:?}", interpreter.register_value("$v1"));
//! }
//! ```

pub mod error;
mod eval;
pub mod interpreter;
pub mod memory;
pub mod registers;

pub use error::{Result, RuntimeError};
pub use interpreter::{ExecutionState, Interpreter, InterpreterConfig};
pub use memory::MemoryImage;
pub use registers::{RegisterFile, RegisterStatus};
