//! Runtime error types
//!
//! Every interpretation failure carries the program counter it occurred at;
//! the interpreter stops immediately and does not roll back prior mutations.

use liftir_spec::{Opcode, Pc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Read of undefined register {name} at {pc} ({opcode})")]
    UndefinedRegister {
        name: String,
        pc: Pc,
        opcode: Opcode,
    },

    #[error("Unknown register {name} at {pc} ({opcode})")]
    UnknownRegister {
        name: String,
        pc: Pc,
        opcode: Opcode,
    },

    #[error("Memory access out of range: address {address:#x} at {pc} ({opcode})")]
    MemoryOutOfRange {
        address: u64,
        pc: Pc,
        opcode: Opcode,
    },

    #[error("Division by zero at {pc} ({opcode})")]
    DivisionByZero { pc: Pc, opcode: Opcode },

    #[error("Untranslatable instruction reached at {pc}")]
    Untranslatable { pc: Pc },

    #[error("Malformed micro-op at {pc} ({opcode}): {reason}")]
    MalformedInstruction {
        pc: Pc,
        opcode: Opcode,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
