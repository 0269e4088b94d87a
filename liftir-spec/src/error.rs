//! Error types for the IR specification

use crate::instruction::Pc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Duplicate micro-op address: {pc}")]
    DuplicateAddress { pc: Pc },
}
