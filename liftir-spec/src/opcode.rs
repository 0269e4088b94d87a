//! # Micro-op definitions
//!
//! The vocabulary is deliberately small; everything a native instruction
//! does is expressed as a composition of these. Instruction families:
//! - Arithmetic: ADD, SUB, MUL, DIV, MOD (unsigned, truncated to the out
//!   operand's size)
//! - Logic: AND, OR, XOR
//! - Shift: BSH (signed shift amount, positive = left)
//! - Compare: BISZ (is-zero)
//! - Move: STR (truncating/zero-extending register move)
//! - Control: JCC (conditional transfer to `(target, 0)`)
//! - Memory: LDM, STM
//! - Misc: NOP, UNDEF (mark a register undefined), UNKN (untranslatable
//!   placeholder; executing it is an interpretation failure)
//!
//! There is intentionally no widening multiply-accumulate: that family is
//! lifted as a fixed MUL/ADD/BSH/AND composition, keeping the product at
//! full precision in a temporary until the declared output size truncates
//! it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Micro-op opcode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// out = in1 + in2
    Add,
    /// out = in1 & in2
    And,
    /// out = (in1 == 0) ? 1 : 0
    Bisz,
    /// out = in1 shifted by in2 (in2 signed; positive left, negative right)
    Bsh,
    /// out = in1 / in2 (unsigned; in2 == 0 fails interpretation)
    Div,
    /// if in1 != 0, transfer control to (in3, 0)
    Jcc,
    /// out = memory[in1], out-sized
    Ldm,
    /// out = in1 % in2 (unsigned; in2 == 0 fails interpretation)
    Mod,
    /// out = in1 * in2
    Mul,
    /// no effect
    Nop,
    /// out = in1 | in2
    Or,
    /// memory[in3] = in1, in1-sized
    Stm,
    /// out = in1, truncated or zero-extended to out's size
    Str,
    /// out = in1 - in2
    Sub,
    /// mark the register in in3 as undefined
    Undef,
    /// untranslatable native instruction
    Unkn,
    /// out = in1 ^ in2
    Xor,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "add",
            Opcode::And => "and",
            Opcode::Bisz => "bisz",
            Opcode::Bsh => "bsh",
            Opcode::Div => "div",
            Opcode::Jcc => "jcc",
            Opcode::Ldm => "ldm",
            Opcode::Mod => "mod",
            Opcode::Mul => "mul",
            Opcode::Nop => "nop",
            Opcode::Or => "or",
            Opcode::Stm => "stm",
            Opcode::Str => "str",
            Opcode::Sub => "sub",
            Opcode::Undef => "undef",
            Opcode::Unkn => "unkn",
            Opcode::Xor => "xor",
        }
    }

    /// Binary arithmetic/logic micro-ops (two inputs, one register output).
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::And
                | Opcode::Bsh
                | Opcode::Div
                | Opcode::Mod
                | Opcode::Mul
                | Opcode::Or
                | Opcode::Sub
                | Opcode::Xor
        )
    }

    /// Micro-ops that touch the memory image.
    pub fn is_memory(self) -> bool {
        matches!(self, Opcode::Ldm | Opcode::Stm)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
