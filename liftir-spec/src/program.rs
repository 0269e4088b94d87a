//! Instruction sequences and programs
//!
//! Translators append into a shared [`IrBlock`] owned by the caller, one
//! native instruction at a time; the block is append-only so a single buffer
//! can accumulate a whole routine's translation. A finished block is frozen
//! into an [`IrProgram`], the `(address, sub)`-keyed map the interpreter
//! executes.

use crate::error::SpecError;
use crate::instruction::{IrInstruction, Pc};
use crate::opcode::Opcode;
use crate::operand::IrOperand;
use std::collections::BTreeMap;

/// Append-only micro-op sequence.
#[derive(Debug, Clone, Default)]
pub struct IrBlock {
    instructions: Vec<IrInstruction>,
}

impl IrBlock {
    pub fn new() -> Self {
        IrBlock::default()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> &[IrInstruction] {
        &self.instructions
    }

    /// Emitter for micro-ops of the native instruction at `address`.
    ///
    /// Sub-addresses continue from any entries already emitted for that
    /// address, starting at 0 otherwise.
    pub fn emitter(&mut self, address: u64) -> Emitter<'_> {
        let next_sub = self
            .instructions
            .iter()
            .filter(|insn| insn.pc().address == address)
            .count() as u16;
        Emitter {
            block: self,
            address,
            next_sub,
        }
    }
}

/// Appends micro-ops for one native instruction, numbering sub-addresses
/// automatically.
#[derive(Debug)]
pub struct Emitter<'a> {
    block: &'a mut IrBlock,
    address: u64,
    next_sub: u16,
}

impl Emitter<'_> {
    fn push(
        &mut self,
        opcode: Opcode,
        op1: Option<IrOperand>,
        op2: Option<IrOperand>,
        op3: Option<IrOperand>,
    ) {
        let pc = Pc::new(self.address, self.next_sub);
        self.next_sub += 1;
        self.block
            .instructions
            .push(IrInstruction::new(pc, opcode, op1, op2, op3));
    }

    pub fn add(&mut self, in1: IrOperand, in2: IrOperand, out: IrOperand) {
        self.push(Opcode::Add, Some(in1), Some(in2), Some(out));
    }

    pub fn sub(&mut self, in1: IrOperand, in2: IrOperand, out: IrOperand) {
        self.push(Opcode::Sub, Some(in1), Some(in2), Some(out));
    }

    pub fn mul(&mut self, in1: IrOperand, in2: IrOperand, out: IrOperand) {
        self.push(Opcode::Mul, Some(in1), Some(in2), Some(out));
    }

    pub fn div(&mut self, in1: IrOperand, in2: IrOperand, out: IrOperand) {
        self.push(Opcode::Div, Some(in1), Some(in2), Some(out));
    }

    /// `mod` is a keyword; the micro-op mnemonic is still `mod`.
    pub fn umod(&mut self, in1: IrOperand, in2: IrOperand, out: IrOperand) {
        self.push(Opcode::Mod, Some(in1), Some(in2), Some(out));
    }

    pub fn and(&mut self, in1: IrOperand, in2: IrOperand, out: IrOperand) {
        self.push(Opcode::And, Some(in1), Some(in2), Some(out));
    }

    pub fn or(&mut self, in1: IrOperand, in2: IrOperand, out: IrOperand) {
        self.push(Opcode::Or, Some(in1), Some(in2), Some(out));
    }

    pub fn xor(&mut self, in1: IrOperand, in2: IrOperand, out: IrOperand) {
        self.push(Opcode::Xor, Some(in1), Some(in2), Some(out));
    }

    pub fn bsh(&mut self, in1: IrOperand, shift: IrOperand, out: IrOperand) {
        self.push(Opcode::Bsh, Some(in1), Some(shift), Some(out));
    }

    pub fn bisz(&mut self, in1: IrOperand, out: IrOperand) {
        self.push(Opcode::Bisz, Some(in1), None, Some(out));
    }

    pub fn str(&mut self, in1: IrOperand, out: IrOperand) {
        self.push(Opcode::Str, Some(in1), None, Some(out));
    }

    pub fn jcc(&mut self, condition: IrOperand, target: IrOperand) {
        self.push(Opcode::Jcc, Some(condition), None, Some(target));
    }

    pub fn ldm(&mut self, address: IrOperand, out: IrOperand) {
        self.push(Opcode::Ldm, Some(address), None, Some(out));
    }

    pub fn stm(&mut self, value: IrOperand, address: IrOperand) {
        self.push(Opcode::Stm, Some(value), None, Some(address));
    }

    pub fn nop(&mut self) {
        self.push(Opcode::Nop, None, None, None);
    }

    pub fn undef(&mut self, register: IrOperand) {
        self.push(Opcode::Undef, None, None, Some(register));
    }

    pub fn unkn(&mut self) {
        self.push(Opcode::Unkn, None, None, None);
    }

    /// Address this emitter numbers micro-ops for.
    pub fn address(&self) -> u64 {
        self.address
    }
}

/// Executable program: micro-ops keyed by their program counter.
#[derive(Debug, Clone, Default)]
pub struct IrProgram {
    instructions: BTreeMap<Pc, IrInstruction>,
}

impl IrProgram {
    /// Freeze a block into a program. Fails if two micro-ops share a
    /// program counter (only possible when mixing blocks by hand).
    pub fn from_block(block: IrBlock) -> Result<Self, SpecError> {
        Self::from_instructions(block.instructions)
    }

    pub fn from_instructions(
        instructions: impl IntoIterator<Item = IrInstruction>,
    ) -> Result<Self, SpecError> {
        let mut map = BTreeMap::new();
        for insn in instructions {
            let pc = insn.pc();
            if map.insert(pc, insn).is_some() {
                return Err(SpecError::DuplicateAddress { pc });
            }
        }
        Ok(IrProgram { instructions: map })
    }

    pub fn get(&self, pc: Pc) -> Option<&IrInstruction> {
        self.instructions.get(&pc)
    }

    /// Successor of `pc` in (address, sub) order, crossing native
    /// instruction boundaries.
    pub fn next_after(&self, pc: Pc) -> Option<Pc> {
        use std::ops::Bound;
        self.instructions
            .range((Bound::Excluded(pc), Bound::Unbounded))
            .next()
            .map(|(&next, _)| next)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IrInstruction> {
        self.instructions.values()
    }
}
