//! Register file with definedness tracking
//!
//! Each register carries an explicit status so an uninitialized read is an
//! observable state, never a silent zero.

use liftir_spec::OperandSize;
use std::collections::HashMap;

/// Whether a register holds a known value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegisterStatus {
    Defined,
    Undefined,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Slot {
    value: u128,
    size: OperandSize,
    status: RegisterStatus,
}

/// Mapping from register name to value and status. Owned by one interpreter
/// instance and mutated only by executing micro-ops (or pre-seeding).
#[derive(Debug, Clone, Default)]
pub struct RegisterFile {
    slots: HashMap<String, Slot>,
}

impl RegisterFile {
    pub fn new() -> Self {
        RegisterFile::default()
    }

    /// Set a register, truncating the value to the declared width.
    pub fn set(&mut self, name: impl Into<String>, value: u128, size: OperandSize, status: RegisterStatus) {
        self.slots.insert(
            name.into(),
            Slot {
                value: value & size.mask(),
                size,
                status,
            },
        );
    }

    /// Mark a register undefined, discarding its value.
    pub fn undefine(&mut self, name: impl Into<String>, size: OperandSize) {
        self.slots.insert(
            name.into(),
            Slot {
                value: 0,
                size,
                status: RegisterStatus::Undefined,
            },
        );
    }

    /// Status of a register; `None` if it has never been touched (which
    /// reads the same as `Undefined`).
    pub fn status(&self, name: &str) -> Option<RegisterStatus> {
        self.slots.get(name).map(|slot| slot.status)
    }

    /// Current value if the register is defined.
    pub fn value(&self, name: &str) -> Option<u128> {
        self.slots.get(name).and_then(|slot| match slot.status {
            RegisterStatus::Defined => Some(slot.value),
            RegisterStatus::Undefined => None,
        })
    }

    /// Declared width of a register slot, if set.
    pub fn width(&self, name: &str) -> Option<OperandSize> {
        self.slots.get(name).map(|slot| slot.size)
    }

    /// Names of all currently defined registers, sorted.
    pub fn defined_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.status == RegisterStatus::Defined)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}
