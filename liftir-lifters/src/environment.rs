//! Translation environment
//!
//! Carries the injected CPU policy and issues temporary register names.
//! One environment is shared across a whole routine's translation pass so
//! temporaries stay unique within the shared output block.

use liftir_spec::CpuPolicy;

pub struct TranslationEnvironment<'a> {
    policy: &'a dyn CpuPolicy,
    next_temp: usize,
}

impl<'a> TranslationEnvironment<'a> {
    pub fn new(policy: &'a dyn CpuPolicy) -> Self {
        TranslationEnvironment {
            policy,
            next_temp: 0,
        }
    }

    pub fn policy(&self) -> &'a dyn CpuPolicy {
        self.policy
    }

    /// Fresh temporary register name (`t0`, `t1`, ...).
    pub fn temp(&mut self) -> String {
        let name = format!("t{}", self.next_temp);
        self.next_temp += 1;
        name
    }
}
