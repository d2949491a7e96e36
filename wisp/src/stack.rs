use heapless::Vec as InlineVec;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::VmError;

/// The maximum number of return addresses the stack can hold.
pub const STACK_DEPTH: usize = 16;

/// The return-address stack used by `CALL` and `RET`. Its depth is the length of the inner vec, so
/// it can never exceed `STACK_DEPTH`.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    addrs: InlineVec<u16, STACK_DEPTH>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, addr: u16) -> Result<(), VmError> {
        self.addrs
            .push(addr)
            .map_err(|_| VmError::StackOverflow)?;
        debug!("Pushed 0x{addr:0>4X}, stack depth is now {}", self.depth());
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, VmError> {
        let addr = self.addrs.pop().ok_or(VmError::StackUnderflow)?;
        debug!("Popped 0x{addr:0>4X}, stack depth is now {}", self.depth());
        Ok(addr)
    }

    pub fn depth(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// The stored addresses, bottom of the stack first.
    pub fn as_slice(&self) -> &[u16] {
        &self.addrs
    }
}
