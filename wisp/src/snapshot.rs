//! Exporting and importing the full state of a `Machine`.
//!
//! A snapshot is an opaque byte blob. It captures exactly the state that determines how the
//! machine will behave from here on: the general and index registers (unmasked, so pending
//! overflow survives the round trip), the pointer, all of memory, the stack, the screen, and both
//! timers' counts. Timer hooks are not state; they belong to whoever drives the machine and have to
//! be reattached after an import.
//!
//! Metadata such as the program's name or when the snapshot was taken is the concern of the
//! caller.

use serde::Deserialize;
use serde::Serialize;
use tracing::info;

use crate::mem::MemoryBank;
use crate::registers::RegisterFile;
use crate::screen::Screen;
use crate::stack::Stack;
use crate::Machine;
use crate::VmError;

/// Bumped whenever the layout of `Snapshot` changes.
pub const SNAPSHOT_VERSION: u8 = 1;

/// The serialized form of a machine.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u8,
    pub pointer: u16,
    pub registers: RegisterFile,
    pub memory: MemoryBank,
    pub stack: Stack,
    pub screen: Screen,
    pub delay_ticks: u8,
    pub sound_ticks: u8,
}

impl Snapshot {
    /// Captures the current state of the machine.
    pub fn capture(machine: &Machine) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            pointer: machine.pointer,
            registers: machine.registers.clone(),
            memory: machine.memory.clone(),
            stack: machine.stack.clone(),
            screen: machine.screen.clone(),
            delay_ticks: machine.delay.ticks(),
            sound_ticks: machine.sound.ticks(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, VmError> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VmError> {
        let snapshot: Self = postcard::from_bytes(bytes)?;
        match snapshot.version {
            SNAPSHOT_VERSION => Ok(snapshot),
            found => Err(VmError::SnapshotVersion { found }),
        }
    }

    /// Builds a fresh machine in this state. Neither timer has an expiry hook. The machine starts
    /// with a pending redraw so that the restored screen gets rendered.
    pub fn restore(self) -> Machine {
        let mut machine = Machine::from_parts(self.memory);
        machine.pointer = self.pointer;
        machine.registers = self.registers;
        machine.stack = self.stack;
        machine.screen = self.screen;
        machine.delay.set_ticks(self.delay_ticks);
        machine.sound.set_ticks(self.sound_ticks);
        machine.needs_redraw = true;
        machine
    }
}

impl Machine {
    /// Serializes the state of the machine into an opaque blob.
    pub fn export(&self) -> Result<Vec<u8>, VmError> {
        let bytes = Snapshot::capture(self).to_bytes()?;
        info!("Exported a {} byte snapshot", bytes.len());
        Ok(bytes)
    }

    /// Reconstructs a machine from a blob produced by `export`. The sound hook must be attached
    /// again by the caller.
    pub fn import(bytes: &[u8]) -> Result<Self, VmError> {
        let machine = Snapshot::from_bytes(bytes)?.restore();
        info!("Imported a snapshot at 0x{:0>4X}", machine.pointer);
        Ok(machine)
    }
}
