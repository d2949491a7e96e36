//! Wisp is the core crate for the banshee project. Contained here is all of the logic for
//! running a small 8-bit virtual machine: a 4K memory space, sixteen general registers plus an
//! index register, a call stack, a 64x32 monochrome screen, and two countdown timers.
//!
//! Like its sibling crates, this crate aims to be platform agnostic and free of any UI specifics.
//! The [`Machine`] does not provide a `run` method. It must be stepped forward by a driver, which
//! also owns ticking the timers, querying input, and rendering the screen whenever a redraw is
//! requested. This allows managing tick rate, processing IO, and more to be done externally.
//!
//! # Notes
//! Instruction words are big endian: the byte at the lower address is the high byte.

mod error;
pub mod font;
pub mod instruction;
pub mod keypad;
pub mod machine;
pub mod mem;
pub mod registers;
pub mod screen;
pub mod snapshot;
pub mod stack;
pub mod timer;

pub use error::VmError;
pub use instruction::Instruction;
pub use keypad::Keypad;
pub use machine::Machine;

/// The address at which program images are loaded and execution begins.
pub const PROGRAM_START: u16 = 0x200;
