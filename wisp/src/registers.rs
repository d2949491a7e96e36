use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Identifies one of the sixteen general registers, `V0` through `VF`. Only the low nibble is
/// meaningful; instruction decoding never produces a larger index.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reg(pub u8);

impl Reg {
    /// `VF` doubles as the flag register for carry, borrow, and sprite collision.
    pub const FLAG: Reg = Reg(0xF);

    pub(crate) const fn index(self) -> usize {
        (self.0 & 0x0F) as usize
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

/// A register that is `BITS` wide. The stored value is kept as written and is only masked down to
/// the register width when read.
///
/// This matters for arithmetic: an instruction can store a sum that exceeds the register width (or
/// a difference that is negative) and the overflow is folded away on the next `get`. Flags are
/// derived from operand magnitudes before the write, never from the stored value.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register<const BITS: u32> {
    raw: i32,
}

impl<const BITS: u32> Register<BITS> {
    const MODULUS: i32 = 1 << BITS;

    pub const fn new() -> Self {
        Self { raw: 0 }
    }

    /// Returns the value reduced modulo `2^BITS`. Negative raw values wrap around, so a raw `-1`
    /// in an 8-bit register reads as `0xFF`.
    pub fn get(&self) -> u16 {
        self.raw.rem_euclid(Self::MODULUS) as u16
    }

    /// Stores the value exactly as given.
    pub fn set(&mut self, raw: i32) {
        self.raw = raw;
    }

    /// The stored value before masking. Only snapshots and debuggers should care about this.
    pub fn raw(&self) -> i32 {
        self.raw
    }
}

/// The sixteen 8-bit general registers plus the 16-bit index register `I`.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterFile {
    v: [Register<8>; 16],
    i: Register<16>,
}

impl RegisterFile {
    /// Constructs a register file with every register set to 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a general register.
    pub fn v(&self, reg: Reg) -> u8 {
        self.v[reg.index()].get() as u8
    }

    /// Writes a general register. The value is stored unmasked.
    pub fn set_v(&mut self, reg: Reg, raw: i32) {
        self.v[reg.index()].set(raw);
    }

    /// Reads the index register.
    pub fn i(&self) -> u16 {
        self.i.get()
    }

    /// Writes the index register. The value is stored unmasked.
    pub fn set_i(&mut self, raw: i32) {
        self.i.set(raw);
    }

    /// Reads the flag register, `VF`.
    pub fn flag(&self) -> u8 {
        self.v(Reg::FLAG)
    }

    pub fn set_flag(&mut self, on: bool) {
        self.set_v(Reg::FLAG, on as i32);
    }

    /// Iterates over the masked values of `V0` through `VF`.
    pub fn general(&self) -> impl '_ + Iterator<Item = u8> {
        self.v.iter().map(|r| r.get() as u8)
    }
}

impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Registers {{")?;
        self.general()
            .enumerate()
            .try_for_each(|(n, val)| write!(f, " V{n:X}=0x{val:0>2X}"))?;
        write!(f, " I=0x{:0>4X} }}", self.i())
    }
}
