//! Decoding of 16-bit instruction words.
//!
//! Every word is cased on its nibbles:
//! - `(n, _, _, _)` picks the instruction group; applies to all words
//! - `(_, _, _, n)` picks the operation within groups `5`, `8`, and `9`
//! - `(_, _, n, n)` picks the operation within groups `0`, `E`, and `F`
//!
//! Nibbles not used for selection carry operands:
//! - `(_, x, _, _)` names the register `Vx` (or the last register of a block transfer)
//! - `(_, _, y, _)` names the register `Vy`
//! - `(_, _, n, n)` is an immediate byte, `kk`
//! - `(_, n, n, n)` is a 12-bit address, `nnn`
//! - `(_, _, _, n)` is a sprite height, `n`
//!
//! Decoding is pure. Operands that refer to registers or timers are kept symbolic and are only
//! read when the instruction is executed.

use crate::registers::Reg;
use crate::VmError;

/// A view of an instruction word that splits out its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Opcode(u16);

impl Opcode {
    fn nibbles(self) -> (u8, u8, u8, u8) {
        (
            ((self.0 & 0xF000) >> 12) as u8,
            ((self.0 & 0x0F00) >> 8) as u8,
            ((self.0 & 0x00F0) >> 4) as u8,
            (self.0 & 0x000F) as u8,
        )
    }

    fn x(self) -> Reg {
        Reg(((self.0 & 0x0F00) >> 8) as u8)
    }

    fn y(self) -> Reg {
        Reg(((self.0 & 0x00F0) >> 4) as u8)
    }

    fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

/// The second operand of a comparison.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
pub enum Operand {
    #[display("0x{_0:0>2X}")]
    Byte(u8),
    #[display("{_0}")]
    Register(Reg),
}

/// Where a `Move` writes to.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
pub enum Dest {
    #[display("{_0}")]
    Register(Reg),
    #[display("I")]
    Index,
}

/// Where a `Move` reads from.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
pub enum Source {
    /// Opcode: 6xkk
    #[display("0x{_0:0>2X}")]
    Byte(u8),
    /// Opcode: 8xy0
    #[display("{_0}")]
    Register(Reg),
    /// Opcode: 7xkk
    /// The sum is stored unmasked and no flag is set.
    #[display("{_0} + 0x{_1:0>2X}")]
    RegisterPlusByte(Reg, u8),
    /// Opcode: Annn
    #[display("0x{_0:0>3X}")]
    Address(u16),
    /// Opcode: Fx07
    #[display("DT")]
    DelayTimer,
    /// Opcode: Fx1E
    #[display("I + {_0}")]
    IndexPlusRegister(Reg),
}

/// The destination of a `Jump`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
pub enum Target {
    /// Opcode: 1nnn
    #[display("0x{_0:0>3X}")]
    Absolute(u16),
    /// Opcode: Bnnn
    /// The jump lands at `nnn + V0`.
    #[display("V0, 0x{_0:0>3X}")]
    OffsetByV0(u16),
}

/// A fully decoded instruction. Formats in the conventional assembler mnemonics.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
pub enum Instruction {
    /// Opcode: 00E0
    #[display("CLS")]
    Clear,
    /// Opcode: 00EE
    #[display("RET")]
    Return,
    /// Opcodes: 1nnn, Bnnn
    #[display("JP {_0}")]
    Jump(Target),
    /// Opcode: 2nnn
    #[display("CALL 0x{_0:0>3X}")]
    Call(u16),
    /// Opcodes: 3xkk, 5xy0
    /// Skips the next instruction if the operands are equal.
    #[display("SE {_0}, {_1}")]
    PassIfEqual(Reg, Operand),
    /// Opcodes: 4xkk, 9xy0
    /// Skips the next instruction if the operands differ.
    #[display("SNE {_0}, {_1}")]
    PassIfNotEqual(Reg, Operand),
    /// Opcodes: 6xkk, 7xkk, 8xy0, Annn, Fx07, Fx1E
    #[display("LD {_0}, {_1}")]
    Move(Dest, Source),
    /// Opcode: 8xy1
    #[display("OR {_0}, {_1}")]
    Or(Reg, Reg),
    /// Opcode: 8xy2
    #[display("AND {_0}, {_1}")]
    And(Reg, Reg),
    /// Opcode: 8xy3
    #[display("XOR {_0}, {_1}")]
    Xor(Reg, Reg),
    /// Opcode: 8xy4
    /// Sets VF on carry.
    #[display("ADD {_0}, {_1}")]
    Add(Reg, Reg),
    /// Opcode: 8xy5
    /// Sets VF when no borrow occurs.
    #[display("SUB {_0}, {_1}")]
    Sub(Reg, Reg),
    /// Opcode: 8xy6
    /// Sets VF to the bit shifted out. `Vy` is decoded but not used.
    #[display("SHR {_0}, {_1}")]
    ShiftRight(Reg, Reg),
    /// Opcode: 8xy7
    /// `Vx = Vy - Vx`. Sets VF when no borrow occurs.
    #[display("SUBN {_0}, {_1}")]
    SubN(Reg, Reg),
    /// Opcode: 8xyE
    /// Sets VF to the bit shifted out. `Vy` is decoded but not used.
    #[display("SHL {_0}, {_1}")]
    ShiftLeft(Reg, Reg),
    /// Opcode: Cxkk
    #[display("RND {_0}, 0x{_1:0>2X}")]
    Random(Reg, u8),
    /// Opcode: Dxyn
    #[display("DRW {_0}, {_1}, {_2}")]
    Draw(Reg, Reg, u8),
    /// Opcode: Ex9E
    #[display("SKP {_0}")]
    CheckPushed(Reg),
    /// Opcode: ExA1
    #[display("SKNP {_0}")]
    CheckNotPushed(Reg),
    /// Opcode: Fx0A
    /// Repeats itself until a key is held, then stores that key in `Vx`.
    #[display("LD {_0}, K")]
    WaitPushing(Reg),
    /// Opcode: Fx15
    #[display("LD DT, {_0}")]
    SetDelayTimer(Reg),
    /// Opcode: Fx18
    #[display("LD ST, {_0}")]
    SetSoundTimer(Reg),
    /// Opcode: Fx29
    /// Points I at the font glyph for the digit in `Vx`.
    #[display("LD F, {_0}")]
    SetSymbolLocation(Reg),
    /// Opcode: Fx33
    /// Writes the three decimal digits of `Vx` to `[I, I+1, I+2]`.
    #[display("LD B, {_0}")]
    StoreDecimalToMemory(Reg),
    /// Opcode: Fx55
    /// Copies `V0..=Vx` into memory starting at I.
    #[display("LD [I], {_0}")]
    StoreRegisters(Reg),
    /// Opcode: Fx65
    /// Copies memory starting at I into `V0..=Vx`.
    #[display("LD {_0}, [I]")]
    LoadRegisters(Reg),
}

impl Instruction {
    /// Decodes an instruction word. Words that do not match any pattern in their group are
    /// rejected.
    pub fn decode(word: u16) -> Result<Self, VmError> {
        let op = Opcode(word);
        let (x, y) = (op.x(), op.y());
        let instr = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Self::Clear,
            (0x0, 0x0, 0xE, 0xE) => Self::Return,
            (0x1, ..) => Self::Jump(Target::Absolute(op.nnn())),
            (0x2, ..) => Self::Call(op.nnn()),
            (0x3, ..) => Self::PassIfEqual(x, Operand::Byte(op.kk())),
            (0x4, ..) => Self::PassIfNotEqual(x, Operand::Byte(op.kk())),
            (0x5, .., 0x0) => Self::PassIfEqual(x, Operand::Register(y)),
            (0x6, ..) => Self::Move(Dest::Register(x), Source::Byte(op.kk())),
            (0x7, ..) => Self::Move(Dest::Register(x), Source::RegisterPlusByte(x, op.kk())),
            (0x8, .., 0x0) => Self::Move(Dest::Register(x), Source::Register(y)),
            (0x8, .., 0x1) => Self::Or(x, y),
            (0x8, .., 0x2) => Self::And(x, y),
            (0x8, .., 0x3) => Self::Xor(x, y),
            (0x8, .., 0x4) => Self::Add(x, y),
            (0x8, .., 0x5) => Self::Sub(x, y),
            (0x8, .., 0x6) => Self::ShiftRight(x, y),
            (0x8, .., 0x7) => Self::SubN(x, y),
            (0x8, .., 0xE) => Self::ShiftLeft(x, y),
            (0x9, .., 0x0) => Self::PassIfNotEqual(x, Operand::Register(y)),
            (0xA, ..) => Self::Move(Dest::Index, Source::Address(op.nnn())),
            (0xB, ..) => Self::Jump(Target::OffsetByV0(op.nnn())),
            (0xC, ..) => Self::Random(x, op.kk()),
            (0xD, ..) => Self::Draw(x, y, op.n()),
            (0xE, _, 0x9, 0xE) => Self::CheckPushed(x),
            (0xE, _, 0xA, 0x1) => Self::CheckNotPushed(x),
            (0xF, _, 0x0, 0x7) => Self::Move(Dest::Register(x), Source::DelayTimer),
            (0xF, _, 0x0, 0xA) => Self::WaitPushing(x),
            (0xF, _, 0x1, 0x5) => Self::SetDelayTimer(x),
            (0xF, _, 0x1, 0x8) => Self::SetSoundTimer(x),
            (0xF, _, 0x1, 0xE) => Self::Move(Dest::Index, Source::IndexPlusRegister(x)),
            (0xF, _, 0x2, 0x9) => Self::SetSymbolLocation(x),
            (0xF, _, 0x3, 0x3) => Self::StoreDecimalToMemory(x),
            (0xF, _, 0x5, 0x5) => Self::StoreRegisters(x),
            (0xF, _, 0x6, 0x5) => Self::LoadRegisters(x),
            _ => return Err(VmError::UnknownOpcode { opcode: word }),
        };
        Ok(instr)
    }
}
