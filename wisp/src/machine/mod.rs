use tracing::info;
use tracing::trace;

use crate::font::FONT_TABLE_LEN;
use crate::font::GLYPH_SIZE;
use crate::instruction::Dest;
use crate::instruction::Instruction;
use crate::instruction::Operand;
use crate::instruction::Source;
use crate::instruction::Target;
use crate::keypad::Keypad;
use crate::mem::MemoryBank;
use crate::registers::Reg;
use crate::registers::RegisterFile;
use crate::screen::Screen;
use crate::stack::Stack;
use crate::timer::Timer;
use crate::VmError;
use crate::PROGRAM_START;


/// This is the core emulation primitive. It owns the entire state of the virtual machine and is
/// agnostic to how it is driven or rendered (if at all). Notably, the `Machine` does not provide a
/// `run` method. It must be stepped forward.
///
/// A driver is expected to repeatedly:
///  - call `step` exactly once, handing over the current input state
///  - check `take_redraw` and, if set, render the `screen`
///  - call `tick_timers` (or tick each timer) exactly once
///
/// Any error returned by `step` is fatal. The machine does not attempt to recover mid-instruction,
/// so the driver should stop stepping and report the error.
#[derive(Debug)]
pub struct Machine {
    /// The address of the next instruction to fetch.
    pub(crate) pointer: u16,
    pub(crate) registers: RegisterFile,
    pub(crate) memory: MemoryBank,
    pub(crate) stack: Stack,
    pub(crate) screen: Screen,
    pub(crate) delay: Timer,
    pub(crate) sound: Timer,
    /// Set whenever the screen changes. Cleared by the consumer via `take_redraw`.
    pub(crate) needs_redraw: bool,
}

impl Machine {
    /// Constructs a machine with the font table loaded at address 0 and the program image loaded
    /// at `PROGRAM_START`, where execution begins.
    ///
    /// The font table must be exactly `FONT_TABLE_LEN` bytes. A program that does not fit in
    /// memory is rejected.
    pub fn new(program: &[u8], font: &[u8]) -> Result<Self, VmError> {
        if font.len() != FONT_TABLE_LEN {
            return Err(VmError::InvalidFontTableLength { len: font.len() });
        }
        let mut memory = MemoryBank::new();
        memory.store_slice(0, font)?;
        memory.store_slice(PROGRAM_START as usize, program)?;
        info!("Loaded a {} byte program", program.len());
        Ok(Self::from_parts(memory))
    }

    pub(crate) fn from_parts(memory: MemoryBank) -> Self {
        Self {
            pointer: PROGRAM_START,
            registers: RegisterFile::new(),
            memory,
            stack: Stack::new(),
            screen: Screen::new(),
            delay: Timer::new(),
            sound: Timer::new(),
            needs_redraw: false,
        }
    }

    /// Attaches the hook that is called whenever the sound timer runs out.
    pub fn with_sound_hook(mut self, hook: impl 'static + FnMut() + Send) -> Self {
        self.set_sound_hook(hook);
        self
    }

    pub fn set_sound_hook(&mut self, hook: impl 'static + FnMut() + Send) {
        self.sound.set_on_expire(hook);
    }

    /// Reads the instruction word at the pointer. The byte at the pointer is the high byte.
    pub fn fetch(&self) -> Result<u16, VmError> {
        let addr = self.pointer as usize;
        let hi = self.memory.load(addr)?;
        let lo = self.memory.load(addr + 1)?;
        Ok(u16::from(hi) << 8 | u16::from(lo))
    }

    /// Decodes the instruction at the pointer without executing it.
    pub fn peek(&self) -> Result<Instruction, VmError> {
        Instruction::decode(self.fetch()?)
    }

    /// Fetches, decodes, and executes a single instruction.
    ///
    /// The pointer is advanced past the instruction *before* it is executed. Jumps and calls
    /// overwrite it freely, skips add a further 2, and `LD Vx, K` rolls it back by 2 while no key
    /// is held so that it runs again on the next step.
    pub fn step<K: Keypad + ?Sized>(&mut self, keypad: &K) -> Result<Instruction, VmError> {
        let word = self.fetch()?;
        let instr = Instruction::decode(word)?;
        trace!("0x{:0>4X}: 0x{word:0>4X} {instr}", self.pointer);
        self.pointer = self.pointer.wrapping_add(2);
        self.execute(instr, keypad)?;
        Ok(instr)
    }

    /// Executes an already decoded instruction against the current state. Assumes the pointer
    /// has already been moved past the instruction.
    pub fn execute<K: Keypad + ?Sized>(
        &mut self,
        instr: Instruction,
        keypad: &K,
    ) -> Result<(), VmError> {
        match instr {
            Instruction::Clear => {
                self.screen.clear();
                self.needs_redraw = true;
            }
            Instruction::Return => self.pointer = self.stack.pop()?,
            Instruction::Jump(Target::Absolute(addr)) => self.pointer = addr,
            Instruction::Jump(Target::OffsetByV0(addr)) => {
                self.pointer = addr + u16::from(self.registers.v(Reg(0)))
            }
            Instruction::Call(addr) => {
                self.stack.push(self.pointer)?;
                self.pointer = addr;
            }
            Instruction::PassIfEqual(x, op) => {
                if self.registers.v(x) == self.operand(op) {
                    self.skip();
                }
            }
            Instruction::PassIfNotEqual(x, op) => {
                if self.registers.v(x) != self.operand(op) {
                    self.skip();
                }
            }
            Instruction::Move(dest, src) => {
                let val = self.source(src);
                match dest {
                    Dest::Register(reg) => self.registers.set_v(reg, val),
                    Dest::Index => self.registers.set_i(val),
                }
            }
            Instruction::Or(x, y) => self.bitwise(x, y, |a, b| a | b),
            Instruction::And(x, y) => self.bitwise(x, y, |a, b| a & b),
            Instruction::Xor(x, y) => self.bitwise(x, y, |a, b| a ^ b),
            Instruction::Add(x, y) => {
                let value = i32::from(self.registers.v(y));
                let carry = i32::from(self.registers.v(x)) + value > 0xFF;
                self.flagged(x, carry, |vx| vx + value);
            }
            Instruction::Sub(x, y) => {
                let value = i32::from(self.registers.v(y));
                let no_borrow = i32::from(self.registers.v(x)) > value;
                self.flagged(x, no_borrow, |vx| vx - value);
            }
            Instruction::SubN(x, y) => {
                let value = i32::from(self.registers.v(y));
                let no_borrow = value > i32::from(self.registers.v(x));
                self.flagged(x, no_borrow, |vx| value - vx);
            }
            Instruction::ShiftRight(x, _) => {
                let dropped = self.registers.v(x) & 0x01 == 0x01;
                self.flagged(x, dropped, |vx| vx >> 1);
            }
            Instruction::ShiftLeft(x, _) => {
                let dropped = self.registers.v(x) & 0x80 == 0x80;
                self.flagged(x, dropped, |vx| vx << 1);
            }
            Instruction::Random(x, mask) => {
                let byte: u8 = rand::random();
                self.registers.set_v(x, i32::from(byte & mask));
            }
            Instruction::Draw(x, y, rows) => self.draw(x, y, rows)?,
            Instruction::CheckPushed(x) => {
                if keypad.pressed_key() == Some(self.registers.v(x)) {
                    self.skip();
                }
            }
            Instruction::CheckNotPushed(x) => {
                if keypad.pressed_key() != Some(self.registers.v(x)) {
                    self.skip();
                }
            }
            Instruction::WaitPushing(x) => match keypad.pressed_key() {
                Some(key) => self.registers.set_v(x, i32::from(key)),
                None => self.pointer = self.pointer.wrapping_sub(2),
            },
            Instruction::SetDelayTimer(x) => self.delay.set_ticks(self.registers.v(x)),
            Instruction::SetSoundTimer(x) => self.sound.set_ticks(self.registers.v(x)),
            Instruction::SetSymbolLocation(x) => {
                let glyph = i32::from(self.registers.v(x)) * GLYPH_SIZE as i32;
                self.registers.set_i(glyph);
            }
            Instruction::StoreDecimalToMemory(x) => {
                let val = self.registers.v(x);
                let base = self.registers.i() as usize;
                for (offset, digit) in [val / 100, val / 10 % 10, val % 10].into_iter().enumerate()
                {
                    self.memory.store(base + offset, digit)?;
                }
            }
            Instruction::StoreRegisters(x) => {
                let base = self.registers.i() as usize;
                for n in 0..=x.0 {
                    self.memory.store(base + n as usize, self.registers.v(Reg(n)))?;
                }
            }
            Instruction::LoadRegisters(x) => {
                let base = self.registers.i() as usize;
                for n in 0..=x.0 {
                    let byte = self.memory.load(base + n as usize)?;
                    self.registers.set_v(Reg(n), i32::from(byte));
                }
            }
        }
        Ok(())
    }

    /// Ticks the delay timer and then the sound timer, once each.
    pub fn tick_timers(&mut self) {
        self.delay.tick();
        self.sound.tick();
    }

    /// Returns whether the screen has changed since the last call, clearing the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn pointer(&self) -> u16 {
        self.pointer
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn memory(&self) -> &MemoryBank {
        &self.memory
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn delay_timer(&self) -> &Timer {
        &self.delay
    }

    pub fn delay_timer_mut(&mut self) -> &mut Timer {
        &mut self.delay
    }

    pub fn sound_timer(&self) -> &Timer {
        &self.sound
    }

    pub fn sound_timer_mut(&mut self) -> &mut Timer {
        &mut self.sound
    }

    fn skip(&mut self) {
        self.pointer = self.pointer.wrapping_add(2);
    }

    fn operand(&self, op: Operand) -> u8 {
        match op {
            Operand::Byte(byte) => byte,
            Operand::Register(reg) => self.registers.v(reg),
        }
    }

    fn source(&self, src: Source) -> i32 {
        match src {
            Source::Byte(byte) => i32::from(byte),
            Source::Register(reg) => i32::from(self.registers.v(reg)),
            Source::RegisterPlusByte(reg, byte) => {
                i32::from(self.registers.v(reg)) + i32::from(byte)
            }
            Source::Address(addr) => i32::from(addr),
            Source::DelayTimer => i32::from(self.delay.ticks()),
            Source::IndexPlusRegister(reg) => {
                i32::from(self.registers.i()) + i32::from(self.registers.v(reg))
            }
        }
    }

    fn bitwise(&mut self, x: Reg, y: Reg, op: impl FnOnce(u8, u8) -> u8) {
        let val = op(self.registers.v(x), self.registers.v(y));
        self.registers.set_v(x, i32::from(val));
    }

    /// Writes the flag register and then updates `Vx` from its current value. `Vx` is read after
    /// the flag is written, so when `x` is `VF` the update sees the new flag.
    fn flagged(&mut self, x: Reg, flag: bool, op: impl FnOnce(i32) -> i32) {
        self.registers.set_flag(flag);
        let vx = i32::from(self.registers.v(x));
        self.registers.set_v(x, op(vx));
    }

    /// XORs an `rows`-tall sprite read from memory at I onto the screen at `(Vx, Vy)`. VF is set if
    /// any lit pixel was turned off.
    fn draw(&mut self, x: Reg, y: Reg, rows: u8) -> Result<(), VmError> {
        let (x, y) = (
            i32::from(self.registers.v(x)),
            i32::from(self.registers.v(y)),
        );
        let base = self.registers.i() as usize;
        self.needs_redraw = true;
        self.registers.set_flag(false);
        let mut collision = false;
        for row in 0..rows {
            let byte = self.memory.load(base + row as usize)?;
            for col in 0..8 {
                let (px, py) = (x + col, y + i32::from(row));
                let incoming = byte & (0x80 >> col) != 0;
                let current = self.screen.get_pixel(px, py);
                collision |= incoming && current;
                self.screen.set_pixel(px, py, incoming ^ current);
            }
        }
        self.registers.set_flag(collision);
        Ok(())
    }
}
