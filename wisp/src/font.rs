//! The sprite table for the sixteen hexadecimal digits. Programs locate a digit's glyph with the
//! `LD F, Vx` instruction, which points the index register at `digit * GLYPH_SIZE`.

/// The number of bytes (rows) in a single glyph.
pub const GLYPH_SIZE: usize = 5;

/// A font table must hold exactly this many bytes: sixteen glyphs of five rows each.
pub const FONT_TABLE_LEN: usize = 16 * GLYPH_SIZE;

/// The conventional font shipped with most interpreters. Frontends may supply their own table to
/// `Machine::new` as long as it is `FONT_TABLE_LEN` bytes long.
#[rustfmt::skip]
pub const STANDARD_FONT: [u8; FONT_TABLE_LEN] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
