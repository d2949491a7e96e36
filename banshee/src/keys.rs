use std::collections::HashMap;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;

/// Everything a key press can ask the frontend to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Quit,
    Save,
    Pause,
    /// Press one of the sixteen keypad keys.
    Pad(u8),
}

impl Keystroke {
    pub fn convert(event: KeyEvent, keymap: &HashMap<char, u8>) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        match event.code {
            KeyCode::Esc => Some(Self::Quit),
            KeyCode::F(4) => Some(Self::Save),
            KeyCode::F(5) => Some(Self::Pause),
            KeyCode::Char(c) => keymap.get(&c.to_ascii_lowercase()).copied().map(Self::Pad),
            _ => None,
        }
    }
}
