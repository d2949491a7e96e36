use wisp::Keypad;

/// The keypad as seen by the machine.
///
/// Terminals report presses but (usually) not releases. A press therefore holds the key down for
/// a fixed number of driver iterations, and repeated presses from the terminal's key repeat keep
/// it held. Only one key is held at a time; a new press replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldKey {
    key: Option<u8>,
    frames_left: u32,
    hold_frames: u32,
}

impl HeldKey {
    pub fn new(hold_frames: u32) -> Self {
        Self {
            key: None,
            frames_left: 0,
            hold_frames,
        }
    }

    pub fn press(&mut self, key: u8) {
        self.key = Some(key);
        self.frames_left = self.hold_frames.max(1);
    }

    /// Called once per driver iteration, after the machine has stepped.
    pub fn tick(&mut self) {
        self.frames_left = self.frames_left.saturating_sub(1);
        if self.frames_left == 0 {
            self.key = None;
        }
    }
}

impl Keypad for HeldKey {
    fn pressed_key(&self) -> Option<u8> {
        self.key
    }
}
