use std::fmt;

use tracing::debug;

/// The callback a `Timer` runs when it counts down to zero. Boxed so that a frontend can hand in
/// any closure (e.g. one that flags a beep to be played).
pub type ExpiryHook = Box<dyn FnMut() + Send>;

/// A countdown timer. A driver ticks it once per iteration; while the count is above zero each
/// tick decrements it, and the tick that brings the count from 1 to 0 fires the expiry hook.
///
/// The machine owns two of these: the delay timer, which programs read back, and the sound timer,
/// whose hook is how the frontend learns to make a sound.
#[derive(Default)]
pub struct Timer {
    ticks: u8,
    on_expire: Option<ExpiryHook>,
}

impl Timer {
    /// Constructs a stopped timer with no expiry hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a timer that is already counting down.
    pub fn with_ticks(ticks: u8) -> Self {
        Self {
            ticks,
            on_expire: None,
        }
    }

    pub fn ticks(&self) -> u8 {
        self.ticks
    }

    pub fn set_ticks(&mut self, ticks: u8) {
        self.ticks = ticks;
    }

    /// Replaces the expiry hook.
    pub fn set_on_expire(&mut self, hook: impl 'static + FnMut() + Send) {
        self.on_expire = Some(Box::new(hook));
    }

    /// Removes and returns the expiry hook, if one was set.
    pub fn take_on_expire(&mut self) -> Option<ExpiryHook> {
        self.on_expire.take()
    }

    /// Counts down by one. Ticking a stopped timer does nothing, so the hook fires exactly once per
    /// countdown.
    pub fn tick(&mut self) {
        if self.ticks == 0 {
            return;
        }
        self.ticks -= 1;
        if self.ticks == 0 {
            debug!("Timer expired");
            if let Some(hook) = self.on_expire.as_mut() {
                hook()
            }
        }
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("ticks", &self.ticks)
            .field("on_expire", &self.on_expire.is_some())
            .finish()
    }
}
