/// The input capability the machine queries while executing key instructions. Implementors report
/// the key currently held down, if any, as a code from `0x0` to `0xF`.
///
/// This is queried synchronously during `Machine::step` and must never block. There is no event
/// queue: only the current state matters.
pub trait Keypad {
    fn pressed_key(&self) -> Option<u8>;
}

/// A fixed key state. Handy for tests and for drivers that track the held key themselves.
impl Keypad for Option<u8> {
    fn pressed_key(&self) -> Option<u8> {
        *self
    }
}

impl<K: Keypad + ?Sized> Keypad for &K {
    fn pressed_key(&self) -> Option<u8> {
        (**self).pressed_key()
    }
}
