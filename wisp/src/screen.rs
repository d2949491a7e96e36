use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Width of the screen in pixels.
pub const SCREEN_WIDTH: usize = 64;
/// Height of the screen in pixels.
pub const SCREEN_HEIGHT: usize = 32;

/// The 64x32 monochrome pixel grid that sprites are XOR-ed onto.
///
/// Each row is packed into a `u64` with the leftmost pixel in the most significant bit. Every
/// coordinate is wrapped into the grid before use, so negative or oversized coordinates always
/// land on a valid pixel.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    rows: [u64; SCREEN_HEIGHT],
}

impl Screen {
    /// Constructs a screen with every pixel off.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        let (col, row) = Self::wrap(x, y);
        self.rows[row] & Self::mask(col) != 0
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let (col, row) = Self::wrap(x, y);
        if on {
            self.rows[row] |= Self::mask(col);
        } else {
            self.rows[row] &= !Self::mask(col);
        }
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.rows = [0; SCREEN_HEIGHT];
    }

    /// The packed rows of the screen, top row first.
    pub fn rows(&self) -> &[u64; SCREEN_HEIGHT] {
        &self.rows
    }

    /// Iterates over the coordinates of every lit pixel, row by row.
    pub fn lit_pixels(&self) -> impl '_ + Iterator<Item = (usize, usize)> {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            (0..SCREEN_WIDTH)
                .filter(move |x| row & Self::mask(*x) != 0)
                .map(move |x| (x, y))
        })
    }

    fn wrap(x: i32, y: i32) -> (usize, usize) {
        (
            x.rem_euclid(SCREEN_WIDTH as i32) as usize,
            y.rem_euclid(SCREEN_HEIGHT as i32) as usize,
        )
    }

    const fn mask(col: usize) -> u64 {
        0x1 << (SCREEN_WIDTH - 1 - col)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.rows.iter().try_for_each(|row| {
            (0..SCREEN_WIDTH).try_for_each(|x| {
                let c = if row & Self::mask(x) != 0 { '#' } else { '.' };
                write!(f, "{c}")
            })?;
            writeln!(f)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_clear() {
        let screen = Screen::new();
        assert_eq!(screen.lit_pixels().count(), 0);
        assert!(!screen.get_pixel(10, 10));
    }

    #[test]
    fn test_set_and_clear() {
        let mut screen = Screen::new();
        screen.set_pixel(0, 0, true);
        screen.set_pixel(63, 31, true);
        assert!(screen.get_pixel(0, 0));
        assert!(screen.get_pixel(63, 31));
        assert_eq!(screen.rows()[0], 0x8000_0000_0000_0000);
        assert_eq!(screen.rows()[31], 0x1);
        screen.set_pixel(0, 0, false);
        assert!(!screen.get_pixel(0, 0));
        screen.clear();
        assert_eq!(screen.lit_pixels().count(), 0);
    }

    #[test]
    fn test_coordinates_wrap() {
        let mut screen = Screen::new();
        screen.set_pixel(3, 5, true);
        for k in -3..=3 {
            for m in -3..=3 {
                assert!(screen.get_pixel(3 + 64 * k, 5 + 32 * m), "k={k} m={m}");
            }
        }
        screen.set_pixel(-1, -1, true);
        assert!(screen.get_pixel(63, 31));
        assert_eq!(
            screen.lit_pixels().collect::<Vec<_>>(),
            vec![(3, 5), (63, 31)]
        );
    }

    #[test]
    fn test_display() {
        let mut screen = Screen::new();
        screen.set_pixel(1, 0, true);
        let text = screen.to_string();
        assert_eq!(text.lines().count(), SCREEN_HEIGHT);
        assert!(text.starts_with(".#.."));
    }
}
