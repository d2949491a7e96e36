//! The frontend's settings. Everything is optional; a missing file or key falls back to the
//! defaults below.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use tracing::level_filters::LevelFilter;

/// The fastest speed setting. At this speed the driver does not sleep between steps.
pub const MAX_SPEED: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// From 0 (slowest) to 100 (fastest).
    pub speed: u8,
    /// Where save files are written.
    pub save_dir: PathBuf,
    /// Terminals only report presses, so a pressed key is kept down for this many steps.
    pub key_hold_frames: u32,
    pub log_level: String,
    /// Maps a keyboard character to one of the sixteen keypad keys.
    pub keymap: HashMap<String, u8>,
}

impl Config {
    /// Reads the config at the given path. A file that does not exist is not an error; a file
    /// that cannot be parsed is.
    pub fn read(path: &Path) -> io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(data) => Self::parse(&data),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err),
        }
    }

    pub fn parse(data: &str) -> io::Result<Self> {
        toml::from_str(data).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    /// How long the driver waits after each step.
    pub fn interval(&self) -> Duration {
        let speed = u64::from(self.speed.min(MAX_SPEED));
        Duration::from_micros(10_000 - speed * 100)
    }

    pub fn level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::INFO)
    }

    /// The usable part of the keymap. Entries that are not a single character or that name a key
    /// outside of the keypad are dropped. Letters are matched case-insensitively.
    pub fn keys(&self) -> HashMap<char, u8> {
        self.keymap
            .iter()
            .filter(|(_, key)| **key < 16)
            .filter_map(|(c, key)| {
                let mut chars = c.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some((c.to_ascii_lowercase(), *key)),
                    _ => None,
                }
            })
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        let keymap = "0123qwerasdfzxcv"
            .chars()
            .zip(0..)
            .map(|(c, key)| (c.to_string(), key))
            .collect();
        Self {
            speed: 85,
            save_dir: PathBuf::from("saves"),
            key_hold_frames: 8,
            log_level: String::from("info"),
            keymap,
        }
    }
}
