//! Save files.
//!
//! A save file holds the name of the program it was made from on the first line, followed
//! directly by the machine's snapshot bytes. Saves are written to the save directory as
//! `<program>#<timestamp>` so that repeated saves of the same program sort by time.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::info;

const TIMESTAMP: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFile {
    pub name: String,
    pub blob: Vec<u8>,
}

impl SaveFile {
    pub fn new(name: impl Into<String>, blob: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            blob,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.name.len() + 1 + self.blob.len());
        bytes.extend_from_slice(self.name.as_bytes());
        bytes.push(b'\n');
        bytes.extend_from_slice(&self.blob);
        bytes
    }

    /// Splits the name line off of the snapshot. Only the first newline is significant; the
    /// snapshot itself may contain any bytes.
    pub fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        let split = bytes
            .iter()
            .position(|b| *b == b'\n')
            .ok_or_else(|| invalid("save file is missing its name line"))?;
        let name = std::str::from_utf8(&bytes[..split])
            .map_err(|_| invalid("save file name is not valid UTF-8"))?;
        Ok(Self::new(name, bytes[split + 1..].to_vec()))
    }

    /// The file name this save is stored under when taken at the given time.
    pub fn file_name(&self, at: OffsetDateTime) -> io::Result<String> {
        let stamp = at.format(TIMESTAMP).map_err(io::Error::other)?;
        Ok(format!("{}#{stamp}", self.name))
    }

    /// Writes the save into `dir`, creating it if needed, and returns the path of the new file.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name(now)?);
        std::fs::write(&path, self.to_bytes())?;
        info!("Saved to {path:?}");
        Ok(path)
    }

    pub fn read_from(path: &Path) -> io::Result<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }
}

fn invalid(msg: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}
