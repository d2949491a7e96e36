use std::io;
use std::sync::Arc;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::Compact;
use tracing_subscriber::fmt::format::DefaultFields;
use tracing_subscriber::fmt::format::Format;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::FmtSubscriber;

/// The buffer is cut in half once it grows past this many bytes.
const MAX_LOG_BYTES: usize = 1 << 16;

pub type LogSubscriber = FmtSubscriber<DefaultFields, Format<Compact, ()>, LevelFilter, LogBuffer>;

/// An in-memory sink for log output. The TUI owns the terminal, so instead of writing to stdout,
/// the subscriber writes here and the log panel renders the tail of the buffer.
///
/// Subscribers are built with threading in mind, so the buffer is an `Arc<Mutex>` even though the
/// frontend only ever touches it from one thread.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn subscriber(&self, level: LevelFilter) -> LogSubscriber {
        FmtSubscriber::builder()
            .compact()
            .without_time()
            .with_ansi(false)
            .with_max_level(level)
            .with_writer(self.clone())
            .finish()
    }

    /// Returns up to `count` of the most recent lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let Ok(buffer) = self.0.lock() else {
            return Vec::new();
        };
        let text = String::from_utf8_lossy(&buffer);
        let lines: Vec<&str> = text.lines().collect();
        lines[lines.len().saturating_sub(count)..]
            .iter()
            .map(|line| line.to_string())
            .collect()
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = &'a Self;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}

impl io::Write for &'_ LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log buffer is poisoned"))?;
        buffer.extend_from_slice(buf);
        if buffer.len() > MAX_LOG_BYTES {
            let half = buffer.len() / 2;
            let cut = buffer[half..]
                .iter()
                .position(|b| *b == b'\n')
                .map_or(half, |pos| half + pos + 1);
            buffer.drain(..cut);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tracing::info;
    use tracing::trace;

    use super::*;

    #[test]
    fn test_tail() {
        let log = LogBuffer::default();
        assert!(log.tail(3).is_empty());
        let mut writer = log.make_writer();
        writer.write_all(b"one\ntwo\nthree\nfour\n").unwrap();
        assert_eq!(log.tail(2), vec!["three", "four"]);
        assert_eq!(log.tail(10).len(), 4);
    }

    #[test]
    fn test_bounded() {
        let log = LogBuffer::default();
        let mut writer = log.make_writer();
        for n in 0..10_000 {
            writeln!(writer, "line number {n}").unwrap();
        }
        assert!(log.0.lock().unwrap().len() <= MAX_LOG_BYTES);
        assert_eq!(log.tail(1), vec!["line number 9999"]);
        assert!(log.tail(usize::MAX)[0].starts_with("line number"));
    }

    #[test]
    fn test_subscriber_writes_into_buffer() {
        let log = LogBuffer::default();
        tracing::subscriber::with_default(log.subscriber(LevelFilter::INFO), || {
            info!("visible");
            trace!("hidden");
        });
        let lines = log.tail(10);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("visible"));
    }
}
