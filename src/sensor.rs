//! Fill-level sensor line protocol.
//!
//! The device streams text lines such as `FILL:72.5\r\n`. Anything that does
//! not carry a well-formed reading is skipped; readings are clamped to
//! [0, 100] percent rather than rejected.

use std::io::{self, BufRead};
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

static FILL_READING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)FILL:\s*([0-9]+(?:\.[0-9]+)?)").expect("valid fill reading pattern")
});

/// Extracts the percentage from a `FILL:<number>` line.
///
/// The tag is matched case-insensitively anywhere in the line and may be
/// followed by whitespace. The number is unsigned, with an optional
/// fractional part.
pub fn parse_fill_line(line: &str) -> Option<f64> {
    let line = line.replace('\r', "");
    let captures = FILL_READING.captures(&line)?;
    let percent: f64 = captures.get(1)?.as_str().parse().ok()?;
    Some(percent.clamp(0.0, 100.0))
}

/// Converts a percentage to a fill level in [0, 1].
pub fn percent_to_fill_level(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    (percent / 100.0).clamp(0.0, 1.0)
}

/// Reassembles lines from arbitrarily split text chunks.
#[derive(Debug, Clone, Default)]
pub struct FillLineDecoder {
    buffer: String,
}

impl FillLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and returns the readings of every line it completed.
    pub fn push(&mut self, chunk: &str) -> Vec<f64> {
        self.buffer.push_str(chunk);

        let mut readings = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            match parse_fill_line(line.trim()) {
                Some(percent) => readings.push(percent),
                None => trace!(line = line.trim(), "ignored sensor line"),
            }
        }
        readings
    }

    /// Text received after the last newline.
    pub fn pending(&self) -> &str {
        &self.buffer
    }
}

/// Reads newline-terminated lines until EOF, calling `on_fill` with each
/// reading. A trailing line without a newline is not a complete reading.
///
/// Returns the number of readings delivered.
pub fn read_fill_stream<R, F>(mut reader: R, mut on_fill: F) -> io::Result<usize>
where
    R: BufRead,
    F: FnMut(f64),
{
    let mut delivered = 0;
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 || line.last() != Some(&b'\n') {
            return Ok(delivered);
        }

        let text = String::from_utf8_lossy(&line);
        if let Some(percent) = parse_fill_line(text.trim()) {
            on_fill(percent);
            delivered += 1;
        }
    }
}
