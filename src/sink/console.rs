//! Console sink
//!
//! Writes one colorized line per record to standard output. Only the level
//! token is colorized; the rest of the line keeps the uncolored structure
//! shared with the file sink.

use std::io::{self, Write};

use crate::level::Level;
use crate::record::{Record, LEVEL_FIELD_WIDTH};

use super::Sink;

const RESET: &str = "\x1b[0m";

/// ANSI color codes per severity level, indexed by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette([&'static str; Level::ALL.len()]);

impl Palette {
    /// Build a palette from one escape code per level, ordered by rank.
    pub fn new(codes: [&'static str; Level::ALL.len()]) -> Self {
        Palette(codes)
    }

    /// Escape code for the given level.
    pub fn code(&self, level: Level) -> &'static str {
        self.0[level.rank() as usize]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette([
            "\x1b[1;31m", // critical: bold red
            "\x1b[31m",   // error: red
            "\x1b[33m",   // warn: yellow
            "\x1b[32m",   // info: green
            "\x1b[36m",   // debug: cyan
            "\x1b[90m",   // trace: gray
            "\x1b[35m",   // unit: magenta
        ])
    }
}

/// Colorized stdout writer bound to one logger's name.
pub struct ConsoleSink {
    label: String,
    palette: Palette,
    failures: u64,
}

impl ConsoleSink {
    /// Create a console sink with the default palette.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_palette(label, Palette::default())
    }

    /// Create a console sink with a custom level color map.
    pub fn with_palette(label: impl Into<String>, palette: Palette) -> Self {
        Self {
            label: label.into(),
            palette,
            failures: 0,
        }
    }

    /// The logger name this sink was bound to.
    pub fn label(&self) -> &str {
        &self.label
    }

    // Keep in step with Record::render: identical structure, colored token.
    fn render_line(&self, record: &Record) -> String {
        format!(
            "[{}] [{}{:<width$}{}] {}: {}",
            record.timestamp_str(),
            self.palette.code(record.level),
            record.level.as_str(),
            RESET,
            self.label,
            record.message,
            width = LEVEL_FIELD_WIDTH
        )
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, record: &Record) {
        let line = self.render_line(record);
        let mut out = io::stdout().lock();
        if writeln!(out, "{}", line).is_err() {
            self.failures += 1;
        }
    }

    fn failure_count(&self) -> u64 {
        self.failures
    }
}
