//! Log records
//!
//! A record is one timestamped message, stamped with the emitting logger's
//! name as its label. Sinks render records into the shared line structure
//! `[timestamp] [LEVEL  ] label: message`.

use chrono::{DateTime, Local};

use crate::level::Level;

/// Width of the level token field, sized for the longest token (CRITICAL).
pub(crate) const LEVEL_FIELD_WIDTH: usize = 8;

/// Timestamp format: second plus millisecond precision, local timezone.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A single log record
#[derive(Debug, Clone)]
pub struct Record {
    /// When the record was emitted
    pub timestamp: DateTime<Local>,
    /// Severity of the record
    pub level: Level,
    /// Name of the logger that emitted the record
    pub label: String,
    /// Log message
    pub message: String,
}

impl Record {
    /// Create a record stamped with the current local time.
    pub fn new(level: Level, label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            label: label.into(),
            message: message.into(),
        }
    }

    /// Timestamp rendered for the line format.
    pub fn timestamp_str(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Canonical uncolored line structure shared by all sinks.
    pub fn render(&self) -> String {
        format!(
            "[{}] [{:<width$}] {}: {}",
            self.timestamp_str(),
            self.level.as_str(),
            self.label,
            self.message,
            width = LEVEL_FIELD_WIDTH
        )
    }
}
