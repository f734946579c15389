//! Output sinks
//!
//! A sink is a configured writer bound at creation time to one logger's name.
//! Sinks know nothing about the logger hierarchy; they only render and
//! persist or print one record at a time. Writes are fire-and-forget:
//! downstream I/O failures are swallowed and counted, never raised back to
//! the emitting caller.

mod console;
mod file;

pub use console::{ConsoleSink, Palette};
pub use file::{Retention, RotatingFileSink};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::Record;

/// Errors raised while building a sink from configuration.
///
/// These surface at `add_transport` time, never during emission.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("invalid size \"{0}\": expected a byte count with optional k/m/g suffix")]
    InvalidSize(String),

    #[error("invalid retention \"{0}\": expected a file count or a duration like \"14d\"")]
    InvalidRetention(String),

    #[error("failed to open log file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A bound writer for log records.
pub trait Sink: Send {
    /// Write one record.
    ///
    /// Must not fail from the caller's perspective: implementations swallow
    /// downstream errors and account for them in [`Sink::failure_count`].
    fn write(&mut self, record: &Record);

    /// Number of writes dropped or degraded by downstream failures.
    fn failure_count(&self) -> u64;
}

/// Capability that instantiates a sink bound to a logger's name.
///
/// The label is fixed at creation and appears in every line the sink writes,
/// so a sink instance serves exactly one logger. Propagating a transport to a
/// descendant logger means calling this again with the descendant's name.
pub trait SinkFactory {
    fn create_bound_sink(&self, label: &str) -> Result<Box<dyn Sink>, SinkError>;
}

/// Declarative sink configuration.
///
/// This is the serializable form hosts load from their config files:
/// `{ "kind": "console" }` or
/// `{ "kind": "rotating-file", "filename": "logs/run-%DATE%.log",
///    "maxSize": "20m", "maxFiles": "14d" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SinkConfig {
    /// Colorized writer to standard output
    Console,
    /// Uncolored writer to a size-rotated, gzip-archived file
    #[serde(rename_all = "camelCase")]
    RotatingFile {
        /// File name pattern; a `%DATE%` token is replaced with the local date
        filename: String,
        /// Maximum file size before rotation, e.g. "20m"
        max_size: String,
        /// Retention: archive count ("14") or age window ("14d")
        max_files: String,
    },
}

impl SinkFactory for SinkConfig {
    fn create_bound_sink(&self, label: &str) -> Result<Box<dyn Sink>, SinkError> {
        match self {
            SinkConfig::Console => Ok(Box::new(ConsoleSink::new(label))),
            SinkConfig::RotatingFile {
                filename,
                max_size,
                max_files,
            } => Ok(Box::new(RotatingFileSink::new(
                label, filename, max_size, max_files,
            )?)),
        }
    }
}
