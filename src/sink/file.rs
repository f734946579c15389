//! Rotating-file sink
//!
//! Uncolored file writer with dated file names, size-based rotation into
//! gzip archives, and a retention policy over the archives. Rotation and
//! retention failures are swallowed and counted; the triggering record is
//! still written.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::Local;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::record::{Record, LEVEL_FIELD_WIDTH};

use super::{Sink, SinkError};

/// Token in the file name pattern replaced with the current local date.
const DATE_TOKEN: &str = "%DATE%";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Retention policy for rotated archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Keep at most this many archives, newest first
    MaxFiles(usize),
    /// Delete archives older than this window
    MaxAge(Duration),
}

/// Parse a human size string: bare bytes or a k/m/g suffix (base 1024).
pub fn parse_size(s: &str) -> Result<u64, SinkError> {
    let t = s.trim().to_ascii_lowercase();
    let (digits, mult): (&str, u64) = if let Some(d) = t.strip_suffix('k') {
        (d, 1024)
    } else if let Some(d) = t.strip_suffix('m') {
        (d, 1024 * 1024)
    } else if let Some(d) = t.strip_suffix('g') {
        (d, 1024 * 1024 * 1024)
    } else {
        (t.as_str(), 1)
    };
    digits
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(mult))
        .filter(|n| *n > 0)
        .ok_or_else(|| SinkError::InvalidSize(s.to_string()))
}

/// Parse a retention string: an archive count ("14") or an age window with a
/// d/h/m suffix ("14d").
pub fn parse_retention(s: &str) -> Result<Retention, SinkError> {
    let t = s.trim().to_ascii_lowercase();
    if let Ok(count) = t.parse::<usize>() {
        if count == 0 {
            return Err(SinkError::InvalidRetention(s.to_string()));
        }
        return Ok(Retention::MaxFiles(count));
    }
    let (digits, unit_secs): (&str, u64) = if let Some(d) = t.strip_suffix('d') {
        (d, 24 * 60 * 60)
    } else if let Some(d) = t.strip_suffix('h') {
        (d, 60 * 60)
    } else if let Some(d) = t.strip_suffix('m') {
        (d, 60)
    } else {
        return Err(SinkError::InvalidRetention(s.to_string()));
    };
    digits
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .map(|n| Retention::MaxAge(Duration::from_secs(n * unit_secs)))
        .ok_or_else(|| SinkError::InvalidRetention(s.to_string()))
}

/// Size-rotated file writer bound to one logger's name.
///
/// The file name comes from the configured pattern with `%DATE%` substituted
/// with the current local date; a date change between writes rolls to the new
/// day's file. When the live file would exceed the size limit it is
/// compressed into a numbered `.gz` archive and started fresh, then the
/// retention policy prunes old archives.
pub struct RotatingFileSink {
    label: String,
    pattern: String,
    max_size: u64,
    retention: Retention,
    current_date: String,
    path: PathBuf,
    file: File,
    written: u64,
    failures: u64,
}

impl RotatingFileSink {
    /// Build a sink, parsing the size and retention strings eagerly so bad
    /// configuration fails at attach time rather than at first write.
    pub fn new(
        label: impl Into<String>,
        pattern: &str,
        max_size: &str,
        max_files: &str,
    ) -> Result<Self, SinkError> {
        let max_size = parse_size(max_size)?;
        let retention = parse_retention(max_files)?;
        let current_date = Local::now().format(DATE_FORMAT).to_string();
        let path = PathBuf::from(pattern.replace(DATE_TOKEN, &current_date));
        let file = open_log_file(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            label: label.into(),
            pattern: pattern.to_string(),
            max_size,
            retention,
            current_date,
            path,
            file,
            written,
            failures: 0,
        })
    }

    /// The logger name this sink was bound to.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Path of the live (unrotated) log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // Keep in step with Record::render: identical structure, bound label.
    fn render_line(&self, record: &Record) -> String {
        format!(
            "[{}] [{:<width$}] {}: {}",
            record.timestamp_str(),
            record.level.as_str(),
            self.label,
            record.message,
            width = LEVEL_FIELD_WIDTH
        )
    }

    /// Switch to the new day's file when the date token resolves differently.
    fn roll_date(&mut self, today: &str) -> Result<(), SinkError> {
        let path = PathBuf::from(self.pattern.replace(DATE_TOKEN, today));
        if path != self.path {
            let file = open_log_file(&path)?;
            self.written = file.metadata().map(|m| m.len()).unwrap_or(0);
            self.file = file;
            self.path = path;
        }
        self.current_date = today.to_string();
        Ok(())
    }

    /// Compress the live file into the next free `.gz` archive and reopen it
    /// empty.
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let archive = self.next_archive_path();
        let mut src = File::open(&self.path)?;
        let mut encoder = GzEncoder::new(File::create(&archive)?, Compression::default());
        io::copy(&mut src, &mut encoder)?;
        encoder.finish()?;
        self.file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }

    fn next_archive_path(&self) -> PathBuf {
        let mut index = 1;
        loop {
            let candidate = PathBuf::from(format!("{}.{}.gz", self.path.display(), index));
            if !candidate.exists() {
                return candidate;
            }
            index += 1;
        }
    }

    /// Prune archives beyond the retention policy. Returns the number of
    /// files deleted.
    fn apply_retention(&self) -> io::Result<usize> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = archive_prefix(&self.pattern);

        let mut archives = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if !name.starts_with(&prefix) || !name.ends_with(".gz") {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            archives.push((modified, path));
        }

        let mut deleted = 0;
        match self.retention {
            Retention::MaxFiles(keep) => {
                archives.sort_by(|a, b| b.0.cmp(&a.0));
                for (_, path) in archives.into_iter().skip(keep) {
                    if fs::remove_file(&path).is_ok() {
                        deleted += 1;
                    }
                }
            }
            Retention::MaxAge(window) => {
                let cutoff = SystemTime::now()
                    .checked_sub(window)
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                for (modified, path) in archives {
                    if modified < cutoff && fs::remove_file(&path).is_ok() {
                        deleted += 1;
                    }
                }
            }
        }
        Ok(deleted)
    }
}

impl Sink for RotatingFileSink {
    fn write(&mut self, record: &Record) {
        let today = Local::now().format(DATE_FORMAT).to_string();
        if today != self.current_date && self.roll_date(&today).is_err() {
            self.failures += 1;
        }

        let line = self.render_line(record);
        let needed = line.len() as u64 + 1;
        if self.written > 0 && self.written + needed > self.max_size {
            match self.rotate() {
                Ok(()) => {
                    if self.apply_retention().is_err() {
                        self.failures += 1;
                    }
                }
                Err(_) => self.failures += 1,
            }
        }

        match writeln!(self.file, "{}", line) {
            Ok(()) => {
                self.written += needed;
                let _ = self.file.flush();
            }
            Err(_) => self.failures += 1,
        }
    }

    fn failure_count(&self) -> u64 {
        self.failures
    }
}

fn open_log_file(path: &Path) -> Result<File, SinkError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| SinkError::Open {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SinkError::Open {
            path: path.to_path_buf(),
            source: e,
        })
}

/// File name portion of the pattern up to the date token; archive names all
/// share this prefix.
fn archive_prefix(pattern: &str) -> String {
    let name = Path::new(pattern)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(pattern);
    match name.find(DATE_TOKEN) {
        Some(idx) => name[..idx].to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use tempfile::TempDir;

    fn archive_count(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "gz").unwrap_or(false))
            .count()
    }

    #[test]
    fn test_parse_size_accepts_suffixes() {
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(parse_size("500k").unwrap(), 500 * 1024);
        assert_eq!(parse_size("20m").unwrap(), 20 * 1024 * 1024);
        assert_eq!(parse_size("1G").unwrap(), 1024 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        assert!(parse_size("").is_err());
        assert!(parse_size("twenty").is_err());
        assert!(parse_size("-5m").is_err());
        assert!(parse_size("0").is_err());
    }

    #[test]
    fn test_parse_retention_count_and_age() {
        assert_eq!(parse_retention("14").unwrap(), Retention::MaxFiles(14));
        assert_eq!(
            parse_retention("14d").unwrap(),
            Retention::MaxAge(Duration::from_secs(14 * 24 * 60 * 60))
        );
        assert_eq!(
            parse_retention("12h").unwrap(),
            Retention::MaxAge(Duration::from_secs(12 * 60 * 60))
        );
    }

    #[test]
    fn test_parse_retention_rejects_garbage() {
        assert!(parse_retention("0").is_err());
        assert!(parse_retention("14w").is_err());
        assert!(parse_retention("").is_err());
    }

    #[test]
    fn test_write_substitutes_date_and_labels_line() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/runtime-%DATE%.log", dir.path().display());
        let mut sink = RotatingFileSink::new("api", &pattern, "20m", "14d").unwrap();

        sink.write(&Record::new(Level::Info, "api", "server up"));

        let today = Local::now().format(DATE_FORMAT).to_string();
        let expected = dir.path().join(format!("runtime-{}.log", today));
        assert_eq!(sink.path(), expected.as_path());
        let content = fs::read_to_string(&expected).unwrap();
        assert!(content.contains("[INFO    ] api: server up"));
        assert_eq!(sink.failure_count(), 0);
    }

    #[test]
    fn test_size_threshold_rotates_into_gz_archive() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/run-%DATE%.log", dir.path().display());
        // Each rendered line is ~50 bytes, so every record after the first
        // trips the threshold.
        let mut sink = RotatingFileSink::new("api", &pattern, "64", "10").unwrap();

        sink.write(&Record::new(Level::Error, "api", "first"));
        sink.write(&Record::new(Level::Error, "api", "second"));
        sink.write(&Record::new(Level::Error, "api", "third"));

        assert_eq!(archive_count(dir.path()), 2);
        let live = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(live.lines().count(), 1);
        assert!(live.contains("third"));
        assert_eq!(sink.failure_count(), 0);
    }

    #[test]
    fn test_count_retention_keeps_newest_archives() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/run-%DATE%.log", dir.path().display());
        let mut sink = RotatingFileSink::new("api", &pattern, "64", "1").unwrap();

        for i in 0..4 {
            sink.write(&Record::new(Level::Error, "api", format!("record {}", i)));
        }

        assert_eq!(archive_count(dir.path()), 1);
    }

    #[test]
    fn test_age_retention_keeps_fresh_archives() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/run-%DATE%.log", dir.path().display());
        let mut sink = RotatingFileSink::new("api", &pattern, "64", "14d").unwrap();

        sink.write(&Record::new(Level::Error, "api", "first"));
        sink.write(&Record::new(Level::Error, "api", "second"));

        // Just rotated, nothing is two weeks old
        assert_eq!(archive_count(dir.path()), 1);
    }

    #[test]
    fn test_write_failures_are_swallowed_and_counted() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/run-%DATE%.log", dir.path().display());
        let mut sink = RotatingFileSink::new("api", &pattern, "64", "10").unwrap();

        sink.write(&Record::new(Level::Error, "api", "first"));

        // Swap the live file for a directory so rotation cannot archive or
        // reopen it
        fs::remove_file(sink.path()).unwrap();
        fs::create_dir(sink.path()).unwrap();

        sink.write(&Record::new(Level::Error, "api", "second"));
        assert!(sink.failure_count() > 0);

        // The sink keeps accepting records after the failure
        let before = sink.failure_count();
        sink.write(&Record::new(Level::Error, "api", "third"));
        assert!(sink.failure_count() >= before);
    }

    #[test]
    fn test_archive_prefix_from_pattern() {
        assert_eq!(archive_prefix("./logs/runtime-%DATE%.log"), "runtime-");
        assert_eq!(archive_prefix("plain.log"), "plain.log");
    }
}
