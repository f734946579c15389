//! Severity schema
//!
//! Fixed, ordered table of severity levels. Rank 0 is the most severe;
//! increasing ranks are progressively more verbose. The table is immutable
//! after compile time, so level names and ranks can never drift apart.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Severity of a log record.
///
/// The discriminant is the level's rank: lower rank means more severe.
/// A logger with threshold `T` emits a record at level `L` iff
/// `L.rank() <= T.rank()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Critical = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
    Unit = 6,
}

/// Error returned when a level name does not match the severity schema.
///
/// Unknown names are rejected rather than silently defaulted, otherwise
/// threshold filtering would become unpredictable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level \"{0}\"")]
pub struct ParseLevelError(pub String);

impl Level {
    /// All levels, ordered from most to least severe.
    pub const ALL: [Level; 7] = [
        Level::Critical,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
        Level::Unit,
    ];

    /// Numeric rank of this level (0 = most severe).
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Upper-case display token for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Critical => "CRITICAL",
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
            Level::Unit => "UNIT",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .iter()
            .find(|level| s.eq_ignore_ascii_case(level.as_str()))
            .copied()
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_are_strictly_ordered() {
        for (expected_rank, level) in Level::ALL.iter().enumerate() {
            assert_eq!(level.rank() as usize, expected_rank);
        }
    }

    #[test]
    fn test_critical_is_most_severe() {
        assert_eq!(Level::Critical.rank(), 0);
        assert_eq!(Level::Unit.rank(), 6);
        assert!(Level::Critical < Level::Unit);
    }

    #[test]
    fn test_from_str_accepts_all_names() {
        for level in Level::ALL {
            assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
            assert_eq!(
                level.as_str().to_ascii_lowercase().parse::<Level>().unwrap(),
                level
            );
        }
    }

    #[test]
    fn test_from_str_rejects_unknown_name() {
        let err = "verbose".parse::<Level>().unwrap_err();
        assert_eq!(err, ParseLevelError("verbose".to_string()));
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_display_matches_token() {
        assert_eq!(Level::Warn.to_string(), "WARN");
        assert_eq!(Level::Critical.to_string(), "CRITICAL");
    }
}
