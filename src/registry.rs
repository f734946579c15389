//! Logger registry
//!
//! Process-wide store of named loggers with lazy creation. The hierarchy is
//! not stored anywhere: it is a projection computed on demand by prefix
//! matching over the flat logger list. The registry is an explicit handle
//! threaded through the host, not ambient global state.

use std::sync::{Arc, RwLock};

use crate::logger::Logger;

/// Store resolving names to [`Logger`] instances, creating them lazily.
pub struct Registry {
    loggers: RwLock<Vec<Arc<Logger>>>,
}

impl Registry {
    /// Create an empty registry.
    ///
    /// Handed out as `Arc` so each logger can hold a back-reference for
    /// propagation; create it once at process start and share it.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            loggers: RwLock::new(Vec::new()),
        })
    }

    /// Look up a logger by exact name, creating it on first request.
    ///
    /// Idempotent: repeated calls with the same name return the same
    /// instance, so callers can cache the handle. New loggers start with the
    /// default threshold and no sinks regardless of any propagation that
    /// happened before they existed.
    pub fn logger(self: &Arc<Self>, name: &str) -> Arc<Logger> {
        {
            let loggers = self.loggers.read().unwrap_or_else(|e| e.into_inner());
            if let Some(existing) = loggers.iter().find(|l| l.name() == name) {
                return Arc::clone(existing);
            }
        }
        let mut loggers = self.loggers.write().unwrap_or_else(|e| e.into_inner());
        // Lost the race between read and write: check again
        if let Some(existing) = loggers.iter().find(|l| l.name() == name) {
            return Arc::clone(existing);
        }
        let logger = Arc::new(Logger::new(name.to_string(), Arc::downgrade(self)));
        loggers.push(Arc::clone(&logger));
        logger
    }

    /// Every currently registered logger whose name starts with `name` plus
    /// the `.` separator.
    ///
    /// A literal prefix match, not a glob: `api2` is never a descendant of
    /// `api`. Registration order does not matter, so a child created before
    /// its ancestor is still found.
    pub fn descendants_of(&self, name: &str) -> Vec<Arc<Logger>> {
        let prefix = format!("{}.", name);
        self.loggers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|l| l.name().starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// Number of loggers created so far.
    pub fn logger_count(&self) -> usize {
        self.loggers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}
