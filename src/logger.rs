//! Logger nodes
//!
//! A logger is a named node owning a severity threshold and the sinks
//! attached to it. Thresholds and transports set here cascade through the
//! registry to every logger currently registered under this one's namespace.

use std::sync::{Mutex, Weak};

use crate::level::Level;
use crate::record::Record;
use crate::registry::Registry;
use crate::sink::{Sink, SinkError, SinkFactory};

/// Threshold given to newly created loggers.
pub(crate) const DEFAULT_THRESHOLD: Level = Level::Debug;

struct LoggerState {
    threshold: Level,
    sinks: Vec<Box<dyn Sink>>,
}

/// A named logger owned by a [`Registry`].
///
/// Handles are shared (`Arc<Logger>`) and live for the registry's lifetime;
/// callers cache them and keep calling methods on the same instance.
pub struct Logger {
    name: String,
    registry: Weak<Registry>,
    state: Mutex<LoggerState>,
}

impl Logger {
    pub(crate) fn new(name: String, registry: Weak<Registry>) -> Self {
        Self {
            name,
            registry,
            state: Mutex::new(LoggerState {
                threshold: DEFAULT_THRESHOLD,
                sinks: Vec::new(),
            }),
        }
    }

    /// The dot-segmented name this logger was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current severity threshold.
    pub fn level(&self) -> Level {
        self.lock_state().threshold
    }

    /// Number of sinks currently attached.
    pub fn sink_count(&self) -> usize {
        self.lock_state().sinks.len()
    }

    /// Emit a record at the given level.
    ///
    /// Dropped without touching any sink when the level is less severe than
    /// the current threshold. With no sinks attached, accepted records go
    /// nowhere; that is intentional and never an error.
    pub fn emit(&self, level: Level, message: impl Into<String>) {
        let mut state = self.lock_state();
        if level.rank() > state.threshold.rank() {
            return;
        }
        if state.sinks.is_empty() {
            return;
        }
        let record = Record::new(level, self.name.clone(), message);
        for sink in &mut state.sinks {
            sink.write(&record);
        }
    }

    /// Emit at `critical`.
    pub fn critical(&self, message: impl Into<String>) {
        self.emit(Level::Critical, message);
    }

    /// Emit at `error`.
    pub fn error(&self, message: impl Into<String>) {
        self.emit(Level::Error, message);
    }

    /// Emit at `warn`.
    pub fn warn(&self, message: impl Into<String>) {
        self.emit(Level::Warn, message);
    }

    /// Emit at `info`.
    pub fn info(&self, message: impl Into<String>) {
        self.emit(Level::Info, message);
    }

    /// Emit at `debug`.
    pub fn debug(&self, message: impl Into<String>) {
        self.emit(Level::Debug, message);
    }

    /// Emit at `trace`.
    pub fn trace(&self, message: impl Into<String>) {
        self.emit(Level::Trace, message);
    }

    /// Emit at `unit`.
    pub fn unit(&self, message: impl Into<String>) {
        self.emit(Level::Unit, message);
    }

    /// Set this logger's threshold and cascade it to every descendant
    /// registered at the moment of the call. Loggers created afterwards keep
    /// their own defaults.
    pub fn set_level(&self, level: Level) {
        self.set_own_level(level);
        if let Some(registry) = self.registry.upgrade() {
            for descendant in registry.descendants_of(&self.name) {
                descendant.set_own_level(level);
            }
        }
    }

    /// Attach a sink built from the factory, bound to this logger's name,
    /// then attach an equivalently configured sink to every current
    /// descendant, each bound to the descendant's own name.
    ///
    /// Factory errors (bad configuration) surface to the caller; propagation
    /// stops at the first failure.
    pub fn add_transport(&self, factory: &dyn SinkFactory) -> Result<(), SinkError> {
        self.attach(factory.create_bound_sink(&self.name)?);
        if let Some(registry) = self.registry.upgrade() {
            for descendant in registry.descendants_of(&self.name) {
                descendant.attach(factory.create_bound_sink(descendant.name())?);
            }
        }
        Ok(())
    }

    fn set_own_level(&self, level: Level) {
        self.lock_state().threshold = level;
    }

    fn attach(&self, sink: Box<dyn Sink>) {
        self.lock_state().sinks.push(sink);
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, LoggerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
