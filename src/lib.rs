//! tierlog - hierarchical named logging
//!
//! Loggers are registered by dot-segmented name (`api`, `api.auth`) in a
//! shared [`Registry`] and created lazily on first request. Setting a
//! severity threshold or attaching a transport on a logger cascades to every
//! descendant registered at that moment; loggers created later start from
//! their own defaults.
//!
//! # Example
//!
//! ```
//! use tierlog::{Level, Registry, SinkConfig};
//!
//! # fn main() -> Result<(), tierlog::SinkError> {
//! let registry = Registry::new();
//! let auth = registry.logger("api.auth");
//! let api = registry.logger("api");
//!
//! // Cascades to api.auth: it is already registered
//! api.set_level(Level::Info);
//! api.add_transport(&SinkConfig::Console)?;
//!
//! api.info("server listening");
//! auth.info("token accepted");
//! api.debug("dropped: below the info threshold");
//! # Ok(())
//! # }
//! ```

pub mod level;
pub mod logger;
pub mod record;
pub mod registry;
pub mod sink;

pub use level::{Level, ParseLevelError};
pub use logger::Logger;
pub use record::Record;
pub use registry::Registry;
pub use sink::{
    ConsoleSink, Palette, Retention, RotatingFileSink, Sink, SinkConfig, SinkError, SinkFactory,
};
