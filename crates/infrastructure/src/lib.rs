//! apiprobe Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings loading, tracing
//! setup and the response checks used by the suites.

pub mod adapters;
pub mod logging;
pub mod settings;
pub mod testing;

pub use adapters::ReqwestTransport;
pub use logging::{LogSettings, MemoryEventSink, TracingEventSink, init_tracing};
pub use settings::{ConfigError, LoadedSettings, load_settings, load_settings_from};
pub use testing::{SchemaValidator, ValidationOutcome};
