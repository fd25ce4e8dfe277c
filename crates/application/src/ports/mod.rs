//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod event_sink;
mod http_client;

pub use event_sink::EventSink;
pub use http_client::{HttpTransport, TransportError};
