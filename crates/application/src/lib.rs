//! apiprobe Application - Client orchestration and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The retrying, logging API client
//! - Test data generation
//! - Application-level error handling

pub mod api_client;
pub mod error;
pub mod logger;
pub mod ports;
pub mod retry;
pub mod test_data;

pub use api_client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use logger::ApiLogger;
pub use ports::{EventSink, HttpTransport, TransportError};
pub use retry::{RetryExhausted, RetryPolicy};
pub use test_data::{INVALID_EMAILS, TestDataManager};
