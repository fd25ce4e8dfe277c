//! HTTP transport port

use std::future::Future;
use std::time::Duration;

use apiprobe_domain::{request::RequestSpec, response::ResponseSpec};
use thiserror::Error;

/// Failure raised by the transport before a response was received.
///
/// HTTP error statuses are not transport failures; they arrive as a normal
/// [`ResponseSpec`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request exceeded its timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that was exceeded.
        timeout_ms: u64,
    },

    /// The remote host refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The host name could not be resolved.
    #[error("DNS resolution failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The connection failed for another reason.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The URL could not be used.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be built, e.g. a malformed header name.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request body could not be encoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for performing a single HTTP exchange.
///
/// Implementations must send the request headers exactly as given and keep
/// no state between calls. Elapsed time on the returned response is
/// measured by the implementation around the exchange.
pub trait HttpTransport: Send + Sync {
    /// Executes one attempt of an HTTP request.
    ///
    /// # Arguments
    ///
    /// * `request` - The request to send
    /// * `timeout` - Effective timeout for this attempt
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on connection, DNS or timeout failures.
    fn execute(
        &self,
        request: &RequestSpec,
        timeout: Duration,
    ) -> impl Future<Output = Result<ResponseSpec, TransportError>> + Send;
}
