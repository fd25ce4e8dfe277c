//! Application error types

use thiserror::Error;

use crate::ports::TransportError;

/// Errors returned by [`ApiClient`](crate::ApiClient).
///
/// HTTP error statuses are not represented here; they are ordinary
/// responses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// URL is empty.
    #[error("URL is required")]
    EmptyUrl,

    /// URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Every attempt failed at the transport level.
    #[error("request failed after {attempts} attempt(s): {source}")]
    Transport {
        /// Number of attempts made.
        attempts: u32,
        /// Error from the last attempt.
        #[source]
        source: TransportError,
    },
}

impl ClientError {
    /// Returns the number of transport attempts made before failing.
    ///
    /// Validation failures never reach the transport and report zero.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::EmptyUrl | Self::InvalidUrl(_) => 0,
            Self::Transport { attempts, .. } => *attempts,
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
