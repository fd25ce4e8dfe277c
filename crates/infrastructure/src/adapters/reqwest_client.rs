//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port using the reqwest library.
//! It performs one exchange per call and keeps no cookies or session state.

use std::collections::HashMap;
use std::error::Error as _;
use std::time::{Duration, Instant};

use apiprobe_application::ports::{HttpTransport, TransportError};
use apiprobe_domain::{
    request::{HttpMethod, RequestSpec},
    response::ResponseSpec,
};
use reqwest::{Client, Method};

/// HTTP transport implementation using reqwest.
///
/// Sends the caller's headers unchanged. No `User-Agent` or other default
/// headers are configured; the only header added is
/// `Content-Type: application/json` when a JSON body is present and the
/// caller did not set a content type.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a new transport.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - No cookie store
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a new transport with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Encodes the JSON body, if any.
    fn encode_body(request: &RequestSpec) -> Result<Option<Vec<u8>>, TransportError> {
        request
            .body
            .as_ref()
            .map(|body| {
                serde_json::to_vec(body)
                    .map_err(|e| TransportError::InvalidBody(format!("Invalid JSON: {e}")))
            })
            .transpose()
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        let host = error
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or("unknown")
            .to_string();

        if error.is_connect() {
            let message = error_chain(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return TransportError::DnsError { host, message };
            }
            if lower.contains("refused") {
                return TransportError::ConnectionRefused {
                    host,
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_builder() {
            return TransportError::InvalidRequest(error_chain(error));
        }

        TransportError::Other(error_chain(error))
    }
}

/// Joins an error and its sources into one message.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: &RequestSpec,
        timeout: Duration,
    ) -> Result<ResponseSpec, TransportError> {
        let url = request
            .full_url()
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", request.url)))?;
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let body = Self::encode_body(request)?;

        // Start timing
        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(timeout);

        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }

        if let Some(bytes) = body {
            if !request.headers.contains("content-type") {
                builder = builder.header("Content-Type", "application/json");
            }
            builder = builder.body(bytes);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();

        let response_headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?
            .to_vec();

        // Body read is part of the measured exchange
        let duration = start.elapsed();

        tracing::trace!(
            method = %request.method,
            status,
            bytes = body_bytes.len(),
            "Exchange finished"
        );

        Ok(ResponseSpec::new(
            status,
            response_headers,
            body_bytes,
            duration,
        ))
    }
}
