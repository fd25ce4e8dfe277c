//! Response record returned by the client.

use std::collections::HashMap;
use std::time::Duration;

/// HTTP response record.
///
/// Any status, including 4xx and 5xx, is a normal response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Body decoded as UTF-8 (lossy).
    pub body: String,
    /// Raw body bytes.
    pub body_bytes: Vec<u8>,
    /// Wall-clock time of the exchange as measured by the client.
    ///
    /// Authoritative for every latency check. Until the client stamps it,
    /// it holds the transport's own measurement.
    pub duration: Duration,
    /// Time reported by the transport adapter.
    pub transport_duration: Duration,
}

impl ResponseSpec {
    /// Creates a response from raw exchange data.
    ///
    /// `duration` is the transport's measurement; it also seeds the
    /// authoritative duration until [`ResponseSpec::with_client_duration`]
    /// replaces it.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        Self {
            status,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
            body_bytes: body,
            duration,
            transport_duration: duration,
        }
    }

    /// Replaces the authoritative duration with the client's measurement.
    #[must_use]
    pub const fn with_client_duration(mut self, elapsed: Duration) -> Self {
        self.duration = elapsed;
        self
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body_bytes)
    }

    /// Returns the body as JSON for logging: parsed when possible,
    /// the raw text otherwise, and an empty object for an empty body.
    #[must_use]
    pub fn body_for_log(&self) -> serde_json::Value {
        if self.body_bytes.is_empty() {
            return serde_json::Value::Object(serde_json::Map::new());
        }
        self.json()
            .unwrap_or_else(|_| serde_json::Value::String(self.body.clone()))
    }

    /// Elapsed time in milliseconds, rounded to two decimals.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        (self.duration.as_secs_f64() * 100_000.0).round() / 100.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn empty(status: u16, duration: Duration) -> ResponseSpec {
        ResponseSpec::new(status, HashMap::new(), Vec::new(), duration)
    }

    #[test]
    fn test_response_new() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let response = ResponseSpec::new(
            201,
            headers,
            br#"{"id": 101}"#.to_vec(),
            Duration::from_millis(100),
        );

        assert_eq!(response.status, 201);
        assert_eq!(response.body, r#"{"id": 101}"#);
        assert_eq!(response.json().unwrap(), json!({"id": 101}));
        assert_eq!(response.duration, response.transport_duration);
    }

    #[test]
    fn test_json_parse_failure_is_reported() {
        let response = ResponseSpec::new(
            502,
            HashMap::new(),
            b"<html>bad gateway</html>".to_vec(),
            Duration::ZERO,
        );
        assert!(response.json().is_err());
        assert_eq!(response.body_for_log(), json!("<html>bad gateway</html>"));
    }

    #[test]
    fn test_empty_body_logs_as_empty_object() {
        assert_eq!(empty(204, Duration::ZERO).body_for_log(), json!({}));
    }

    #[test]
    fn test_elapsed_ms_rounding() {
        assert_eq!(empty(200, Duration::from_micros(123_456)).elapsed_ms(), 123.46);
    }

    #[test]
    fn test_client_duration_is_authoritative() {
        let response =
            empty(200, Duration::ZERO).with_client_duration(Duration::from_millis(300));

        assert_eq!(response.elapsed_ms(), 300.0);
        assert_eq!(response.transport_duration, Duration::ZERO);
    }
}
