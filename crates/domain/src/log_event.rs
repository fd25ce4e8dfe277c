//! Structured diagnostic events emitted around each HTTP call.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::{HttpMethod, RequestSpec};
use crate::response::ResponseSpec;

/// A structured log record.
///
/// Serialized with a `type` tag of `REQUEST`, `RESPONSE`, `ERROR` or
/// `VALIDATION`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEvent {
    /// An outbound request, emitted before each attempt.
    Request {
        /// Test case correlation id.
        test_case: Option<String>,
        /// HTTP method.
        method: HttpMethod,
        /// Full URL including query.
        url: String,
        /// Headers exactly as sent.
        headers: HashMap<String, String>,
        /// JSON body, if any.
        body: Option<serde_json::Value>,
        /// 1-based attempt number.
        attempt: u32,
        /// Event time.
        timestamp: DateTime<Utc>,
    },
    /// An inbound response.
    Response {
        /// Test case correlation id.
        test_case: Option<String>,
        /// HTTP status code.
        status_code: u16,
        /// Response headers.
        headers: HashMap<String, String>,
        /// Parsed body, or raw text when not JSON.
        body: serde_json::Value,
        /// Measured latency in milliseconds.
        response_time_ms: f64,
        /// Event time.
        timestamp: DateTime<Utc>,
    },
    /// A terminal failure.
    Error {
        /// Test case correlation id.
        test_case: Option<String>,
        /// Error description.
        message: String,
        /// Event time.
        timestamp: DateTime<Utc>,
    },
    /// The outcome of a named validation.
    Validation {
        /// Test case correlation id.
        test_case: Option<String>,
        /// What was validated (e.g. a schema name).
        validation_type: String,
        /// Whether it passed.
        passed: bool,
        /// Optional details.
        details: Option<String>,
        /// Event time.
        timestamp: DateTime<Utc>,
    },
}

impl LogEvent {
    /// Builds a request event for one attempt.
    #[must_use]
    pub fn request(request: &RequestSpec, url: impl Into<String>, attempt: u32) -> Self {
        Self::Request {
            test_case: request.test_case.clone(),
            method: request.method,
            url: url.into(),
            headers: request
                .headers
                .iter()
                .map(|h| (h.name.clone(), h.value.clone()))
                .collect(),
            body: request.body.clone(),
            attempt,
            timestamp: Utc::now(),
        }
    }

    /// Builds a response event.
    #[must_use]
    pub fn response(response: &ResponseSpec, test_case: Option<&str>) -> Self {
        Self::Response {
            test_case: test_case.map(ToString::to_string),
            status_code: response.status,
            headers: response.headers.clone(),
            body: response.body_for_log(),
            response_time_ms: response.elapsed_ms(),
            timestamp: Utc::now(),
        }
    }

    /// Builds an error event.
    #[must_use]
    pub fn error(message: impl Into<String>, test_case: Option<&str>) -> Self {
        Self::Error {
            test_case: test_case.map(ToString::to_string),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Builds a validation event.
    #[must_use]
    pub fn validation(
        validation_type: impl Into<String>,
        passed: bool,
        details: Option<String>,
        test_case: Option<&str>,
    ) -> Self {
        Self::Validation {
            test_case: test_case.map(ToString::to_string),
            validation_type: validation_type.into(),
            passed,
            details,
            timestamp: Utc::now(),
        }
    }

    /// Returns the upper-case type tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Request { .. } => "REQUEST",
            Self::Response { .. } => "RESPONSE",
            Self::Error { .. } => "ERROR",
            Self::Validation { .. } => "VALIDATION",
        }
    }

    /// Returns the test case correlation id, if any.
    #[must_use]
    pub fn test_case(&self) -> Option<&str> {
        match self {
            Self::Request { test_case, .. }
            | Self::Response { test_case, .. }
            | Self::Error { test_case, .. }
            | Self::Validation { test_case, .. } => test_case.as_deref(),
        }
    }

    /// Returns true for events that report a failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::Error { .. } | Self::Validation { passed: false, .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_request_event_serializes_with_type_tag() {
        let request = RequestSpec::post("https://api.example.com/login")
            .with_header("Accept", "application/json")
            .with_json(json!({"email": "a@b.c"}))
            .with_test_case("TC_AUTH_001");

        let event = LogEvent::request(&request, "https://api.example.com/login", 1);
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "REQUEST");
        assert_eq!(value["test_case"], "TC_AUTH_001");
        assert_eq!(value["method"], "POST");
        assert_eq!(value["headers"]["Accept"], "application/json");
        assert_eq!(value["body"], json!({"email": "a@b.c"}));
    }

    #[test]
    fn test_response_event_fields() {
        let response = ResponseSpec::new(
            404,
            HashMap::new(),
            b"{}".to_vec(),
            Duration::from_millis(42),
        );
        let event = LogEvent::response(&response, Some("TC_ERROR_001"));

        assert_eq!(event.kind(), "RESPONSE");
        assert_eq!(event.test_case(), Some("TC_ERROR_001"));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["status_code"], 404);
        assert_eq!(value["body"], json!({}));
        assert_eq!(value["response_time_ms"], 42.0);
    }

    #[test]
    fn test_failure_events() {
        assert!(LogEvent::error("connection refused", None).is_failure());
        assert!(LogEvent::validation("user", false, None, None).is_failure());
        assert!(!LogEvent::validation("user", true, None, None).is_failure());
    }
}
