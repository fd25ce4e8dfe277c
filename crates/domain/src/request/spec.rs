//! Request specification type

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::{Headers, HttpMethod, QueryParam, QueryParams};

/// Complete description of one outbound HTTP call.
///
/// A `RequestSpec` is built per call and discarded once the response has
/// been asserted on. The `test_case` field only correlates log events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Unique identifier for this request
    pub id: Uuid,
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL without query parameters
    pub url: String,
    /// HTTP headers, transmitted exactly as given
    #[serde(default)]
    pub headers: Headers,
    /// Optional JSON body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Query parameters appended to the URL
    #[serde(default)]
    pub query: QueryParams,
    /// Per-request timeout; the client default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Test case identifier used for log correlation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_case: Option<String>,
}

impl RequestSpec {
    /// Creates a request with the given method and URL and nothing else.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
            query: QueryParams::new(),
            timeout_ms: None,
            test_case: None,
        }
    }

    /// Creates a GET request with the given URL.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a POST request with the given URL.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Creates a PUT request with the given URL.
    #[must_use]
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    /// Creates a DELETE request with the given URL.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Adds a single header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replaces the header mapping.
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(QueryParam::new(key, value));
        self
    }

    /// Sets an explicit timeout for this request.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Tags the request with a test case identifier.
    #[must_use]
    pub fn with_test_case(mut self, test_case: impl Into<String>) -> Self {
        self.test_case = Some(test_case.into());
        self
    }

    /// Returns the explicit timeout, if one was set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Parses the URL and appends the query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed.
    pub fn full_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.url)?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in self.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_new_request_has_no_headers() {
        let req = RequestSpec::get("https://api.example.com/posts");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
        assert!(req.timeout().is_none());
    }

    #[test]
    fn test_builder() {
        let req = RequestSpec::post("https://api.example.com/posts")
            .with_header("Accept", "application/json")
            .with_json(json!({"title": "t"}))
            .with_timeout(Duration::from_secs(5))
            .with_test_case("TC_CRUD_001");

        assert_eq!(req.headers.get("accept"), Some("application/json"));
        assert_eq!(req.body, Some(json!({"title": "t"})));
        assert_eq!(req.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(req.test_case.as_deref(), Some("TC_CRUD_001"));
    }

    #[test]
    fn test_full_url_appends_query() {
        let req = RequestSpec::get("https://api.example.com/posts")
            .with_query("_page", "2")
            .with_query("_limit", "20");

        assert_eq!(
            req.full_url().unwrap().as_str(),
            "https://api.example.com/posts?_page=2&_limit=20"
        );
    }

    #[test]
    fn test_full_url_keeps_existing_query() {
        let req = RequestSpec::get("https://api.example.com/posts?_page=1").with_query("_limit", "20");
        assert_eq!(
            req.full_url().unwrap().as_str(),
            "https://api.example.com/posts?_page=1&_limit=20"
        );
    }

    #[test]
    fn test_full_url_invalid() {
        let req = RequestSpec::get("not a url");
        assert!(req.full_url().is_err());
    }
}
