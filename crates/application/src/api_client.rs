//! API client
//!
//! Sends requests through an [`HttpTransport`], retrying transport failures
//! according to a [`RetryPolicy`] and reporting each exchange to the
//! [`ApiLogger`].

use std::sync::Arc;
use std::time::Duration;

use apiprobe_domain::{Headers, RequestSpec, ResponseSpec, Settings};
use serde_json::Value;
use tokio::time::Instant;

use crate::error::{ClientError, ClientResult};
use crate::logger::ApiLogger;
use crate::ports::HttpTransport;
use crate::retry::{RetryExhausted, RetryPolicy};

/// Client for calling the services under test.
///
/// Holds no per-call state, so one instance can be shared across
/// concurrent tasks. Headers are sent exactly as the caller supplies them.
///
/// # Example
///
/// ```ignore
/// let client = ApiClient::from_settings(Arc::new(ReqwestTransport::new()?), logger, &settings);
///
/// let request = RequestSpec::get("https://jsonplaceholder.typicode.com/posts/1");
/// let response = client.request(&request).await?;
/// ```
pub struct ApiClient<T: HttpTransport> {
    transport: Arc<T>,
    logger: Arc<ApiLogger>,
    retry: RetryPolicy,
    default_timeout: Duration,
    log_requests: bool,
}

impl<T: HttpTransport> ApiClient<T> {
    /// Creates a client with default settings.
    pub fn new(transport: Arc<T>, logger: Arc<ApiLogger>) -> Self {
        Self::from_settings(transport, logger, &Settings::default())
    }

    /// Creates a client using the timeout, retry count and logging flag
    /// from `settings`.
    pub fn from_settings(transport: Arc<T>, logger: Arc<ApiLogger>, settings: &Settings) -> Self {
        Self {
            transport,
            logger,
            retry: RetryPolicy::from_settings(settings),
            default_timeout: settings.timeout,
            log_requests: settings.log_requests,
        }
    }

    /// Replaces the retry policy (builder pattern).
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the retry policy.
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the timeout used when a request has none.
    pub const fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Returns the shared logger.
    pub fn logger(&self) -> &Arc<ApiLogger> {
        &self.logger
    }

    /// Sends a request.
    ///
    /// # Validation
    ///
    /// - URL must not be empty
    /// - URL must start with http:// or https://
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on validation failure or once every attempt
    /// has failed at the transport level. HTTP error statuses are returned
    /// as responses after a single attempt.
    ///
    /// The returned `duration` is the client's own wall-clock measurement
    /// of the successful attempt; the adapter's figure is kept in
    /// `transport_duration`.
    pub async fn request(&self, request: &RequestSpec) -> ClientResult<ResponseSpec> {
        let full_url = Self::validate(request)?;
        let url = full_url.as_str();
        let timeout = request.timeout().unwrap_or(self.default_timeout);
        let test_case = request.test_case.as_deref();

        let transport = self.transport.as_ref();
        let logger = self.logger.as_ref();
        let log_requests = self.log_requests;

        let outcome = self
            .retry
            .run(move |attempt| async move {
                if log_requests {
                    logger.log_request(request, url, attempt);
                }
                let start = Instant::now();
                transport
                    .execute(request, timeout)
                    .await
                    .map(|response| response.with_client_duration(start.elapsed()))
            })
            .await;

        match outcome {
            Ok(response) => {
                tracing::debug!(
                    method = %request.method,
                    url,
                    status = response.status,
                    elapsed_ms = response.elapsed_ms(),
                    "Request completed"
                );
                if self.log_requests {
                    self.logger.log_response(&response, test_case);
                }
                Ok(response)
            }
            Err(RetryExhausted { attempts, error }) => {
                self.logger.log_error(
                    format!("Request failed after {attempts} attempt(s): {error}"),
                    test_case,
                );
                Err(ClientError::Transport {
                    attempts,
                    source: error,
                })
            }
        }
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get(
        &self,
        url: impl Into<String>,
        headers: Headers,
        test_case: &str,
    ) -> ClientResult<ResponseSpec> {
        let request = RequestSpec::get(url)
            .with_headers(headers)
            .with_test_case(test_case);
        self.request(&request).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post(
        &self,
        url: impl Into<String>,
        body: Value,
        headers: Headers,
        test_case: &str,
    ) -> ClientResult<ResponseSpec> {
        let request = RequestSpec::post(url)
            .with_json(body)
            .with_headers(headers)
            .with_test_case(test_case);
        self.request(&request).await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put(
        &self,
        url: impl Into<String>,
        body: Value,
        headers: Headers,
        test_case: &str,
    ) -> ClientResult<ResponseSpec> {
        let request = RequestSpec::put(url)
            .with_json(body)
            .with_headers(headers)
            .with_test_case(test_case);
        self.request(&request).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(
        &self,
        url: impl Into<String>,
        headers: Headers,
        test_case: &str,
    ) -> ClientResult<ResponseSpec> {
        let request = RequestSpec::delete(url)
            .with_headers(headers)
            .with_test_case(test_case);
        self.request(&request).await
    }

    /// Validates the request before execution.
    fn validate(request: &RequestSpec) -> ClientResult<url::Url> {
        if request.url.trim().is_empty() {
            return Err(ClientError::EmptyUrl);
        }

        if !request.url.starts_with("http://") && !request.url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }

        request
            .full_url()
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }
}

impl<T: HttpTransport> std::fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("retry", &self.retry)
            .field("default_timeout", &self.default_timeout)
            .field("log_requests", &self.log_requests)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ports::{EventSink, TransportError};
    use apiprobe_domain::LogEvent;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Transport that fails a fixed number of times, then answers with
    /// `status`.
    struct FakeTransport {
        failures: u32,
        status: u16,
        calls: AtomicU32,
        seen: Mutex<Vec<(Headers, Duration)>>,
    }

    impl FakeTransport {
        fn answering(status: u16) -> Self {
            Self::failing_then(0, status)
        }

        fn failing_then(failures: u32, status: u16) -> Self {
            Self {
                failures,
                status,
                calls: AtomicU32::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl HttpTransport for FakeTransport {
        async fn execute(
            &self,
            request: &RequestSpec,
            timeout: Duration,
        ) -> Result<ResponseSpec, TransportError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.seen
                .lock()
                .unwrap()
                .push((request.headers.clone(), timeout));

            if call <= self.failures {
                return Err(TransportError::ConnectionRefused {
                    host: "127.0.0.1".to_string(),
                    port: 9,
                });
            }

            Ok(ResponseSpec::new(
                self.status,
                HashMap::new(),
                b"{}".to_vec(),
                Duration::from_millis(50),
            ))
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<LogEvent>>);

    impl Recorder {
        fn kinds(&self) -> Vec<&'static str> {
            self.0.lock().unwrap().iter().map(LogEvent::kind).collect()
        }
    }

    impl EventSink for Recorder {
        fn record(&self, event: &LogEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    fn client(transport: &Arc<FakeTransport>) -> (ApiClient<FakeTransport>, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let logger = Arc::new(ApiLogger::new(recorder.clone()));
        (ApiClient::new(Arc::clone(transport), logger), recorder)
    }

    #[tokio::test]
    async fn test_request_success_logs_request_and_response() {
        let transport = Arc::new(FakeTransport::answering(200));
        let (client, recorder) = client(&transport);

        let response = client
            .get("https://api.example.com/posts/1", Headers::new(), "TC_1")
            .await
            .expect("should be ok");

        assert_eq!(response.status, 200);
        assert_eq!(transport.calls(), 1);
        assert_eq!(recorder.kinds(), vec!["REQUEST", "RESPONSE"]);
    }

    #[tokio::test]
    async fn test_request_empty_url() {
        let transport = Arc::new(FakeTransport::answering(200));
        let (client, _) = client(&transport);

        let result = client.request(&RequestSpec::get("  ")).await;

        assert_eq!(result.unwrap_err(), ClientError::EmptyUrl);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_request_invalid_url() {
        let transport = Arc::new(FakeTransport::answering(200));
        let (client, _) = client(&transport);

        let result = client.request(&RequestSpec::get("not-a-valid-url")).await;

        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_http_error_status_is_not_retried() {
        for status in [400, 404, 405, 422, 500, 503] {
            let transport = Arc::new(FakeTransport::answering(status));
            let (client, _) = client(&transport);

            let response = client
                .delete("https://api.example.com/get", Headers::new(), "TC_ERR")
                .await
                .expect("status is a response");

            assert_eq!(response.status, status);
            assert_eq!(transport.calls(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_exhausts_attempts() {
        let transport = Arc::new(FakeTransport::failing_then(u32::MAX, 200));
        let (client, recorder) = client(&transport);

        let err = client
            .get("http://127.0.0.1:9/", Headers::new(), "TC_DOWN")
            .await
            .unwrap_err();

        assert_eq!(err.attempts(), 3);
        assert!(matches!(
            err,
            ClientError::Transport {
                source: TransportError::ConnectionRefused { .. },
                ..
            }
        ));
        assert_eq!(transport.calls(), 3);
        assert_eq!(
            recorder.kinds(),
            vec!["REQUEST", "REQUEST", "REQUEST", "ERROR"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_recovers() {
        let transport = Arc::new(FakeTransport::failing_then(2, 201));
        let (client, recorder) = client(&transport);

        let response = client
            .post(
                "https://api.example.com/posts",
                json!({"title": "t"}),
                Headers::new(),
                "TC_FLAKY",
            )
            .await
            .expect("third attempt succeeds");

        assert_eq!(response.status, 201);
        assert_eq!(transport.calls(), 3);

        let attempts: Vec<u32> = recorder
            .0
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                LogEvent::Request { attempt, .. } => Some(*attempt),
                _ => None,
            })
            .collect();
        assert_eq!(attempts, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_headers_sent_as_supplied() {
        let transport = Arc::new(FakeTransport::answering(200));
        let (client, _) = client(&transport);

        client
            .get("https://httpbin.org/headers", Headers::new(), "TC_HDR")
            .await
            .unwrap();
        client
            .get(
                "https://httpbin.org/headers",
                Headers::new().with("X-Trace", "abc"),
                "TC_HDR",
            )
            .await
            .unwrap();

        let seen = transport.seen.lock().unwrap();
        assert!(seen[0].0.is_empty());
        assert_eq!(seen[1].0.len(), 1);
        assert_eq!(seen[1].0.get("x-trace"), Some("abc"));
    }

    #[tokio::test]
    async fn test_timeout_defaults_and_overrides() {
        let transport = Arc::new(FakeTransport::answering(200));
        let (client, _) = client(&transport);

        client
            .request(&RequestSpec::get("https://api.example.com/a"))
            .await
            .unwrap();
        client
            .request(&RequestSpec::get("https://api.example.com/b").with_timeout(Duration::from_secs(2)))
            .await
            .unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].1, Duration::from_secs(30));
        assert_eq!(seen[1].1, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_request_logging_still_reports_errors() {
        let transport = Arc::new(FakeTransport::failing_then(u32::MAX, 200));
        let recorder = Arc::new(Recorder::default());
        let settings = Settings {
            log_requests: false,
            retry_count: 2,
            ..Settings::default()
        };
        let client = ApiClient::from_settings(
            Arc::clone(&transport),
            Arc::new(ApiLogger::new(recorder.clone())),
            &settings,
        );

        let err = client
            .request(&RequestSpec::get("http://127.0.0.1:9/"))
            .await
            .unwrap_err();

        assert_eq!(err.attempts(), 2);
        assert_eq!(recorder.kinds(), vec!["ERROR"]);
    }

    /// Transport that takes `delay` but claims the exchange took no time.
    struct UntimedTransport {
        delay: Duration,
    }

    impl HttpTransport for UntimedTransport {
        async fn execute(
            &self,
            _request: &RequestSpec,
            _timeout: Duration,
        ) -> Result<ResponseSpec, TransportError> {
            tokio::time::sleep(self.delay).await;
            Ok(ResponseSpec::new(200, HashMap::new(), b"{}".to_vec(), Duration::ZERO))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_measures_elapsed_time_itself() {
        let transport = Arc::new(UntimedTransport {
            delay: Duration::from_millis(300),
        });
        let recorder = Arc::new(Recorder::default());
        let client = ApiClient::new(transport, Arc::new(ApiLogger::new(recorder.clone())));

        let response = client
            .get("https://api.example.com/slow", Headers::new(), "TC_SLOW")
            .await
            .unwrap();

        assert!(response.duration >= Duration::from_millis(300));
        assert!(response.elapsed_ms() >= 300.0);
        assert_eq!(response.transport_duration, Duration::ZERO);

        let logged = recorder.0.lock().unwrap().iter().find_map(|e| match e {
            LogEvent::Response { response_time_ms, .. } => Some(*response_time_ms),
            _ => None,
        });
        assert!(logged.unwrap() >= 300.0);
    }
}
