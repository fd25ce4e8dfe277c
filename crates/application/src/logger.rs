//! Request/response logger

use std::sync::Arc;

use apiprobe_domain::{LogEvent, RequestSpec, ResponseSpec};

use crate::ports::EventSink;

/// Builds [`LogEvent`]s and hands them to an [`EventSink`].
///
/// Created once at process start and shared by `Arc`.
#[derive(Clone)]
pub struct ApiLogger {
    sink: Arc<dyn EventSink>,
}

impl ApiLogger {
    /// Creates a logger writing to `sink`.
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Records an outgoing request attempt.
    pub fn log_request(&self, request: &RequestSpec, url: &str, attempt: u32) {
        self.sink.record(&LogEvent::request(request, url, attempt));
    }

    /// Records a received response.
    pub fn log_response(&self, response: &ResponseSpec, test_case: Option<&str>) {
        self.sink.record(&LogEvent::response(response, test_case));
    }

    /// Records a terminal error.
    pub fn log_error(&self, message: impl Into<String>, test_case: Option<&str>) {
        self.sink.record(&LogEvent::error(message, test_case));
    }

    /// Records the outcome of a validation.
    pub fn log_validation(
        &self,
        validation_type: &str,
        passed: bool,
        details: Option<String>,
        test_case: Option<&str>,
    ) {
        self.sink.record(&LogEvent::validation(
            validation_type,
            passed,
            details,
            test_case,
        ));
    }
}

impl std::fmt::Debug for ApiLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiLogger").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<LogEvent>>);

    impl EventSink for Recorder {
        fn record(&self, event: &LogEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_events_carry_test_case() {
        let recorder = Arc::new(Recorder::default());
        let logger = ApiLogger::new(recorder.clone());

        let request = RequestSpec::get("https://example.com/posts").with_test_case("TC_1");
        logger.log_request(&request, &request.url, 1);
        logger.log_error("boom", Some("TC_1"));
        logger.log_validation("post", false, Some("missing id".to_string()), Some("TC_1"));

        let events = recorder.0.lock().unwrap();
        let kinds: Vec<_> = events.iter().map(LogEvent::kind).collect();
        assert_eq!(kinds, vec!["REQUEST", "ERROR", "VALIDATION"]);
        assert!(events.iter().all(|e| e.test_case() == Some("TC_1")));
        assert!(events[1].is_failure());
        assert!(events[2].is_failure());
    }
}
