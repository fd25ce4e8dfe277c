//! Tracing setup and event sinks.

use std::sync::{Mutex, PoisonError};

use apiprobe_application::ports::EventSink;
use apiprobe_domain::{LogEvent, Settings};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Subscriber options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Whether to colour the output.
    pub ansi: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

impl From<&Settings> for LogSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            level: settings.log_level.clone(),
            ..Self::default()
        }
    }
}

/// Installs the global tracing subscriber.
///
/// Call once from `main`. `RUST_LOG` takes priority over the configured
/// level.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(
    settings: &LogSettings,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level)))
        .with(tracing_subscriber::fmt::layer().with_ansi(settings.ansi))
        .try_init()
}

/// Writes events to `tracing`.
///
/// Requests and responses are logged at info level as JSON. Errors and
/// failed validations are logged at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl TracingEventSink {
    /// Creates a new sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn record(&self, event: &LogEvent) {
        match event {
            LogEvent::Request { .. } => {
                tracing::info!(test_case = event.test_case(), "API Request: {}", to_json(event));
            }
            LogEvent::Response { .. } => {
                tracing::info!(test_case = event.test_case(), "API Response: {}", to_json(event));
            }
            LogEvent::Error {
                test_case, message, ..
            } => {
                tracing::error!(
                    "Test Case: {} - Error: {message}",
                    test_case.as_deref().unwrap_or("-")
                );
            }
            LogEvent::Validation {
                test_case,
                validation_type,
                passed,
                details,
                ..
            } => {
                let status = if *passed { "PASSED" } else { "FAILED" };
                let mut message = format!("Validation [{validation_type}] - {status}");
                if let Some(details) = details {
                    message.push_str(" - ");
                    message.push_str(details);
                }
                if let Some(test_case) = test_case {
                    message = format!("Test Case: {test_case} - {message}");
                }

                if *passed {
                    tracing::info!("{message}");
                } else {
                    tracing::error!("{message}");
                }
            }
        }
    }
}

fn to_json(event: &LogEvent) -> String {
    serde_json::to_string_pretty(event).unwrap_or_else(|e| format!("<unserializable event: {e}>"))
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the type tag of each recorded event in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(LogEvent::kind)
            .collect()
    }

    /// Drops all recorded events.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for MemoryEventSink {
    fn record(&self, event: &LogEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
