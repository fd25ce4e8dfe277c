//! Log event sink port

use apiprobe_domain::LogEvent;

/// Destination for structured log events.
///
/// Sinks must not affect control flow; recording never fails from the
/// caller's point of view.
pub trait EventSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: &LogEvent);
}
