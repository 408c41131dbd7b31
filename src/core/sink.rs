//! Event sink: severity filtering and rendering in front of a destination

use super::{
    destination::Destination,
    error::panic_message,
    error_info::ErrorInfo,
    log_event::LogEvent,
    log_value::LogValue,
    record::RenderedLogRecord,
    severity::Severity,
};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Handle returned by [`LogSink::begin_scope`].
///
/// Scopes are not tracked; dropping the guard does nothing.
#[derive(Debug, Default)]
#[must_use = "a scope ends when its guard is dropped"]
pub struct ScopeGuard {
    _private: (),
}

/// The logging capability handed to application code.
///
/// `log` never fails and never panics because of the sink: anything that goes
/// wrong while persisting an event stays inside the sink.
pub trait LogSink: Send + Sync {
    /// Whether events of `severity` would be written
    fn is_enabled(&self, severity: Severity) -> bool;

    fn log(
        &self,
        severity: Severity,
        event_id: Option<i32>,
        template: &str,
        args: &[LogValue],
        error: Option<&ErrorInfo>,
    );

    /// Scopes are unsupported; the returned guard is inert
    fn begin_scope(&self, _state: &dyn fmt::Debug) -> ScopeGuard {
        ScopeGuard::default()
    }

    #[inline]
    fn trace(&self, template: &str, args: &[LogValue]) {
        self.log(Severity::Trace, None, template, args, None);
    }

    #[inline]
    fn debug(&self, template: &str, args: &[LogValue]) {
        self.log(Severity::Debug, None, template, args, None);
    }

    #[inline]
    fn information(&self, template: &str, args: &[LogValue]) {
        self.log(Severity::Information, None, template, args, None);
    }

    #[inline]
    fn warning(&self, template: &str, args: &[LogValue]) {
        self.log(Severity::Warning, None, template, args, None);
    }

    #[inline]
    fn error(&self, template: &str, args: &[LogValue]) {
        self.log(Severity::Error, None, template, args, None);
    }

    #[inline]
    fn critical(&self, template: &str, args: &[LogValue]) {
        self.log(Severity::Critical, None, template, args, None);
    }

    /// Log with an attached error
    fn log_error(&self, severity: Severity, error: &ErrorInfo, template: &str, args: &[LogValue]) {
        self.log(severity, None, template, args, Some(error));
    }
}

/// A sink bound to one category.
///
/// Holds nothing but its category, the threshold, and a shared destination,
/// so creating one per category is cheap and calls never affect each other.
#[derive(Clone)]
pub struct EventSink {
    category: String,
    minimum_severity: Severity,
    destination: Arc<dyn Destination>,
}

impl EventSink {
    pub fn new(
        category: impl Into<String>,
        minimum_severity: Severity,
        destination: Arc<dyn Destination>,
    ) -> Self {
        Self {
            category: category.into(),
            minimum_severity,
            destination,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn minimum_severity(&self) -> Severity {
        self.minimum_severity
    }

    /// Filter, render, and hand `event` to the destination
    pub fn log_event(&self, event: &LogEvent<'_>) {
        if !self.is_enabled(event.severity) {
            return;
        }

        let message = event.render_message();
        if message.is_empty() {
            return;
        }

        let record = RenderedLogRecord::from_event(event, message);
        let destination = &self.destination;

        match catch_unwind(AssertUnwindSafe(|| destination.write(&record))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!(
                    "[SINK ERROR] Destination '{}' failed for category '{}': {}",
                    destination.name(),
                    record.category,
                    e
                );
            }
            Err(panic_info) => {
                eprintln!(
                    "[SINK CRITICAL] Destination '{}' panicked for category '{}': {}",
                    destination.name(),
                    record.category,
                    panic_message(&*panic_info)
                );
            }
        }
    }
}

impl LogSink for EventSink {
    #[inline]
    fn is_enabled(&self, severity: Severity) -> bool {
        severity >= self.minimum_severity
    }

    fn log(
        &self,
        severity: Severity,
        event_id: Option<i32>,
        template: &str,
        args: &[LogValue],
        error: Option<&ErrorInfo>,
    ) {
        let event = LogEvent::new(&self.category, severity, template)
            .with_event_id(event_id)
            .with_args(args)
            .with_error(error);
        self.log_event(&event);
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink")
            .field("category", &self.category)
            .field("minimum_severity", &self.minimum_severity)
            .field("destination", &self.destination.name())
            .finish()
    }
}
