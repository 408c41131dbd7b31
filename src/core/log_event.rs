//! Per-call log event

use super::error_info::ErrorInfo;
use super::log_value::LogValue;
use super::severity::Severity;
use super::template;

/// One logging call, as handed to a sink.
///
/// Borrowed from the caller for the duration of the call; the sink derives an
/// owned [`RenderedLogRecord`](super::record::RenderedLogRecord) from it only
/// when the severity is enabled.
#[derive(Debug, Clone, Copy)]
pub struct LogEvent<'a> {
    pub category: &'a str,
    pub severity: Severity,
    pub event_id: Option<i32>,
    pub template: &'a str,
    pub args: &'a [LogValue],
    pub error: Option<&'a ErrorInfo>,
}

impl<'a> LogEvent<'a> {
    pub fn new(category: &'a str, severity: Severity, template: &'a str) -> Self {
        Self {
            category,
            severity,
            event_id: None,
            template,
            args: &[],
            error: None,
        }
    }

    pub fn with_event_id(mut self, event_id: Option<i32>) -> Self {
        self.event_id = event_id;
        self
    }

    pub fn with_args(mut self, args: &'a [LogValue]) -> Self {
        self.args = args;
        self
    }

    pub fn with_error(mut self, error: Option<&'a ErrorInfo>) -> Self {
        self.error = error;
        self
    }

    /// Substitute the arguments into the template
    pub fn render_message(&self) -> String {
        template::render(self.template, self.args)
    }
}
