//! Rendered log record

use super::log_event::LogEvent;
use super::severity::Severity;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Timestamp layout of the file destination: `2025-01-08 10:30:45`
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An accepted event with its message fully rendered.
///
/// Created by the sink right after the enable check, consumed by the
/// destinations, then dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedLogRecord {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub category: String,
    pub message: String,
    pub event_id: Option<i32>,
    pub error_text: Option<String>,
}

impl RenderedLogRecord {
    pub fn new(severity: Severity, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            severity,
            category: category.into(),
            message: message.into(),
            event_id: None,
            error_text: None,
        }
    }

    /// Build the record for `event` from its already rendered message
    pub fn from_event(event: &LogEvent<'_>, message: String) -> Self {
        Self {
            timestamp: Local::now(),
            severity: event.severity,
            category: event.category.to_string(),
            message,
            event_id: event.event_id,
            error_text: event.error.map(|error| error.full_description()),
        }
    }

    #[must_use]
    pub fn with_event_id(mut self, event_id: i32) -> Self {
        self.event_id = Some(event_id);
        self
    }

    #[must_use]
    pub fn with_error_text(mut self, error_text: impl Into<String>) -> Self {
        self.error_text = Some(error_text.into());
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sanitize text for the line-oriented file format
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences so
    /// one record can never masquerade as several log lines.
    fn sanitize(text: &str) -> String {
        text.replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// `YYYY-MM-DD HH:MM:SS [Severity] Category: Message`, without terminator
    pub fn file_line(&self) -> String {
        format!(
            "{} [{}] {}: {}",
            self.timestamp.format(FILE_TIMESTAMP_FORMAT),
            self.severity,
            Self::sanitize(&self.category),
            Self::sanitize(&self.message)
        )
    }
}
