//! Caller-supplied errors attached to log events
//!
//! An `ErrorInfo` is data, not a failure of the sink: it is captured at the
//! call site and rendered into the `Exception` column of the table.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    kind: Option<String>,
    message: String,
    trace: Option<String>,
    cause: Option<Box<ErrorInfo>>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: None,
            message: message.into(),
            trace: None,
            cause: None,
        }
    }

    /// Capture an error, its `source()` chain, and a backtrace when
    /// `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE` enable one.
    pub fn from_error<E: StdError + 'static>(error: &E) -> Self {
        let mut info = Self::from_dyn(error);
        info.kind = Some(std::any::type_name::<E>().to_string());
        info.trace = capture_trace();
        info
    }

    /// Capture a type-erased error and its `source()` chain
    pub fn from_dyn(error: &(dyn StdError + 'static)) -> Self {
        Self {
            kind: None,
            message: error.to_string(),
            trace: None,
            cause: error.source().map(|source| Box::new(Self::from_dyn(source))),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    #[must_use]
    pub fn with_cause(mut self, cause: ErrorInfo) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn cause(&self) -> Option<&ErrorInfo> {
        self.cause.as_deref()
    }

    /// Full description: the headline, one ` ---> ` line per cause, then the
    /// innermost-first trace text of every level that carries one.
    pub fn full_description(&self) -> String {
        let mut out = self.headline();

        let mut cause = self.cause.as_deref();
        while let Some(inner) = cause {
            out.push_str("\n ---> ");
            out.push_str(&inner.headline());
            cause = inner.cause.as_deref();
        }

        let mut traces = Vec::new();
        let mut level = Some(self);
        while let Some(info) = level {
            if let Some(trace) = info.trace.as_deref().filter(|t| !t.trim().is_empty()) {
                traces.push(trace.trim_end());
            }
            level = info.cause.as_deref();
        }
        for trace in traces.into_iter().rev() {
            out.push('\n');
            out.push_str(trace);
        }

        out
    }

    fn headline(&self) -> String {
        match &self.kind {
            Some(kind) => format!("{}: {}", kind, self.message),
            None => self.message.clone(),
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_description())
    }
}

fn capture_trace() -> Option<String> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}
