//! Logging macros for ergonomic call sites.
//!
//! The macros check [`LogSink::is_enabled`](crate::LogSink::is_enabled)
//! first, so arguments are only converted into [`LogValue`](crate::LogValue)s
//! and errors only captured when the event will actually be written.
//!
//! # Examples
//!
//! ```
//! use log_fanout::prelude::*;
//! use log_fanout::{information, warning};
//! # use std::sync::Arc;
//! # struct Discard;
//! # impl Destination for Discard {
//! #     fn write(&self, _: &RenderedLogRecord) -> Result<()> { Ok(()) }
//! #     fn name(&self) -> &str { "discard" }
//! # }
//! # let factory = SinkFactory::new(Severity::Information, Arc::new(Discard));
//!
//! let sink = factory.create_sink("TestController");
//!
//! // Plain message
//! information!(sink, "The endpoint was reached successfully.");
//!
//! // Template arguments, filled in order
//! let calculation = 5 * 10;
//! information!(sink, "Calculation value is {calculation}", calculation);
//!
//! // With an event id
//! warning!(sink, id = 1000, "External API taking {seconds}s to respond", 12);
//! ```

/// Log an event at an explicit severity.
///
/// Accepts optional `id = <i32>` and `err = <error>` prefixes (in that order)
/// before the template. The error must implement `std::error::Error + 'static`.
///
/// # Examples
///
/// ```
/// # use log_fanout::prelude::*;
/// # use std::sync::Arc;
/// # struct Discard;
/// # impl Destination for Discard {
/// #     fn write(&self, _: &RenderedLogRecord) -> Result<()> { Ok(()) }
/// #     fn name(&self) -> &str { "discard" }
/// # }
/// # let sink = EventSink::new("demo", Severity::Trace, Arc::new(Discard));
/// use log_fanout::log;
///
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "disk unplugged");
///
/// log!(sink, Severity::Information, "Simple message");
/// log!(sink, Severity::Error, "Error code: {code}", 500);
/// log!(sink, Severity::Error, err = err, "Write failed for {path}", "/tmp/x");
/// log!(sink, Severity::Warning, id = 7, err = err, "Retrying");
/// ```
#[macro_export]
macro_rules! log {
    ($sink:expr, $severity:expr, id = $id:expr, err = $err:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        use $crate::LogSink as _;
        let sink = &$sink;
        let severity = $severity;
        if sink.is_enabled(severity) {
            let error = $crate::ErrorInfo::from_error(&$err);
            sink.log(
                severity,
                ::core::option::Option::Some($id),
                $template,
                &[$($crate::LogValue::from($arg)),*],
                ::core::option::Option::Some(&error),
            );
        }
    }};
    ($sink:expr, $severity:expr, id = $id:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        use $crate::LogSink as _;
        let sink = &$sink;
        let severity = $severity;
        if sink.is_enabled(severity) {
            sink.log(
                severity,
                ::core::option::Option::Some($id),
                $template,
                &[$($crate::LogValue::from($arg)),*],
                ::core::option::Option::None,
            );
        }
    }};
    ($sink:expr, $severity:expr, err = $err:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        use $crate::LogSink as _;
        let sink = &$sink;
        let severity = $severity;
        if sink.is_enabled(severity) {
            let error = $crate::ErrorInfo::from_error(&$err);
            sink.log(
                severity,
                ::core::option::Option::None,
                $template,
                &[$($crate::LogValue::from($arg)),*],
                ::core::option::Option::Some(&error),
            );
        }
    }};
    ($sink:expr, $severity:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        use $crate::LogSink as _;
        let sink = &$sink;
        let severity = $severity;
        if sink.is_enabled(severity) {
            sink.log(
                severity,
                ::core::option::Option::None,
                $template,
                &[$($crate::LogValue::from($arg)),*],
                ::core::option::Option::None,
            );
        }
    }};
}

/// Log a trace-level event.
///
/// # Examples
///
/// ```
/// # use log_fanout::prelude::*;
/// # use std::sync::Arc;
/// # struct Discard;
/// # impl Destination for Discard {
/// #     fn write(&self, _: &RenderedLogRecord) -> Result<()> { Ok(()) }
/// #     fn name(&self) -> &str { "discard" }
/// # }
/// # let sink = EventSink::new("demo", Severity::Trace, Arc::new(Discard));
/// use log_fanout::trace;
/// trace!(sink, "Entering function: calculate()");
/// trace!(sink, "Variable value: {value}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($sink:expr, $($arg:tt)+) => {
        $crate::log!($sink, $crate::Severity::Trace, $($arg)+)
    };
}

/// Log a debug-level event.
#[macro_export]
macro_rules! debug {
    ($sink:expr, $($arg:tt)+) => {
        $crate::log!($sink, $crate::Severity::Debug, $($arg)+)
    };
}

/// Log an information-level event.
#[macro_export]
macro_rules! information {
    ($sink:expr, $($arg:tt)+) => {
        $crate::log!($sink, $crate::Severity::Information, $($arg)+)
    };
}

/// Log a warning-level event.
#[macro_export]
macro_rules! warning {
    ($sink:expr, $($arg:tt)+) => {
        $crate::log!($sink, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log an error-level event.
///
/// # Examples
///
/// ```
/// # use log_fanout::prelude::*;
/// # use std::sync::Arc;
/// # struct Discard;
/// # impl Destination for Discard {
/// #     fn write(&self, _: &RenderedLogRecord) -> Result<()> { Ok(()) }
/// #     fn name(&self) -> &str { "discard" }
/// # }
/// # let sink = EventSink::new("demo", Severity::Trace, Arc::new(Discard));
/// use log_fanout::error;
///
/// let parse_failure = "x".parse::<i32>().unwrap_err();
/// error!(sink, err = parse_failure, "Could not parse {input}", "x");
/// ```
#[macro_export]
macro_rules! error {
    ($sink:expr, $($arg:tt)+) => {
        $crate::log!($sink, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a critical-level event.
#[macro_export]
macro_rules! critical {
    ($sink:expr, $($arg:tt)+) => {
        $crate::log!($sink, $crate::Severity::Critical, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Destination, EventSink, RenderedLogRecord, Result, Severity};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CapturingDestination {
        records: Mutex<Vec<RenderedLogRecord>>,
    }

    impl Destination for CapturingDestination {
        fn write(&self, record: &RenderedLogRecord) -> Result<()> {
            self.records.lock().push(record.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "capturing"
        }
    }

    fn sink(min: Severity) -> (EventSink, Arc<CapturingDestination>) {
        let destination = Arc::new(CapturingDestination::default());
        (EventSink::new("macros", min, destination.clone()), destination)
    }

    #[test]
    fn test_severity_macros() {
        let (sink, destination) = sink(Severity::Trace);

        trace!(sink, "t");
        debug!(sink, "d");
        information!(sink, "i");
        warning!(sink, "w");
        error!(sink, "e");
        critical!(sink, "c");

        let severities: Vec<Severity> = destination.records.lock().iter().map(|r| r.severity).collect();
        assert_eq!(severities, Severity::ALL.to_vec());
    }

    #[test]
    fn test_arguments_and_event_id() {
        let (sink, destination) = sink(Severity::Trace);

        information!(sink, id = 1000, "{a} + {b} = {sum}", 2, 3, 2 + 3,);

        let records = destination.records.lock();
        assert_eq!(records[0].message, "2 + 3 = 5");
        assert_eq!(records[0].event_id, Some(1000));
    }

    #[test]
    fn test_error_prefix() {
        let (sink, destination) = sink(Severity::Trace);
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing config");

        error!(sink, err = err, "Startup failed");
        critical!(sink, id = 9, err = err, "Giving up after {attempts} attempts", 3);

        let records = destination.records.lock();
        assert_eq!(records[0].message, "Startup failed");
        assert!(records[0].error_text.as_deref().unwrap().contains("missing config"));
        assert_eq!(records[1].event_id, Some(9));
        assert_eq!(records[1].message, "Giving up after 3 attempts");
    }

    #[test]
    fn test_disabled_skips_argument_evaluation() {
        let (sink, destination) = sink(Severity::Warning);
        let evaluations = AtomicUsize::new(0);
        let expensive = || {
            evaluations.fetch_add(1, Ordering::Relaxed);
            "expensive"
        };

        debug!(sink, "value {v}", expensive());
        warning!(sink, "value {v}", expensive());

        assert_eq!(evaluations.load(Ordering::Relaxed), 1);
        assert_eq!(destination.records.lock().len(), 1);
    }
}
