//! Core sink types and traits

pub mod config;
pub mod destination;
pub mod error;
pub mod error_info;
pub mod factory;
pub mod log_event;
pub mod log_value;
pub mod metrics;
pub mod record;
pub mod severity;
pub mod sink;
pub mod template;

pub use config::{DatabaseConfig, SinkConfig, DEFAULT_BUSY_TIMEOUT};
pub use destination::Destination;
pub use error::{Result, SinkError};
pub(crate) use error::panic_message;
pub use error_info::ErrorInfo;
pub use factory::SinkFactory;
pub use log_event::LogEvent;
pub use log_value::LogValue;
pub use metrics::SinkMetrics;
pub use record::RenderedLogRecord;
pub use severity::Severity;
pub use sink::{EventSink, LogSink, ScopeGuard};
pub use template::MessageTemplate;
