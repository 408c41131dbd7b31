//! # log_fanout
//!
//! A synchronous structured-logging sink. Each accepted event is rendered
//! once and persisted to two independent destinations: an append-only text
//! file and a relational log table.
//!
//! ## Features
//!
//! - **Severity filtering**: disabled events cost one comparison, no rendering
//! - **Message templates**: named, indexed, and structured (`{@value}`) holes
//! - **Isolated destinations**: a failing file or table write never blocks the
//!   other one and never reaches the caller
//! - **Thread safe**: no writer state is shared between calls
//!
//! ## Example
//!
//! ```no_run
//! use log_fanout::prelude::*;
//! use log_fanout::information;
//!
//! let config = SinkConfig::new("Logs/logs.txt", "Logs/logs.db");
//! let factory = SinkFactory::from_config(&config)?;
//!
//! let sink = factory.create_sink("TestController");
//! information!(sink, "Calculation value is {calculation}", 5 * 10);
//! # Ok::<(), SinkError>(())
//! ```

pub mod core;
pub mod destinations;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        DatabaseConfig, Destination, ErrorInfo, EventSink, LogEvent, LogSink, LogValue,
        MessageTemplate, RenderedLogRecord, Result, ScopeGuard, Severity, SinkConfig, SinkError,
        SinkFactory, SinkMetrics,
    };
    pub use crate::destinations::{
        ConnectionFactory, DeliveryReport, FailureCallback, FanOut, FanOutBuilder,
        FileDestination, PooledConnectionFactory, SqliteConnectionFactory, StoredLogEntry,
        TableDestination,
    };
}

pub use crate::core::{
    DatabaseConfig, Destination, ErrorInfo, EventSink, LogEvent, LogSink, LogValue,
    MessageTemplate, RenderedLogRecord, Result, ScopeGuard, Severity, SinkConfig, SinkError,
    SinkFactory, SinkMetrics,
};
pub use destinations::{
    ConnectionFactory, DeliveryReport, FailureCallback, FanOut, FanOutBuilder, FileDestination,
    PooledConnectionFactory, SqliteConnectionFactory, StoredLogEntry, TableDestination,
};
