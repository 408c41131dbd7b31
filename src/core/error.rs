//! Error types for the sink and its destinations

use std::any::Any;

pub type Result<T> = std::result::Result<T, SinkError>;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// SQLite error from the table destination
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File destination error with path
    #[error("File destination error for '{path}': {message}")]
    FileDestinationError { path: String, message: String },

    /// A destination panicked while writing
    #[error("Destination '{destination}' panicked: {message}")]
    DestinationPanicked {
        destination: String,
        message: String,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl SinkError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        SinkError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file destination error
    pub fn file_destination(path: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::FileDestinationError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn destination_panicked(destination: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::DestinationPanicked {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SinkError::Other(msg.into())
    }
}

/// Extract the message of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
