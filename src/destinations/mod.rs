//! Destination implementations

pub mod fanout;
pub mod file;
pub mod table;

pub use fanout::{DeliveryReport, DestinationOutcome, FailureCallback, FanOut, FanOutBuilder};
pub use file::FileDestination;
pub use table::{
    ConnectionFactory, PooledConnectionFactory, SqliteConnectionFactory, StoredLogEntry,
    TableDestination,
};

pub use crate::core::Destination;
