//! Destination trait for log persistence targets

use super::{error::Result, record::RenderedLogRecord};

/// A persistence target for rendered records.
///
/// `write` takes `&self`: destinations are shared by every sink and called
/// concurrently, so any per-write resource (file handle, connection) is
/// acquired and released inside the call.
pub trait Destination: Send + Sync {
    fn write(&self, record: &RenderedLogRecord) -> Result<()>;
    fn name(&self) -> &str;
}
