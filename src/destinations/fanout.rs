//! Fan-out to several independent destinations

use super::{FileDestination, PooledConnectionFactory, SqliteConnectionFactory, TableDestination};
use crate::core::{
    panic_message, Destination, RenderedLogRecord, Result, SinkConfig, SinkError, SinkMetrics,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Called once per failed destination with the destination name and the error
pub type FailureCallback = Arc<dyn Fn(&str, &SinkError) + Send + Sync>;

/// Result of writing one record to one destination
#[derive(Debug)]
pub struct DestinationOutcome {
    pub destination: String,
    pub result: Result<()>,
}

/// Per-destination results of one fan-out write
#[derive(Debug, Default)]
pub struct DeliveryReport {
    outcomes: Vec<DestinationOutcome>,
}

impl DeliveryReport {
    pub fn outcomes(&self) -> &[DestinationOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &SinkError)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(()) => None,
            Err(e) => Some((o.destination.as_str(), e)),
        })
    }

    /// Every destination accepted the record
    pub fn is_complete(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// No destination accepted the record
    pub fn is_lost(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| o.result.is_err())
    }

    pub fn outcome(&self, destination: &str) -> Option<&DestinationOutcome> {
        self.outcomes.iter().find(|o| o.destination == destination)
    }
}

/// Writes each record to every destination, in order.
///
/// Destinations are isolated from each other: an error or a panic in one is
/// caught at its boundary, reported, and the next destination is still
/// attempted. As a [`Destination`] the fan-out itself never fails.
pub struct FanOut {
    destinations: Vec<Arc<dyn Destination>>,
    metrics: Arc<SinkMetrics>,
    on_failure: Option<FailureCallback>,
}

impl FanOut {
    #[must_use]
    pub fn builder() -> FanOutBuilder {
        FanOutBuilder::new()
    }

    /// Write `record` to every destination and report each outcome
    pub fn deliver(&self, record: &RenderedLogRecord) -> DeliveryReport {
        let mut outcomes = Vec::with_capacity(self.destinations.len());

        for destination in &self.destinations {
            let name = destination.name().to_string();
            let result = match catch_unwind(AssertUnwindSafe(|| destination.write(record))) {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    self.metrics.record_destination_failure();
                    self.report_failure(&name, &e);
                    Err(e)
                }
                Err(panic_info) => {
                    self.metrics.record_destination_panic();
                    let e = SinkError::destination_panicked(&name, panic_message(&*panic_info));
                    self.report_failure(&name, &e);
                    Err(e)
                }
            };
            outcomes.push(DestinationOutcome {
                destination: name,
                result,
            });
        }

        let report = DeliveryReport { outcomes };
        if report.is_complete() {
            self.metrics.record_delivered();
        } else if report.is_lost() {
            self.metrics.record_lost();
        } else if report.succeeded() > 0 {
            self.metrics.record_partially_delivered();
        }
        report
    }

    fn report_failure(&self, destination: &str, error: &SinkError) {
        if let Some(ref callback) = self.on_failure {
            callback(destination, error);
            return;
        }

        match error {
            SinkError::DestinationPanicked { .. } => eprintln!(
                "[SINK CRITICAL] {}. Other destinations continue to function.",
                error
            ),
            _ => eprintln!("[SINK ERROR] Destination '{}' failed: {}", destination, error),
        }
    }

    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    /// Shared handle to the metrics, usable after the fan-out is moved into sinks
    pub fn metrics_handle(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn destination_names(&self) -> Vec<&str> {
        self.destinations.iter().map(|d| d.name()).collect()
    }
}

impl Destination for FanOut {
    fn write(&self, record: &RenderedLogRecord) -> Result<()> {
        self.deliver(record);
        Ok(())
    }

    fn name(&self) -> &str {
        "fanout"
    }
}

/// Builder for constructing a [`FanOut`]
///
/// # Example
/// ```no_run
/// use log_fanout::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let fanout = FanOut::builder()
///     .destination(FileDestination::new("Logs/logs.txt")?)
///     .destination(TableDestination::open("Logs/logs.db", Duration::from_secs(5))?)
///     .on_failure(Arc::new(|destination: &str, error: &SinkError| {
///         eprintln!("ALERT: {} failed: {}", destination, error);
///     }))
///     .build();
/// # Ok::<(), SinkError>(())
/// ```
pub struct FanOutBuilder {
    destinations: Vec<Arc<dyn Destination>>,
    on_failure: Option<FailureCallback>,
}

impl FanOutBuilder {
    pub fn new() -> Self {
        Self {
            destinations: Vec::new(),
            on_failure: None,
        }
    }

    /// Add a destination; destinations are written in the order they are added
    #[must_use = "builder methods return a new value"]
    pub fn destination<D: Destination + 'static>(mut self, destination: D) -> Self {
        self.destinations.push(Arc::new(destination));
        self
    }

    /// Add a destination that is also used elsewhere
    #[must_use = "builder methods return a new value"]
    pub fn shared_destination(mut self, destination: Arc<dyn Destination>) -> Self {
        self.destinations.push(destination);
        self
    }

    /// Add the file destination, then the table destination, described by `config`
    pub fn config_destinations(self, config: &SinkConfig) -> Result<Self> {
        config.validate()?;

        let builder = self.destination(FileDestination::new(&config.file_path)?);
        let builder = match config.database.pool_size {
            Some(_) => builder.destination(TableDestination::new(
                PooledConnectionFactory::from_config(&config.database)?,
            )?),
            None => builder.destination(TableDestination::new(
                SqliteConnectionFactory::from_config(&config.database)?,
            )?),
        };
        Ok(builder)
    }

    /// Replace the default stderr diagnostics for failed destinations
    #[must_use = "builder methods return a new value"]
    pub fn on_failure(mut self, callback: FailureCallback) -> Self {
        self.on_failure = Some(callback);
        self
    }

    pub fn build(self) -> FanOut {
        FanOut {
            destinations: self.destinations,
            metrics: Arc::new(SinkMetrics::new()),
            on_failure: self.on_failure,
        }
    }
}

impl Default for FanOutBuilder {
    fn default() -> Self {
        Self::new()
    }
}
