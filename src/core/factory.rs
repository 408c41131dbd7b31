//! Category-to-sink registry
//!
//! The factory is the composition root of the sink: it owns the shared
//! destination and threshold and hands out one [`EventSink`] per category.
//! It is passed explicitly to whatever needs to log; there is no global
//! registration.

use super::{
    config::SinkConfig, destination::Destination, error::Result, metrics::SinkMetrics,
    severity::Severity, sink::EventSink,
};
use crate::destinations::FanOut;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub struct SinkFactory {
    minimum_severity: Severity,
    destination: Arc<dyn Destination>,
    metrics: Option<Arc<SinkMetrics>>,
    sinks: RwLock<HashMap<String, Arc<EventSink>>>,
}

impl SinkFactory {
    pub fn new(minimum_severity: Severity, destination: Arc<dyn Destination>) -> Self {
        Self {
            minimum_severity,
            destination,
            metrics: None,
            sinks: RwLock::new(HashMap::new()),
        }
    }

    /// Sinks writing through `fanout`, whose metrics the factory exposes
    pub fn from_fanout(minimum_severity: Severity, fanout: FanOut) -> Self {
        let metrics = fanout.metrics_handle();
        let mut factory = Self::new(minimum_severity, Arc::new(fanout));
        factory.metrics = Some(metrics);
        factory
    }

    /// File destination then table destination, as described by `config`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use log_fanout::prelude::*;
    ///
    /// let config = SinkConfig::from_file("sink.toml")?;
    /// let factory = SinkFactory::from_config(&config)?;
    ///
    /// let sink = factory.create_sink("TestController");
    /// sink.information("The endpoint was reached successfully.", &[]);
    /// # Ok::<(), SinkError>(())
    /// ```
    pub fn from_config(config: &SinkConfig) -> Result<Self> {
        let fanout = FanOut::builder().config_destinations(config)?.build();
        Ok(Self::from_fanout(config.minimum_severity, fanout))
    }

    /// The sink for `category`, created on first use
    ///
    /// Sinks are cached for the life of the factory and never evicted, so
    /// categories are expected to be a bounded set such as type or module
    /// names, not per-request strings.
    pub fn create_sink(&self, category: &str) -> Arc<EventSink> {
        if let Some(sink) = self.sinks.read().get(category) {
            return Arc::clone(sink);
        }

        let mut sinks = self.sinks.write();
        let sink = sinks.entry(category.to_string()).or_insert_with(|| {
            Arc::new(EventSink::new(
                category,
                self.minimum_severity,
                Arc::clone(&self.destination),
            ))
        });
        Arc::clone(sink)
    }

    pub fn minimum_severity(&self) -> Severity {
        self.minimum_severity
    }

    pub fn destination(&self) -> &Arc<dyn Destination> {
        &self.destination
    }

    /// Delivery metrics when the factory was built over a [`FanOut`]
    pub fn metrics(&self) -> Option<&SinkMetrics> {
        self.metrics.as_deref()
    }

    /// Categories that have a sink, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.sinks.read().keys().cloned().collect();
        categories.sort();
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogSink, RenderedLogRecord};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CapturingDestination {
        categories: Mutex<Vec<String>>,
    }

    impl Destination for CapturingDestination {
        fn write(&self, record: &RenderedLogRecord) -> Result<()> {
            self.categories.lock().push(record.category.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "capturing"
        }
    }

    #[test]
    fn test_one_sink_per_category() {
        let factory = SinkFactory::new(Severity::Information, Arc::new(CapturingDestination::default()));

        let first = factory.create_sink("Orders");
        let again = factory.create_sink("Orders");
        let other = factory.create_sink("Payments");

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(first.category(), "Orders");
        assert_eq!(factory.categories(), vec!["Orders", "Payments"]);
    }

    #[test]
    fn test_sinks_share_threshold_and_destination() {
        let destination = Arc::new(CapturingDestination::default());
        let factory = SinkFactory::new(Severity::Warning, destination.clone());

        factory.create_sink("a").information("filtered", &[]);
        factory.create_sink("b").warning("kept", &[]);
        factory.create_sink("c").critical("kept", &[]);

        assert_eq!(*destination.categories.lock(), vec!["b", "c"]);
        assert_eq!(factory.create_sink("a").minimum_severity(), Severity::Warning);
    }

    #[test]
    fn test_from_config_exposes_metrics() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = SinkConfig::new(
            dir.path().join("logs.txt"),
            dir.path().join("logs.db").to_string_lossy(),
        );

        let factory = SinkFactory::from_config(&config)?;
        factory.create_sink("Startup").information("ready", &[]);

        let metrics = factory.metrics().expect("fan-out metrics");
        assert_eq!(metrics.delivered(), 1);
        assert_eq!(factory.destination().name(), "fanout");

        Ok(())
    }

    #[test]
    fn test_plain_destination_has_no_metrics() {
        let factory = SinkFactory::new(Severity::Trace, Arc::new(CapturingDestination::default()));
        assert!(factory.metrics().is_none());
    }
}
