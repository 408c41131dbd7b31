//! Emits one event per severity, then one with an attached error.
//!
//! Run with `cargo run --example log_all_levels [config.toml]`. Without a
//! config file the default paths (`Logs/logs.txt`, `Logs/logs.db`) are used.

use log_fanout::prelude::*;
use log_fanout::{critical, debug, error, information, trace, warning};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
#[error("Attempted to divide by zero.")]
struct DivideByZero;

#[derive(Serialize)]
struct DebugInfo {
    key: &'static str,
    value: i32,
}

fn divide(numerator: i32, denominator: i32) -> std::result::Result<i32, DivideByZero> {
    numerator.checked_div(denominator).ok_or(DivideByZero)
}

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => SinkConfig::from_file(path)?,
        None => SinkConfig::default(),
    };

    let factory = SinkFactory::from_config(&config)?;
    let sink = factory.create_sink("TestController");

    trace!(sink, "Entering the LogAllLevels endpoint.");

    let debug_info = DebugInfo { key: "SampleKey", value: 42 };
    debug!(sink, "Debug information: {@debugInfo}", LogValue::structured(&debug_info));

    information!(sink, "The LogAllLevels endpoint was reached successfully.");
    let calculation = 5 * 10;
    information!(sink, "Calculation value is {calculation}", calculation);

    warning!(sink, id = 1000, "External API response time is slow: {elapsedMs} ms", 1500);

    if let Err(e) = divide(10, 0) {
        error!(sink, err = e, "An error occurred while processing the request.");
    }

    critical!(sink, "Critical failure in the system! Immediate attention is required.");

    println!(
        "Logged at {} and above to {} and {}",
        config.minimum_severity,
        config.file_path.display(),
        config.database.path
    );
    if let Some(metrics) = factory.metrics() {
        println!(
            "delivered={} partial={} lost={} destination_failures={}",
            metrics.delivered(),
            metrics.partially_delivered(),
            metrics.lost(),
            metrics.destination_failures()
        );
    }

    Ok(())
}
