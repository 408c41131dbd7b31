//! Stress tests for concurrent callers
//!
//! These tests verify:
//! - Concurrent events across categories each produce exactly one intact line
//! - Every concurrent event produces exactly one row, with no duplicates
//! - The pooled connection factory behaves the same under contention

use log_fanout::prelude::*;
use rusqlite::Connection;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 100;

fn hammer(factory: Arc<SinkFactory>) {
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let factory = Arc::clone(&factory);
            thread::spawn(move || {
                let sink = factory.create_sink(&format!("Worker{}", i % 10));
                sink.information(
                    "Request {id} handled by thread {thread}",
                    &[LogValue::from(i), LogValue::from(format!("t{}", i))],
                );
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
}

fn assert_intact(file_path: &Path, db_path: &str) {
    let content = fs::read_to_string(file_path).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), THREADS);

    let mut seen = HashSet::new();
    for line in &lines {
        assert!(line.contains(" [Information] Worker"), "mangled line: {}", line);
        let message = line.split(": ").nth(1).expect("line has a message");
        assert!(seen.insert(message.to_string()), "duplicate line: {}", line);
    }

    let conn = Connection::open(db_path).expect("Failed to open database");
    let rows = StoredLogEntry::load_all(&conn).expect("Failed to load rows");
    assert_eq!(rows.len(), THREADS);

    let ids: HashSet<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), THREADS);

    let messages: HashSet<&str> = rows.iter().filter_map(|r| r.message.as_deref()).collect();
    assert_eq!(messages.len(), THREADS);
    for i in 0..THREADS {
        let expected = format!("Request {} handled by thread t{}", i, i);
        assert!(messages.contains(expected.as_str()), "missing row: {}", expected);
        assert!(seen.contains(&expected), "missing line: {}", expected);
    }
}

#[test]
fn test_concurrent_callers_fresh_connections() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("stress.txt");
    let db_path = temp_dir.path().join("stress.db").to_string_lossy().into_owned();

    // Generous timeout: 100 writers queue on the same database lock
    let config = SinkConfig::new(&file_path, db_path.clone())
        .with_busy_timeout(std::time::Duration::from_secs(30));
    let factory = Arc::new(SinkFactory::from_config(&config).expect("Failed to build factory"));

    hammer(Arc::clone(&factory));

    assert_intact(&file_path, &db_path);
    let metrics = factory.metrics().expect("fan-out metrics");
    assert_eq!(metrics.delivered(), THREADS as u64);
    assert_eq!(metrics.destination_failures(), 0);
    assert_eq!(factory.categories().len(), 10);
}

#[test]
fn test_concurrent_callers_pooled_connections() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("pooled.txt");
    let db_path = temp_dir.path().join("pooled.db").to_string_lossy().into_owned();

    let config = SinkConfig::new(&file_path, db_path.clone())
        .with_busy_timeout(std::time::Duration::from_secs(30))
        .with_pool_size(4);
    let factory = Arc::new(SinkFactory::from_config(&config).expect("Failed to build factory"));

    hammer(Arc::clone(&factory));

    assert_intact(&file_path, &db_path);
    assert_eq!(factory.metrics().map(|m| m.lost()), Some(0));
}

#[test]
fn test_disabled_events_under_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("filtered.txt");
    let db_path = temp_dir.path().join("filtered.db").to_string_lossy().into_owned();

    let config = SinkConfig::new(&file_path, db_path.clone())
        .with_minimum_severity(Severity::Critical);
    let factory = Arc::new(SinkFactory::from_config(&config).expect("Failed to build factory"));

    hammer(Arc::clone(&factory));

    assert!(!file_path.exists() || fs::read_to_string(&file_path).unwrap().is_empty());
    let conn = Connection::open(&db_path).expect("Failed to open database");
    assert!(StoredLogEntry::load_all(&conn).expect("Failed to load rows").is_empty());
    assert_eq!(factory.metrics().map(|m| m.delivered()), Some(0));
}
