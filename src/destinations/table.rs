//! Relational table destination
//!
//! Records are inserted into an append-only `LogEntries` table:
//!
//! | Column        | Type                                |
//! |---------------|-------------------------------------|
//! | `Id`          | `INTEGER PRIMARY KEY AUTOINCREMENT` |
//! | `Category`    | `TEXT NULL`                         |
//! | `Message`     | `TEXT NULL`                         |
//! | `LogLevel`    | `TEXT NOT NULL`                     |
//! | `EventId`     | `INTEGER NULL`                      |
//! | `Exception`   | `TEXT NULL`                         |
//! | `CreatedTime` | `TEXT NOT NULL` (local time)        |
//!
//! Every write acquires its own connection through a [`ConnectionFactory`]
//! and releases it before returning. In-memory databases only exist per
//! connection, so they are only accepted by [`PooledConnectionFactory`].

use super::file::ensure_parent_dir;
use crate::core::config::is_in_memory_path;
use crate::core::{DatabaseConfig, Destination, RenderedLogRecord, Result, SinkError};
use chrono::{Local, NaiveDateTime, SubsecRound};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const TABLE_NAME: &str = "LogEntries";

/// Storage layout of `CreatedTime`: `2025-01-08 10:30:45.123`
pub const CREATED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS LogEntries (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    Category TEXT NULL,
    Message TEXT NULL,
    LogLevel TEXT NOT NULL,
    EventId INTEGER NULL,
    Exception TEXT NULL,
    CreatedTime TEXT NOT NULL
)";

const INSERT_SQL: &str = "INSERT INTO LogEntries \
    (Category, Message, LogLevel, EventId, Exception, CreatedTime) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const SELECT_ALL_SQL: &str = "SELECT Id, Category, Message, LogLevel, EventId, Exception, CreatedTime \
    FROM LogEntries ORDER BY Id";

/// Scoped access to a database connection.
///
/// The connection handed to `f` belongs to this call alone and is released
/// when `f` returns, fails, or unwinds.
pub trait ConnectionFactory: Send + Sync {
    fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>;
}

/// Opens a fresh connection for every write and closes it afterwards
#[derive(Debug, Clone)]
pub struct SqliteConnectionFactory {
    path: String,
    busy_timeout: Duration,
}

impl SqliteConnectionFactory {
    /// Fails for in-memory paths: every write would see an empty database
    pub fn new(path: impl Into<String>, busy_timeout: Duration) -> Result<Self> {
        let path = path.into();
        if is_in_memory_path(&path) {
            return Err(SinkError::config(
                "SqliteConnectionFactory",
                "an in-memory database needs a pooled connection factory",
            ));
        }
        Ok(Self { path, busy_timeout })
    }

    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let factory = Self::new(config.path.clone(), config.busy_timeout())?;
        ensure_parent_dir(Path::new(&config.path))?;
        Ok(factory)
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl ConnectionFactory for SqliteConnectionFactory {
    fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        f(&mut conn)
    }
}

/// Checks a connection out of an `r2d2` pool for each write.
///
/// A checked-out connection is exclusive to one write and goes back to the
/// pool when the write finishes. Every connection the pool opens gets the
/// busy timeout and the `LogEntries` table before it is handed out.
#[derive(Clone)]
pub struct PooledConnectionFactory {
    pool: r2d2::Pool<SqliteConnectionManager>,
}

impl PooledConnectionFactory {
    pub fn new(path: impl AsRef<Path>, busy_timeout: Duration, max_size: u32) -> Result<Self> {
        let in_memory = is_in_memory_path(&path.as_ref().to_string_lossy());
        let manager = SqliteConnectionManager::file(path)
            .with_init(move |conn| init_connection(conn, busy_timeout));

        let mut builder = r2d2::Pool::builder().max_size(max_size);
        if in_memory {
            // Reaping the connection would drop the database with it
            builder = builder.idle_timeout(None).max_lifetime(None);
        }
        let pool = builder.build(manager)?;
        Ok(Self { pool })
    }

    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let max_size = config
            .pool_size
            .ok_or_else(|| SinkError::config("DatabaseConfig", "pool_size is not set"))?;
        if !config.is_in_memory() {
            ensure_parent_dir(Path::new(&config.path))?;
        }
        Self::new(&config.path, config.busy_timeout(), max_size)
    }

    pub fn max_size(&self) -> u32 {
        self.pool.max_size()
    }

    /// How long an unused connection is kept; `None` keeps it forever
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.pool.idle_timeout()
    }

    pub fn max_lifetime(&self) -> Option<Duration> {
        self.pool.max_lifetime()
    }
}

impl ConnectionFactory for PooledConnectionFactory {
    fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.pool.get()?;
        f(&mut conn)
    }
}

/// One persisted row of the `LogEntries` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLogEntry {
    pub id: i64,
    pub category: Option<String>,
    pub message: Option<String>,
    pub log_level: String,
    pub event_id: Option<i32>,
    pub exception: Option<String>,
    pub created_time: NaiveDateTime,
}

impl StoredLogEntry {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let created_time: String = row.get(6)?;
        let created_time = NaiveDateTime::parse_from_str(&created_time, CREATED_TIME_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

        Ok(Self {
            id: row.get(0)?,
            category: row.get(1)?,
            message: row.get(2)?,
            log_level: row.get(3)?,
            event_id: row.get(4)?,
            exception: row.get(5)?,
            created_time,
        })
    }

    /// Every stored entry, oldest first
    pub fn load_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(SELECT_ALL_SQL)?;
        let entries = stmt
            .query_map([], Self::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

/// Writes each record as one row, committed in its own transaction
pub struct TableDestination<F = SqliteConnectionFactory> {
    factory: F,
}

impl TableDestination<SqliteConnectionFactory> {
    /// Fresh connection per write against a SQLite file
    pub fn open(path: impl Into<String>, busy_timeout: Duration) -> Result<Self> {
        Self::new(SqliteConnectionFactory::new(path, busy_timeout)?)
    }
}

impl<F: ConnectionFactory> TableDestination<F> {
    /// Wrap `factory`, creating the table if it does not exist yet
    pub fn new(factory: F) -> Result<Self> {
        factory.with_connection(ensure_schema)?;
        Ok(Self { factory })
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Insert `record` and return the row as stored
    pub fn insert(&self, record: &RenderedLogRecord) -> Result<StoredLogEntry> {
        self.factory.with_connection(|conn| {
            let created_time = Local::now().naive_local().trunc_subsecs(3);
            let log_level = record.severity.as_str();

            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute(
                INSERT_SQL,
                params![
                    record.category,
                    record.message,
                    log_level,
                    record.event_id,
                    record.error_text,
                    created_time.format(CREATED_TIME_FORMAT).to_string(),
                ],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;

            Ok(StoredLogEntry {
                id,
                category: Some(record.category.clone()),
                message: Some(record.message.clone()),
                log_level: log_level.to_string(),
                event_id: record.event_id,
                exception: record.error_text.clone(),
                created_time,
            })
        })
    }
}

impl<F: ConnectionFactory> Destination for TableDestination<F> {
    fn write(&self, record: &RenderedLogRecord) -> Result<()> {
        self.insert(record).map(|_| ())
    }

    fn name(&self) -> &str {
        "table"
    }
}

fn init_connection(conn: &mut Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    conn.execute_batch(CREATE_TABLE_SQL)
}

fn ensure_schema(conn: &mut Connection) -> Result<()> {
    // WAL lets readers proceed while a writer holds the lock; in-memory
    // databases answer "memory" and stay as they are.
    let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use tempfile::tempdir;

    fn db_path(dir: &tempfile::TempDir) -> String {
        dir.path().join("logs.db").to_string_lossy().into_owned()
    }

    #[test]
    fn test_insert_round_trips_fields() -> Result<()> {
        let dir = tempdir()?;
        let path = db_path(&dir);
        let table = TableDestination::open(&path, Duration::from_secs(5))?;

        let record = RenderedLogRecord::new(Severity::Warning, "TestController", "slow upstream")
            .with_event_id(1000)
            .with_error_text("Timeout: upstream did not answer");
        let stored = table.insert(&record)?;

        let conn = Connection::open(&path)?;
        let entries = StoredLogEntry::load_all(&conn)?;
        assert_eq!(entries, vec![stored]);

        let entry = &entries[0];
        assert_eq!(entry.category.as_deref(), Some("TestController"));
        assert_eq!(entry.message.as_deref(), Some("slow upstream"));
        assert_eq!(entry.log_level, "Warning");
        assert_eq!(entry.event_id, Some(1000));
        assert_eq!(
            entry.exception.as_deref(),
            Some("Timeout: upstream did not answer")
        );

        Ok(())
    }

    #[test]
    fn test_optional_columns_are_null() -> Result<()> {
        let dir = tempdir()?;
        let path = db_path(&dir);
        let table = TableDestination::open(&path, Duration::from_secs(5))?;

        table.write(&RenderedLogRecord::new(Severity::Information, "api", "ok"))?;

        let conn = Connection::open(&path)?;
        let (event_id, exception): (Option<i32>, Option<String>) = conn.query_row(
            "SELECT EventId, Exception FROM LogEntries",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        assert_eq!(event_id, None);
        assert_eq!(exception, None);

        Ok(())
    }

    #[test]
    fn test_ids_are_unique_and_increasing() -> Result<()> {
        let dir = tempdir()?;
        let table = TableDestination::open(db_path(&dir), Duration::from_secs(5))?;

        let first = table.insert(&RenderedLogRecord::new(Severity::Debug, "a", "one"))?;
        let second = table.insert(&RenderedLogRecord::new(Severity::Debug, "a", "two"))?;
        assert!(second.id > first.id);

        Ok(())
    }

    #[test]
    fn test_missing_table_fails_and_rolls_back() -> Result<()> {
        let dir = tempdir()?;
        let path = db_path(&dir);
        let table = TableDestination::open(&path, Duration::from_secs(5))?;

        Connection::open(&path)?.execute_batch("DROP TABLE LogEntries")?;

        let err = table
            .write(&RenderedLogRecord::new(Severity::Error, "api", "lost"))
            .unwrap_err();
        assert!(matches!(err, SinkError::DatabaseError(_)));

        Ok(())
    }

    #[test]
    fn test_unopenable_database_fails_at_construction() {
        let result = TableDestination::open("/nonexistent/dir/logs.db", Duration::from_secs(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_pooled_factory() -> Result<()> {
        let dir = tempdir()?;
        let config = DatabaseConfig {
            path: db_path(&dir),
            pool_size: Some(2),
            ..DatabaseConfig::default()
        };
        let factory = PooledConnectionFactory::from_config(&config)?;
        assert_eq!(factory.max_size(), 2);

        let table = TableDestination::new(factory)?;
        for i in 0..5 {
            table.write(&RenderedLogRecord::new(Severity::Information, "pool", format!("m{}", i)))?;
        }

        let count: i64 = table
            .factory()
            .with_connection(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM LogEntries", [], |row| row.get(0))?))?;
        assert_eq!(count, 5);

        Ok(())
    }

    #[test]
    fn test_pooled_in_memory_database() -> Result<()> {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
            pool_size: Some(1),
            ..DatabaseConfig::default()
        };
        let table = TableDestination::new(PooledConnectionFactory::from_config(&config)?)?;
        table.write(&RenderedLogRecord::new(Severity::Information, "mem", "kept"))?;

        let entries = table.factory().with_connection(|conn| StoredLogEntry::load_all(conn))?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message.as_deref(), Some("kept"));

        assert_eq!(table.factory().idle_timeout(), None);
        assert_eq!(table.factory().max_lifetime(), None);

        Ok(())
    }

    #[test]
    fn test_every_pooled_connection_has_the_table() -> Result<()> {
        // Each in-memory connection is its own database
        let factory = PooledConnectionFactory::new(":memory:", Duration::from_secs(5), 2)?;
        let table = TableDestination::new(factory)?;

        // Holding one connection forces the write onto the other one
        table.factory().with_connection(|_held| {
            table.write(&RenderedLogRecord::new(Severity::Information, "mem", "second connection"))
        })?;

        Ok(())
    }

    #[test]
    fn test_file_pool_keeps_default_reaping() -> Result<()> {
        let dir = tempdir()?;
        let factory = PooledConnectionFactory::new(db_path(&dir), Duration::from_secs(5), 1)?;
        assert!(factory.idle_timeout().is_some());
        Ok(())
    }

    #[test]
    fn test_in_memory_requires_pool() {
        let err = TableDestination::open(":memory:", Duration::from_secs(1)).err().unwrap();
        assert!(matches!(err, SinkError::InvalidConfiguration { .. }));

        let err = SqliteConnectionFactory::new("file:logs?mode=memory", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, SinkError::InvalidConfiguration { .. }));
    }
}
