//! File destination implementation

use crate::core::{Destination, RenderedLogRecord, Result, SinkError};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends one line per record to a text file.
///
/// No handle is kept between writes: every call opens the file in append
/// mode, writes the whole line with a single `write_all`, and closes it, so
/// concurrent writers interleave whole lines.
#[derive(Debug, Clone)]
pub struct FileDestination {
    path: PathBuf,
}

impl FileDestination {
    /// Create the destination, creating missing parent directories
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(SinkError::file_destination("", "path must not be empty"));
        }
        ensure_parent_dir(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Destination for FileDestination {
    fn write(&self, record: &RenderedLogRecord) -> Result<()> {
        let mut line = record.file_line();
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                SinkError::io_operation(
                    "opening log file",
                    format!("cannot open '{}' for append", self.path.display()),
                    e,
                )
            })?;

        file.write_all(line.as_bytes()).map_err(|e| {
            SinkError::io_operation(
                "appending log line",
                format!("cannot write to '{}'", self.path.display()),
                e,
            )
        })?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|e| {
                SinkError::io_operation(
                    "creating log directory",
                    format!("cannot create '{}'", parent.display()),
                    e,
                )
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use tempfile::tempdir;

    #[test]
    fn test_appends_one_line_per_record() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("logs.txt");
        let destination = FileDestination::new(&log_path)?;

        destination.write(&RenderedLogRecord::new(Severity::Information, "api", "first"))?;
        destination.write(&RenderedLogRecord::new(Severity::Warning, "api", "second"))?;

        let content = fs::read_to_string(&log_path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[Information] api: first"));
        assert!(lines[1].ends_with("[Warning] api: second"));
        assert!(content.ends_with('\n'));

        Ok(())
    }

    #[test]
    fn test_keeps_existing_content() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("logs.txt");
        fs::write(&log_path, "existing line\n")?;

        let destination = FileDestination::new(&log_path)?;
        destination.write(&RenderedLogRecord::new(Severity::Error, "db", "appended"))?;

        let content = fs::read_to_string(&log_path)?;
        assert!(content.starts_with("existing line\n"));
        assert_eq!(content.lines().count(), 2);

        Ok(())
    }

    #[test]
    fn test_creates_parent_directories() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("Logs").join("nested").join("logs.txt");

        let destination = FileDestination::new(&log_path)?;
        destination.write(&RenderedLogRecord::new(Severity::Critical, "boot", "started"))?;

        assert!(log_path.exists());
        Ok(())
    }

    #[test]
    fn test_unwritable_path_reports_error() -> Result<()> {
        let dir = tempdir()?;
        // A directory cannot be opened for append
        let destination = FileDestination::new(dir.path())?;

        let err = destination
            .write(&RenderedLogRecord::new(Severity::Error, "api", "lost"))
            .unwrap_err();
        assert!(matches!(err, SinkError::IoOperation { .. }));

        Ok(())
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(FileDestination::new("").is_err());
    }
}
