//! Severity level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered importance of a log event.
///
/// The textual names (`Information`, `Warning`, ...) are what ends up in the
/// file line and in the `LogLevel` column of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Default)]
pub enum Severity {
    #[serde(alias = "trace", alias = "TRACE")]
    Trace = 0,
    #[serde(alias = "debug", alias = "DEBUG")]
    Debug = 1,
    #[default]
    #[serde(alias = "information", alias = "info", alias = "Info", alias = "INFO")]
    Information = 2,
    #[serde(alias = "warning", alias = "warn", alias = "Warn", alias = "WARN")]
    Warning = 3,
    #[serde(alias = "error", alias = "ERROR")]
    Error = 4,
    #[serde(alias = "critical", alias = "fatal", alias = "Fatal", alias = "FATAL")]
    Critical = 5,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Information,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "Trace",
            Severity::Debug => "Debug",
            Severity::Information => "Information",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Severity::Trace),
            "DEBUG" => Ok(Severity::Debug),
            "INFORMATION" | "INFO" => Ok(Severity::Information),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" | "FATAL" => Ok(Severity::Critical),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Severity::Trace < Severity::Debug);
        assert!(Severity::Debug < Severity::Information);
        assert!(Severity::Information < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Severity::Information.to_string(), "Information");
        assert_eq!(Severity::Warning.to_string(), "Warning");
        assert_eq!(Severity::Critical.to_string(), "Critical");
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("info".parse::<Severity>(), Ok(Severity::Information));
        assert_eq!("WARN".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("fatal".parse::<Severity>(), Ok(Severity::Critical));
        assert_eq!(" Debug ".parse::<Severity>(), Ok(Severity::Debug));
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_deserialize_alias() {
        let parsed: Severity = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(parsed, Severity::Warning);

        let parsed: Severity = serde_json::from_str("\"Information\"").unwrap();
        assert_eq!(parsed, Severity::Information);
    }
}
