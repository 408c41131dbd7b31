//! Values substituted into message templates
//!
//! A `LogValue` is one positional argument of a log call. Scalars render with
//! their natural text form; structured values (anything `Serialize`) render as
//! a key/value expansion such as `{ Action = LogAllLevels, Status = Debugging }`.

use serde::Serialize;
use std::fmt;

/// Text used for absent values and for arguments that could not be captured
pub const NULL_TEXT: &str = "(null)";

#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Structured(serde_json::Value),
    Null,
}

impl LogValue {
    /// Capture any serializable value as a structured argument.
    ///
    /// Serialization failures never reach the caller: the argument degrades
    /// to [`LogValue::Null`] and renders as `(null)`.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(serde_json::Value::Null) | Err(_) => LogValue::Null,
            Ok(json) => LogValue::Structured(json),
        }
    }

    /// Capture a value through its `Display` implementation
    pub fn display(value: impl fmt::Display) -> Self {
        LogValue::String(value.to_string())
    }

    /// Render for a `{name}` or `{@name}` hole
    pub fn render(&self) -> String {
        match self {
            LogValue::Structured(json) => render_json(json),
            other => other.to_string(),
        }
    }

    /// Render for a `{$name}` hole: the flat string form, structured values as compact JSON
    pub fn render_stringified(&self) -> String {
        match self {
            LogValue::Structured(json) => json.to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::String(s) => f.write_str(s),
            LogValue::Int(i) => write!(f, "{}", i),
            LogValue::Float(fl) => write!(f, "{}", fl),
            LogValue::Bool(b) => write!(f, "{}", b),
            LogValue::Structured(json) => f.write_str(&render_json(json)),
            LogValue::Null => f.write_str(NULL_TEXT),
        }
    }
}

fn render_json(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => NULL_TEXT.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let inner = items.iter().map(render_json).collect::<Vec<_>>().join(", ");
            format!("[{}]", inner)
        }
        Value::Object(map) if map.is_empty() => "{ }".to_string(),
        Value::Object(map) => {
            let inner = map
                .iter()
                .map(|(k, v)| format!("{} = {}", k, render_json(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{ {} }}", inner)
        }
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::String(s)
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::String(s.to_string())
    }
}

impl From<&String> for LogValue {
    fn from(s: &String) -> Self {
        LogValue::String(s.clone())
    }
}

impl From<char> for LogValue {
    fn from(c: char) -> Self {
        LogValue::String(c.to_string())
    }
}

impl From<i64> for LogValue {
    fn from(i: i64) -> Self {
        LogValue::Int(i)
    }
}

impl From<i32> for LogValue {
    fn from(i: i32) -> Self {
        LogValue::Int(i as i64)
    }
}

impl From<u32> for LogValue {
    fn from(i: u32) -> Self {
        LogValue::Int(i as i64)
    }
}

impl From<u64> for LogValue {
    fn from(i: u64) -> Self {
        match i64::try_from(i) {
            Ok(v) => LogValue::Int(v),
            Err(_) => LogValue::String(i.to_string()),
        }
    }
}

impl From<usize> for LogValue {
    fn from(i: usize) -> Self {
        LogValue::from(i as u64)
    }
}

impl From<f64> for LogValue {
    fn from(f: f64) -> Self {
        LogValue::Float(f)
    }
}

impl From<f32> for LogValue {
    fn from(f: f32) -> Self {
        LogValue::Float(f as f64)
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        LogValue::Bool(b)
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => LogValue::Null,
            other => LogValue::Structured(other),
        }
    }
}

impl<T: Into<LogValue>> From<Option<T>> for LogValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(LogValue::Null)
    }
}
