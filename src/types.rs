//! Core data types for sensor-replay
//!
//! This module contains the fundamental data structures used throughout
//! the application for representing loaded sensor rows.
//!
//! # Main Types
//!
//! - [`ColumnKind`] - Inferred type of a CSV column
//! - [`Value`] - A single typed cell value
//! - [`Field`] - A named value inside a record
//! - [`Record`] - One row of timestamped sensor data
//!
//! # Text Rendering
//!
//! Every [`Value`] renders through [`std::fmt::Display`] using its default
//! text form. That form is what ends up on the wire, so it is kept stable:
//! whole floats keep a trailing `.0`, timestamps omit zero fractional seconds.

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::sync::Arc;

/// Name of the column every input file must carry
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Format used when rendering timestamps as text
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Inferred type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    /// Point in time (only the `timestamp` column)
    Timestamp,
    /// Every cell parses as a signed 64-bit integer
    Integer,
    /// Every cell parses as a 64-bit float
    #[default]
    Float,
    /// Anything else, kept verbatim
    Text,
}

impl ColumnKind {
    /// Whether values of this kind can be ordered for min/max and plotted
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Display name for the kind
    pub fn display_name(&self) -> &'static str {
        match self {
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Header entry: column name plus its inferred kind
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: Arc<str>,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<Arc<str>>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A single typed cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Timestamp(NaiveDateTime),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value, used for plotting and statistics.
    ///
    /// Timestamps map to seconds since the Unix epoch (wall clock treated as UTC).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Timestamp(ts) => Some(timestamp_to_secs(ts)),
            Value::Integer(i) => Some(*i as f64),
            Value::Float(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    /// The timestamp, if this is a timestamp value
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Kind this value belongs to
    pub fn kind(&self) -> ColumnKind {
        match self {
            Value::Timestamp(_) => ColumnKind::Timestamp,
            Value::Integer(_) => ColumnKind::Integer,
            Value::Float(_) => ColumnKind::Float,
            Value::Text(_) => ColumnKind::Text,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_DISPLAY_FORMAT)),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => fmt_float(*v, f),
            Value::Text(s) => f.write_str(s),
        }
    }
}

fn fmt_float(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.is_nan() {
        f.write_str("nan")
    } else if v.is_infinite() {
        f.write_str(if v > 0.0 { "inf" } else { "-inf" })
    } else if v.fract() == 0.0 && v.abs() < 1e16 {
        write!(f, "{:.1}", v)
    } else {
        write!(f, "{}", v)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Timestamp(_) => serializer.collect_str(self),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// Seconds since the Unix epoch, fractional part included
pub fn timestamp_to_secs(ts: &NaiveDateTime) -> f64 {
    let utc = ts.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9
}

/// A named value inside a record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Arc<str>,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One row of sensor data, fields in source column order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub fields: Vec<Field>,
}

impl Record {
    /// Create a record from fields already in column order
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Append a field (builder style)
    pub fn with(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.fields.push(Field::new(name, value));
        self
    }

    /// Look up a value by column name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| &*f.name == name)
            .map(|f| &f.value)
    }

    /// The record's timestamp
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.get(TIMESTAMP_COLUMN).and_then(Value::as_timestamp)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Serializes as a map in field order (used for the "Sent" log line)
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&*field.name, &field.value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Integer(60).to_string(), "60");
        assert_eq!(Value::Float(21.5).to_string(), "21.5");
        assert_eq!(Value::Float(60.0).to_string(), "60.0");
        assert_eq!(Value::Float(-0.25).to_string(), "-0.25");
        assert_eq!(Value::Float(f64::NAN).to_string(), "nan");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-inf");
        assert_eq!(Value::Text("ok".into()).to_string(), "ok");
    }

    #[test]
    fn test_timestamp_display() {
        assert_eq!(Value::Timestamp(ts(12, 0, 5)).to_string(), "2024-03-01 12:00:05");

        let with_millis = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_milli_opt(12, 0, 5, 250)
            .unwrap();
        assert_eq!(
            Value::Timestamp(with_millis).to_string(),
            "2024-03-01 12:00:05.250"
        );
    }

    #[test]
    fn test_record_lookup() {
        let record = Record::default()
            .with(TIMESTAMP_COLUMN, ts(8, 30, 0))
            .with("soil", 300i64);

        assert_eq!(record.len(), 2);
        assert_eq!(record.timestamp(), Some(ts(8, 30, 0)));
        assert_eq!(record.get("soil"), Some(&Value::Integer(300)));
        assert!(record.get("missing").is_none());
    }

    #[test]
    fn test_record_serializes_in_field_order() {
        let record = Record::default()
            .with("zeta", 1i64)
            .with(TIMESTAMP_COLUMN, ts(0, 0, 0))
            .with("alpha", 2.5);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"zeta":1,"timestamp":"2024-03-01 00:00:00","alpha":2.5}"#
        );
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Text("x".into()).as_f64(), None);
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 1, 0)
            .unwrap();
        assert_eq!(Value::Timestamp(epoch).as_f64(), Some(60.0));
    }
}
