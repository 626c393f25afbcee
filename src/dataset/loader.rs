//! CSV loader
//!
//! Reads the whole file up front, then infers one [`ColumnKind`] per column so
//! that every cell of a column renders the same way on the wire.

use super::Dataset;
use crate::error::{ReplayError, Result, ResultExt};
use crate::types::{Column, ColumnKind, Field, Record, Value, TIMESTAMP_COLUMN};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Accepted date-time layouts, tried in order after RFC 3339
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp cell.
///
/// Zoned RFC 3339 input keeps its local wall-clock time.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl Dataset {
    /// Load a dataset from a CSV file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(ReplayError::from)
            .with_context(|| format!("Failed to open input file {}", path.display()))?;

        let dataset = Self::from_reader(file)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        tracing::info!(
            "Loaded {} rows x {} columns from {:?}",
            dataset.len(),
            dataset.columns().len(),
            path
        );
        if let Some((first, last)) = dataset.time_range() {
            tracing::info!("Data spans {} to {}", first, last);
        }
        Ok(dataset)
    }

    /// Load a dataset from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        check_headers(&headers)?;

        let ts_index = headers
            .iter()
            .position(|h| h == TIMESTAMP_COLUMN)
            .ok_or_else(|| ReplayError::MissingColumn(TIMESTAMP_COLUMN.to_string()))?;

        let rows = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;

        // Row numbers in errors are 1-based data rows (header excluded)
        for (idx, row) in rows.iter().enumerate() {
            if row.get(ts_index).is_some_and(str::is_empty) {
                return Err(ReplayError::MalformedRecord {
                    row: idx + 1,
                    column: TIMESTAMP_COLUMN.to_string(),
                    message: "empty timestamp".to_string(),
                });
            }
        }

        let columns: Vec<Column> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let kind = if i == ts_index {
                    ColumnKind::Timestamp
                } else {
                    infer_kind(rows.iter().map(|r| &r[i]))
                };
                Column::new(name, kind)
            })
            .collect();

        for column in &columns {
            tracing::debug!("Column '{}' inferred as {}", column.name, column.kind);
        }

        let records = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| parse_row(&columns, row, idx + 1))
            .collect::<Result<Vec<_>>>()?;

        Ok(Dataset::new(columns, records))
    }
}

fn check_headers(headers: &StringRecord) -> Result<()> {
    let mut seen = HashSet::new();
    for name in headers.iter() {
        if name.is_empty() || !seen.insert(name) {
            return Err(ReplayError::MalformedRecord {
                row: 0,
                column: name.to_string(),
                message: "header names must be unique and non-empty".to_string(),
            });
        }
    }
    Ok(())
}

/// An empty cell is a missing reading: it fits a float column but not an integer one.
fn infer_kind<'a>(mut cells: impl Iterator<Item = &'a str> + Clone) -> ColumnKind {
    if cells.clone().all(|c| c.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if cells.all(|c| c.is_empty() || c.parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else {
        ColumnKind::Text
    }
}

fn parse_row(columns: &[Column], row: &StringRecord, row_number: usize) -> Result<Record> {
    let malformed = |column: &Column, message: String| ReplayError::MalformedRecord {
        row: row_number,
        column: column.name.to_string(),
        message,
    };

    let mut fields = Vec::with_capacity(columns.len());
    for (column, cell) in columns.iter().zip(row.iter()) {
        let value = match column.kind {
            _ if cell.is_empty() && column.kind != ColumnKind::Timestamp => Value::Float(f64::NAN),
            ColumnKind::Timestamp => parse_timestamp(cell)
                .map(Value::Timestamp)
                .ok_or_else(|| malformed(column, format!("unrecognized timestamp '{}'", cell)))?,
            ColumnKind::Integer => cell
                .parse()
                .map(Value::Integer)
                .map_err(|e| malformed(column, e.to_string()))?,
            ColumnKind::Float => cell
                .parse()
                .map(Value::Float)
                .map_err(|e| malformed(column, e.to_string()))?,
            ColumnKind::Text => Value::Text(cell.to_string()),
        };
        fields.push(Field {
            name: Arc::clone(&column.name),
            value,
        });
    }
    Ok(Record::new(fields))
}
