//! Sensor dataset loading and summaries
//!
//! A [`Dataset`] is the fully parsed content of one CSV file: the header
//! (column names with their inferred [`ColumnKind`](crate::types::ColumnKind))
//! and every row as a [`Record`], in file order.
//!
//! # Example
//!
//! ```ignore
//! use sensor_replay::dataset::{Dataset, summarize};
//!
//! let dataset = Dataset::load("data.csv")?;
//! for line in summarize(&dataset, None) {
//!     println!("{}", line);
//! }
//! ```

pub mod loader;
pub mod summary;

pub use loader::parse_timestamp;
pub use summary::{print_summary, summarize, FieldSummary};

use crate::types::{Column, Record, TIMESTAMP_COLUMN};
use chrono::NaiveDateTime;

/// Parsed contents of one input file
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from already-parsed parts
    pub fn new(columns: Vec<Column>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Header columns in file order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Rows in file order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| &*c.name == name)
    }

    /// Names of all columns in file order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| &*c.name)
    }

    /// `[time, value]` pairs for a numeric column, x in seconds since epoch.
    ///
    /// Rows whose value is not numeric or is missing (NaN) are skipped.
    pub fn series(&self, name: &str) -> Vec<[f64; 2]> {
        self.records
            .iter()
            .filter_map(|r| {
                let t = r.get(TIMESTAMP_COLUMN)?.as_f64()?;
                let v = r.get(name)?.as_f64().filter(|v| !v.is_nan())?;
                Some([t, v])
            })
            .collect()
    }

    /// Earliest and latest timestamp in the dataset
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut iter = self.records.iter().filter_map(Record::timestamp);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }
}
