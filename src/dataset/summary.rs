//! Min/max summary lines printed before a replay

use super::Dataset;
use crate::types::{ColumnKind, Value};
use std::fmt;

/// Minimum and maximum of one field across the whole dataset
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSummary {
    pub name: String,
    pub min: Value,
    pub max: Value,
}

impl fmt::Display for FieldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: max={} min={}", self.name, self.max, self.min)
    }
}

/// Summarize the requested fields, or every orderable column when `fields` is `None`.
///
/// Text columns and unknown names are skipped with a warning. NaN cells are ignored.
pub fn summarize(dataset: &Dataset, fields: Option<&[String]>) -> Vec<FieldSummary> {
    let names: Vec<String> = match fields {
        Some(list) => list.to_vec(),
        None => dataset
            .columns()
            .iter()
            .filter(|c| c.kind.is_numeric() || c.kind == ColumnKind::Timestamp)
            .map(|c| c.name.to_string())
            .collect(),
    };

    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let Some(column) = dataset.column(&name) else {
            tracing::warn!("Summary field '{}' not found in dataset", name);
            continue;
        };
        if column.kind == ColumnKind::Text {
            tracing::warn!("Summary field '{}' is not numeric, skipping", name);
            continue;
        }

        let mut min: Option<(f64, &Value)> = None;
        let mut max: Option<(f64, &Value)> = None;
        for value in dataset.records().iter().filter_map(|r| r.get(&name)) {
            let Some(x) = value.as_f64().filter(|x| !x.is_nan()) else {
                continue;
            };
            if min.map_or(true, |(m, _)| x < m) {
                min = Some((x, value));
            }
            if max.map_or(true, |(m, _)| x > m) {
                max = Some((x, value));
            }
        }

        if let (Some((_, lo)), Some((_, hi))) = (min, max) {
            out.push(FieldSummary {
                name,
                min: lo.clone(),
                max: hi.clone(),
            });
        }
    }
    out
}

/// Print one summary line per field to stdout
pub fn print_summary(summaries: &[FieldSummary]) {
    for line in summaries {
        println!("{}", line);
    }
}
