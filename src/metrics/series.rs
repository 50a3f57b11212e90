//! Proportional series construction
//!
//! Turns category records that carry a count under one of several field names
//! into an ordered `{label, count, percentage}` series. Input order is kept;
//! entries are never sorted by magnitude.

use super::fields;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One category of a proportional series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub label: String,
    pub count: f64,
    /// Share of the series total, in `[0, 100]`.
    pub percentage: f64,
}

/// Ordered categories with percentages of their sum.
///
/// When `total > 0` the percentages sum to 100 up to float rounding. When
/// `total == 0` the series is marked empty and every percentage is 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionalSeries {
    pub entries: Vec<SeriesEntry>,
    pub total: f64,
    pub is_empty: bool,
}

impl ProportionalSeries {
    /// Build a series from `(label, count)` pairs.
    ///
    /// Negative and non-finite counts are treated as 0. When the counts are
    /// too large to sum in an `f64`, they are rescaled relative to the
    /// largest count so the total stays finite.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut resolved: Vec<(String, f64)> = counts
            .into_iter()
            .map(|(label, count)| (label.into(), sanitize(count)))
            .collect();

        let mut total: f64 = resolved.iter().map(|(_, count)| *count).sum();
        if !total.is_finite() {
            let largest = resolved.iter().map(|(_, count)| *count).fold(0.0, f64::max);
            for (_, count) in resolved.iter_mut() {
                *count /= largest;
            }
            total = resolved.iter().map(|(_, count)| *count).sum();
        }
        let is_empty = total <= 0.0;

        let entries = resolved
            .into_iter()
            .map(|(label, count)| SeriesEntry {
                percentage: if is_empty { 0.0 } else { count / total * 100.0 },
                label,
                count,
            })
            .collect();

        Self {
            entries,
            total: if is_empty { 0.0 } else { total },
            is_empty,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn percentage_sum(&self) -> f64 {
        self.entries.iter().map(|e| e.percentage).sum()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }
}

fn sanitize(count: f64) -> f64 {
    if count.is_finite() && count > 0.0 {
        count
    } else {
        0.0
    }
}

/// Which record fields supply the label and the count.
///
/// Both lists are ordered; the first field present on a record wins.
#[derive(Debug, Clone, Copy)]
pub struct SeriesFields<'a> {
    pub label: &'a [&'a str],
    pub count: &'a [&'a str],
}

/// Label/count fields of the defects-by-module endpoint.
pub const MODULE_FIELDS: SeriesFields<'static> = SeriesFields {
    label: &["name", "moduleName", "module"],
    count: &["value", "defectCount", "count"],
};

/// Label/count fields of a defect-type distribution entry.
pub const DEFECT_TYPE_FIELDS: SeriesFields<'static> = SeriesFields {
    label: &["defectType", "name", "type"],
    count: &["defectCount", "count", "value"],
};

/// Builds proportional series from heterogeneous JSON records.
#[derive(Debug, Clone, Copy)]
pub struct ProportionalSeriesBuilder<'a> {
    fields: SeriesFields<'a>,
}

impl<'a> ProportionalSeriesBuilder<'a> {
    pub fn new(fields: SeriesFields<'a>) -> Self {
        Self { fields }
    }

    /// Count of a record: first present candidate field, else 0.
    pub fn resolve_count(&self, record: &Value) -> f64 {
        record
            .as_object()
            .and_then(|map| fields::first_present(map, self.fields.count))
            .and_then(fields::number)
            .map(sanitize)
            .unwrap_or(0.0)
    }

    /// Label of a record; falls back to its 1-based position.
    pub fn resolve_label(&self, record: &Value, index: usize) -> String {
        record
            .as_object()
            .and_then(|map| fields::first_present(map, self.fields.label))
            .and_then(fields::text)
            .unwrap_or_else(|| format!("#{}", index + 1))
    }

    pub fn build(&self, records: &[Value]) -> ProportionalSeries {
        ProportionalSeries::from_counts(
            records
                .iter()
                .enumerate()
                .map(|(i, record)| (self.resolve_label(record, i), self.resolve_count(record))),
        )
    }
}
