//! Defect severity summary aggregation
//!
//! Normalizes the variable-shaped per-severity records of the severity
//! summary endpoint into a fixed high/medium/low structure. The aggregator is
//! a pure function of its input and keeps no state between calls.
//!
//! Upstream records look like:
//!
//! ```json
//! {"severity": "High", "total": 5, "NEW": 2, "REOPEN": {"count": 1}}
//! ```
//!
//! Every field other than `severity` and `total` is treated as a status count
//! and copied verbatim into the bucket, including statuses outside the fixed
//! layout.

use super::fields;
use super::outcome::MetricState;
use crate::model::{SeverityLevel, StatusName};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Defect counts for one severity level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBucket {
    pub total: u64,
    /// Status name (verbatim upstream key) to count.
    pub statuses: BTreeMap<String, u64>,
}

impl SeverityBucket {
    /// Count for a fixed-layout status, 0 when upstream did not report it.
    ///
    /// An exact key match wins; otherwise keys are compared ignoring case.
    pub fn status(&self, status: StatusName) -> u64 {
        if let Some(count) = self.statuses.get(status.as_str()) {
            return *count;
        }
        self.statuses
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(status.as_str()))
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// The five fixed status rows in rendering order.
    pub fn fixed_layout(&self) -> [(StatusName, u64); 5] {
        StatusName::ALL.map(|s| (s, self.status(s)))
    }

    /// Statuses that upstream reported but the fixed layout does not show.
    pub fn extra_statuses(&self) -> impl Iterator<Item = (&str, u64)> {
        self.statuses
            .iter()
            .filter(|(key, _)| StatusName::parse(key).is_none())
            .map(|(key, count)| (key.as_str(), *count))
    }
}

/// Fixed-shape severity summary for one project.
///
/// `total_defects` is passed through from upstream and may disagree with
/// the sum of the bucket totals; see [`SeveritySummary::is_consistent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySummary {
    pub high: SeverityBucket,
    pub medium: SeverityBucket,
    pub low: SeverityBucket,
    pub total_defects: u64,
    pub project_name: Option<String>,
}

impl SeveritySummary {
    pub fn bucket(&self, level: SeverityLevel) -> &SeverityBucket {
        match level {
            SeverityLevel::High => &self.high,
            SeverityLevel::Medium => &self.medium,
            SeverityLevel::Low => &self.low,
        }
    }

    fn bucket_mut(&mut self, level: SeverityLevel) -> &mut SeverityBucket {
        match level {
            SeverityLevel::High => &mut self.high,
            SeverityLevel::Medium => &mut self.medium,
            SeverityLevel::Low => &mut self.low,
        }
    }

    /// Sum of the bucket totals, saturating at `u64::MAX`.
    pub fn bucket_sum(&self) -> u64 {
        self.high
            .total
            .saturating_add(self.medium.total)
            .saturating_add(self.low.total)
    }

    /// Whether the upstream grand total matches the per-bucket totals.
    pub fn is_consistent(&self) -> bool {
        self.bucket_sum() == self.total_defects
    }
}

/// Aggregate a list of per-severity records.
///
/// `None` (list absent) yields a zeroed summary. Records with a missing or
/// unrecognized severity tag are dropped. A later record for the same
/// severity replaces an earlier one.
pub fn aggregate(records: Option<&[Value]>) -> SeveritySummary {
    let mut summary = SeveritySummary::default();
    let Some(records) = records else {
        debug!("Severity summary list absent, returning zeroed summary");
        return summary;
    };

    for (index, record) in records.iter().enumerate() {
        let Some(fields) = record.as_object() else {
            warn!("Dropping severity record {} (not an object)", index);
            continue;
        };

        let tag = fields.get("severity").and_then(Value::as_str);
        let Some(level) = tag.and_then(SeverityLevel::parse) else {
            warn!(
                "Dropping severity record {} with unrecognized severity {:?}",
                index, tag
            );
            continue;
        };

        *summary.bucket_mut(level) = bucket_from_record(fields);
    }

    summary.total_defects = summary.bucket_sum();
    summary
}

fn bucket_from_record(fields: &Map<String, Value>) -> SeverityBucket {
    let mut bucket = SeverityBucket {
        total: fields.get("total").map(fields::count).unwrap_or(0),
        statuses: BTreeMap::new(),
    };

    for (key, value) in fields {
        match key.as_str() {
            "severity" | "total" => {}
            "statuses" if value.is_object() => {
                for (status, nested) in value.as_object().into_iter().flatten() {
                    bucket.statuses.insert(status.clone(), status_count(nested));
                }
            }
            _ => {
                bucket.statuses.insert(key.clone(), status_count(value));
            }
        }
    }

    bucket
}

/// Status values arrive as plain numbers or as `{count: n, ...}` objects.
fn status_count(value: &Value) -> u64 {
    match value {
        Value::Object(inner) => inner.get("count").map(fields::count).unwrap_or(0),
        other => fields::count(other),
    }
}

/// Adapt the `data` of a severity summary response.
///
/// Accepts either a bare list of records or an object of the form
/// `{defectSummary: [...], totalDefects, projectName}`. When `totalDefects`
/// is present it is kept verbatim even if it disagrees with the buckets.
pub fn adapt(data: &Value) -> MetricState<SeveritySummary> {
    match data {
        Value::Array(records) => MetricState::Ready(aggregate(Some(records))),
        Value::Object(object) => {
            let records = match object.get("defectSummary") {
                None | Some(Value::Null) => None,
                Some(Value::Array(records)) => Some(records.as_slice()),
                Some(_) => {
                    return MetricState::Invalid("defectSummary is not a list".to_string());
                }
            };

            let mut summary = aggregate(records);
            if let Some(total) = object.get("totalDefects").filter(|v| !v.is_null()) {
                summary.total_defects = fields::count(total);
            }
            summary.project_name = object
                .get("projectName")
                .and_then(Value::as_str)
                .map(str::to_string);

            if !summary.is_consistent() {
                debug!(
                    "Severity totals disagree: buckets={} totalDefects={}",
                    summary.bucket_sum(),
                    summary.total_defects
                );
            }

            MetricState::Ready(summary)
        }
        other => MetricState::Invalid(format!("unexpected severity summary payload: {other}")),
    }
}
