//! One adapter per upstream endpoint
//!
//! Each adapter maps the `data` of a response into a typed metric. All
//! "which field name wins" decisions for an endpoint live in its adapter.
//! Adapters never panic on unexpected shapes; they answer `Invalid`.

use super::fields;
use super::outcome::MetricState;
use super::series::{
    ProportionalSeries, ProportionalSeriesBuilder, DEFECT_TYPE_FIELDS, MODULE_FIELDS,
};
use crate::model::{DefectRecord, Project};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Defect-to-remark ratio with its qualitative band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemarkRatio {
    pub ratio_percent: f64,
    pub category: Option<String>,
    pub color: Option<String>,
}

/// Distribution of defects over defect types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectTypeDistribution {
    pub series: ProportionalSeries,
    pub total_defect_count: u64,
    pub most_common_type: Option<String>,
    pub most_common_count: u64,
}

fn list<'a>(data: &'a Value, what: &str) -> Result<&'a [Value], String> {
    match data {
        Value::Array(items) => Ok(items),
        other => Err(format!("{what}: expected a list, got {}", kind(other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Scalar metric that arrives either bare (`0`) or as `{field: n}`.
fn scalar(data: &Value, field: &str) -> MetricState<f64> {
    let value = match data {
        Value::Object(map) => map.get(field),
        other => Some(other),
    };
    match value.and_then(fields::number) {
        Some(n) => MetricState::Ready(n),
        None => MetricState::Invalid(format!("{field} missing or not a number")),
    }
}

/// `getProjects` adapter. Entries without a numeric id are skipped.
pub fn projects(data: &Value) -> MetricState<Vec<Project>> {
    let items = match list(data, "projects") {
        Ok(items) => items,
        Err(reason) => return MetricState::Invalid(reason),
    };

    let projects = items
        .iter()
        .filter_map(|item| {
            let map = item.as_object()?;
            let Some(id) = map.get("id").and_then(Value::as_i64) else {
                warn!("Skipping project without numeric id: {}", item);
                return None;
            };
            let name = fields::first_present(map, &["name", "projectName"])
                .and_then(fields::text)
                .unwrap_or_else(|| format!("Project {id}"));
            Some(Project { id, name })
        })
        .collect();

    MetricState::Ready(projects)
}

/// `getDefectStatistics` adapter; the bundle is opaque to the core.
pub fn defect_statistics(data: &Value) -> MetricState<Value> {
    MetricState::Ready(data.clone())
}

/// `getDefectsByProject` adapter.
pub fn defects(data: &Value) -> MetricState<Vec<DefectRecord>> {
    let items = match list(data, "defects") {
        Ok(items) => items,
        Err(reason) => return MetricState::Invalid(reason),
    };

    let defects = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| DefectRecord {
            id: map.get("id").and_then(Value::as_i64),
            project_id: map.get("projectId").and_then(Value::as_i64),
            status: fields::first_present(map, &["status", "defectStatusName", "defectStatus"])
                .and_then(fields::text)
                .unwrap_or_default(),
        })
        .collect();

    MetricState::Ready(defects)
}

/// `getSeverityIndex` adapter: `{dsiPercentage}` or a bare number.
pub fn severity_index(data: &Value) -> MetricState<f64> {
    scalar(data, "dsiPercentage")
}

/// `getDefectDensity` adapter: `{defectDensity}` or a bare number.
pub fn defect_density(data: &Value) -> MetricState<f64> {
    scalar(data, "defectDensity")
}

/// `getRemarkRatio` adapter; `ratio` is usually a `"NN.NN%"` string.
pub fn remark_ratio(data: &Value) -> MetricState<RemarkRatio> {
    let Some(map) = data.as_object() else {
        return MetricState::Invalid(format!("remark ratio: expected object, got {}", kind(data)));
    };
    let Some(ratio_percent) = map.get("ratio").and_then(fields::number) else {
        return MetricState::Invalid("remark ratio: unreadable ratio".to_string());
    };

    MetricState::Ready(RemarkRatio {
        ratio_percent,
        category: map.get("category").and_then(fields::text),
        color: map.get("color").and_then(fields::text),
    })
}

/// `getReopenSummary` adapter.
///
/// Each record `{reopenCount, count}` becomes a slice labelled "N times".
/// Upstream percentages are ignored and recomputed from the counts.
pub fn reopen_summary(data: &Value) -> MetricState<ProportionalSeries> {
    let items = match list(data, "reopen summary") {
        Ok(items) => items,
        Err(reason) => return MetricState::Invalid(reason),
    };
    if items.is_empty() {
        return MetricState::Empty;
    }

    let series = ProportionalSeries::from_counts(items.iter().enumerate().map(|(i, item)| {
        let reopen = item.get("reopenCount").map(fields::count);
        let label = match reopen {
            Some(1) => "1 time".to_string(),
            Some(n) => format!("{n} times"),
            None => format!("#{}", i + 1),
        };
        let count = item.get("count").and_then(fields::number).unwrap_or(0.0);
        (label, count)
    }));

    MetricState::Ready(series)
}

/// `getDefectTypeDistribution` adapter.
pub fn defect_type_distribution(data: &Value) -> MetricState<DefectTypeDistribution> {
    let Some(map) = data.as_object() else {
        return MetricState::Invalid(format!(
            "defect types: expected object, got {}",
            kind(data)
        ));
    };
    let types = match map.get("defectTypes") {
        Some(Value::Array(types)) => types,
        Some(other) => {
            return MetricState::Invalid(format!(
                "defectTypes: expected a list, got {}",
                kind(other)
            ))
        }
        None => return MetricState::Invalid("defectTypes missing".to_string()),
    };
    if types.is_empty() {
        return MetricState::Empty;
    }

    let series = ProportionalSeriesBuilder::new(DEFECT_TYPE_FIELDS).build(types);

    let fallback_most_common = series
        .entries
        .iter()
        .fold(None::<&super::series::SeriesEntry>, |best, e| match best {
            Some(b) if b.count >= e.count => Some(b),
            _ => Some(e),
        });

    let most_common_type = map
        .get("mostCommonDefectType")
        .and_then(fields::text)
        .or_else(|| fallback_most_common.map(|e| e.label.clone()));
    let most_common_count = map
        .get("mostCommonDefectCount")
        .map(fields::count)
        .or_else(|| fallback_most_common.map(|e| e.count.round() as u64))
        .unwrap_or(0);
    let total_defect_count = map
        .get("totalDefectCount")
        .filter(|v| !v.is_null())
        .map(fields::count)
        .unwrap_or(series.total.round() as u64);

    MetricState::Ready(DefectTypeDistribution {
        series,
        total_defect_count,
        most_common_type,
        most_common_count,
    })
}

/// `getDefectsByModule` adapter.
pub fn defects_by_module(data: &Value) -> MetricState<ProportionalSeries> {
    let items = match list(data, "defects by module") {
        Ok(items) => items,
        Err(reason) => return MetricState::Invalid(reason),
    };
    if items.is_empty() {
        return MetricState::Empty;
    }
    MetricState::Ready(ProportionalSeriesBuilder::new(MODULE_FIELDS).build(items))
}
