//! Common test utilities and fixtures

#![allow(dead_code)]

use defect_pulse::api::{Endpoint, MockDefectApi};
use defect_pulse::model::ProjectId;
use serde_json::{json, Value};
use std::sync::Arc;

pub const NO_DATA: &str = "No data found";

/// Payload of every per-project metric endpoint, as the service returns it.
pub fn metric_payloads(project_id: ProjectId) -> Vec<(Endpoint, Value)> {
    vec![
        (
            Endpoint::DefectStatistics(project_id),
            json!({"totalDefects": 14, "openDefects": 6}),
        ),
        (
            Endpoint::DefectsByProject(project_id),
            json!([
                {"id": 1, "projectId": project_id, "defectStatusName": "NEW"},
                {"id": 2, "projectId": project_id, "defectStatusName": "FIXED"},
            ]),
        ),
        (
            Endpoint::SeveritySummary(project_id),
            json!({
                "projectName": "Billing",
                "totalDefects": 14,
                "defectSummary": [
                    {"severity": "High", "total": 6, "statuses": {"NEW": {"count": 2}, "REOPEN": 1, "FIXED": 3}},
                    {"severity": "Medium", "total": 5, "OPEN": 5},
                    {"severity": "low", "total": 3, "DUPLICATE": "3"},
                ]
            }),
        ),
        (
            Endpoint::SeverityIndex(project_id),
            json!({"dsiPercentage": 43.6}),
        ),
        (
            Endpoint::DefectDensity(project_id),
            json!({"defectDensity": 10.0}),
        ),
        (
            Endpoint::RemarkRatio(project_id),
            json!({"ratio": "62.50%", "category": "Good", "color": "green"}),
        ),
        (
            Endpoint::ReopenSummary(project_id),
            json!([
                {"reopenCount": 1, "count": 3, "percentage": 60.0},
                {"reopenCount": 2, "count": 2, "percentage": 40.0},
            ]),
        ),
        (
            Endpoint::DefectTypeDistribution(project_id),
            json!({
                "defectTypes": [
                    {"defectType": "UI", "defectCount": 8},
                    {"defectType": "Functional", "defectCount": 6},
                ],
                "totalDefectCount": 14,
                "mostCommonDefectType": "UI",
                "mostCommonDefectCount": 8
            }),
        ),
        (
            Endpoint::DefectsByModule(project_id),
            json!([
                {"name": "Invoices", "value": 9},
                {"moduleName": "Payments", "defectCount": 3},
                {"module": "Reports", "count": 0},
            ]),
        ),
    ]
}

/// Answer every metric endpoint of `project_id` with realistic data.
pub async fn seed_project(mock: &MockDefectApi, project_id: ProjectId) {
    for (endpoint, data) in metric_payloads(project_id) {
        mock.set_data(endpoint, data).await;
    }
}

/// A mock with one fully populated project.
pub async fn mock_with_project(project_id: ProjectId) -> Arc<MockDefectApi> {
    let mock = Arc::new(MockDefectApi::new());
    seed_project(&mock, project_id).await;
    mock
}
