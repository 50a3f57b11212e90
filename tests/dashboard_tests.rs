//! Project overview scenarios against the mock service

mod common;

use common::NO_DATA;
use defect_pulse::api::{Endpoint, MockDefectApi};
use defect_pulse::dashboard::{OverviewLoader, RiskFilter};
use defect_pulse::error::{ApiError, Error};
use defect_pulse::model::RiskTier;
use defect_pulse::risk::{RiskBasis, RiskClassifier, UnknownColorPolicy};
use serde_json::json;
use std::sync::Arc;

async fn portfolio() -> Arc<MockDefectApi> {
    let mock = Arc::new(MockDefectApi::new());
    mock.set_data(
        Endpoint::Projects,
        json!([
            {"id": 1, "projectName": "Billing"},
            {"id": 2, "projectName": "Search"},
            {"id": 3, "name": "Mobile"},
            {"id": 4, "projectName": "Legacy"},
        ]),
    )
    .await;

    // Billing: red card
    mock.set_data(
        Endpoint::ProjectCardColor(1),
        json!({"projectCardColor": "Red"}),
    )
    .await;
    mock.set_data(Endpoint::DefectsByProject(1), json!([])).await;

    // Search: risk levels win over the green card
    mock.set_data(
        Endpoint::ProjectCardColor(2),
        json!({"projectCardColor": "green", "availableRiskLevels": ["Low", "Medium"]}),
    )
    .await;
    mock.set_data(
        Endpoint::DefectsByProject(2),
        json!([{"defectStatusName": "FIXED"}]),
    )
    .await;

    // Mobile: no card color, a reopened defect
    mock.set_error(Endpoint::ProjectCardColor(3), ApiError::Status(404))
        .await;
    mock.set_data(
        Endpoint::DefectsByProject(3),
        json!([{"status": "OPEN"}, {"status": "REOPEN"}]),
    )
    .await;

    // Legacy: unrecognized color, only fixed defects
    mock.set_data(
        Endpoint::ProjectCardColor(4),
        json!({"projectCardColor": "purple"}),
    )
    .await;
    mock.set_message(Endpoint::DefectsByProject(4), NO_DATA).await;

    mock
}

#[tokio::test]
async fn test_overview_classifies_each_project() {
    let loader = OverviewLoader::new(portfolio().await, RiskClassifier::default());
    let overview = loader.load().await.unwrap();

    let tiers: Vec<_> = overview
        .cards
        .iter()
        .map(|c| (c.project.name.as_str(), c.tier(), c.risk.basis))
        .collect();
    assert_eq!(
        tiers,
        vec![
            ("Billing", RiskTier::High, RiskBasis::Color),
            ("Search", RiskTier::Medium, RiskBasis::RiskLevels),
            ("Mobile", RiskTier::High, RiskBasis::Defects),
            ("Legacy", RiskTier::Medium, RiskBasis::UnknownColor),
        ]
    );

    let counts = overview.counts();
    assert_eq!((counts.high, counts.medium, counts.low), (2, 2, 0));
    assert_eq!(overview.cards[2].defect_count, Some(2));
    assert_eq!(overview.cards[3].defect_count, Some(0));
    assert_eq!(overview.cards[0].label, "High Risk");
}

#[tokio::test]
async fn test_overview_filter() {
    let loader = OverviewLoader::new(portfolio().await, RiskClassifier::default());
    let overview = loader.load().await.unwrap();

    let high: Vec<_> = overview
        .filter(RiskFilter::High)
        .into_iter()
        .map(|c| c.project.id)
        .collect();
    assert_eq!(high, vec![1, 3]);
    assert!(overview.filter(RiskFilter::Low).is_empty());
    assert_eq!(overview.filter(RiskFilter::All).len(), 4);
}

#[tokio::test]
async fn test_unknown_color_policy_is_configurable() {
    let loader = OverviewLoader::new(
        portfolio().await,
        RiskClassifier::new(UnknownColorPolicy::Low),
    );
    let overview = loader.load().await.unwrap();
    assert_eq!(overview.cards[3].tier(), RiskTier::Low);

    let loader = OverviewLoader::new(
        portfolio().await,
        RiskClassifier::new(UnknownColorPolicy::DefectHeuristic),
    );
    let overview = loader.load().await.unwrap();
    assert_eq!(overview.cards[3].tier(), RiskTier::Low);
    assert_eq!(overview.cards[3].risk.basis, RiskBasis::Defects);
}

#[tokio::test]
async fn test_project_list_failure_is_an_error() {
    let mock = Arc::new(MockDefectApi::new());
    mock.set_error(
        Endpoint::Projects,
        ApiError::Transport("connection refused".to_string()),
    )
    .await;

    let loader = OverviewLoader::new(mock, RiskClassifier::default());
    let result = loader.load().await;
    assert!(matches!(result, Err(Error::Api(ApiError::Transport(_)))));
}

#[tokio::test]
async fn test_no_projects_is_an_empty_overview() {
    let mock = Arc::new(MockDefectApi::new());
    mock.set_message(Endpoint::Projects, NO_DATA).await;

    let loader = OverviewLoader::new(mock.clone(), RiskClassifier::default());
    let overview = loader.load().await.unwrap();
    assert!(overview.cards.is_empty());
    assert_eq!(overview.counts().total(), 0);
    assert_eq!(mock.get_called_endpoints().await, vec![Endpoint::Projects]);
}
