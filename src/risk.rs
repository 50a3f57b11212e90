//! Project risk classification
//!
//! A project's risk tier comes from the first available signal, in order:
//!
//! 1. explicit risk levels reported by the card-color endpoint,
//! 2. the card color descriptor (red/yellow/green),
//! 3. the statuses of the project's defects.
//!
//! A color descriptor that matches none of the canonical colors yields
//! [`ColorTag::Unknown`]. How that resolves is a policy choice, see
//! [`UnknownColorPolicy`].

use crate::metrics::fields;
use crate::metrics::MetricState;
use crate::model::{DefectRecord, RiskTier, SeverityLevel, StatusName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Canonical card colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Red,
    Yellow,
    Green,
    /// Descriptor present but not recognized. Never treated as green.
    Unknown,
}

impl ColorTag {
    /// Derive a tag from a free-text descriptor such as
    /// `"bg-gradient-to-r from-red-600 to-red-800"`.
    ///
    /// Matching is case-insensitive and checks red first, then the yellow
    /// family (yellow/amber/orange), then the green family (green/emerald).
    pub fn from_descriptor(descriptor: &str) -> Self {
        let lower = descriptor.to_lowercase();
        if lower.contains("red") {
            ColorTag::Red
        } else if ["yellow", "amber", "orange"].iter().any(|c| lower.contains(c)) {
            ColorTag::Yellow
        } else if ["green", "emerald"].iter().any(|c| lower.contains(c)) {
            ColorTag::Green
        } else {
            ColorTag::Unknown
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            ColorTag::Red => "#ce1111",
            ColorTag::Yellow => "#eed61c",
            ColorTag::Green => "#06ba0b",
            ColorTag::Unknown => "#888888",
        }
    }

    /// Tier for a canonical color; `None` for [`ColorTag::Unknown`].
    pub fn tier(self) -> Option<RiskTier> {
        match self {
            ColorTag::Red => Some(RiskTier::High),
            ColorTag::Yellow => Some(RiskTier::Medium),
            ColorTag::Green => Some(RiskTier::Low),
            ColorTag::Unknown => None,
        }
    }
}

/// How a project with an unrecognized card color is classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownColorPolicy {
    /// Treat as medium so risk is not understated.
    #[default]
    Medium,
    /// Treat as low, matching the dashboard's historical color fallback.
    Low,
    /// Ignore the color and classify from the defect list.
    DefectHeuristic,
}

impl FromStr for UnknownColorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "medium" => Ok(UnknownColorPolicy::Medium),
            "low" => Ok(UnknownColorPolicy::Low),
            "defect-heuristic" | "defects" => Ok(UnknownColorPolicy::DefectHeuristic),
            other => Err(format!("unknown color policy '{other}'")),
        }
    }
}

impl fmt::Display for UnknownColorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnknownColorPolicy::Medium => "medium",
            UnknownColorPolicy::Low => "low",
            UnknownColorPolicy::DefectHeuristic => "defect-heuristic",
        };
        f.write_str(s)
    }
}

/// Risk metadata available for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSignals {
    /// Levels from `availableRiskLevels`; unrecognized entries are dropped.
    pub risk_levels: BTreeSet<SeverityLevel>,
    pub color: Option<ColorTag>,
}

impl RiskSignals {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_color(color: ColorTag) -> Self {
        Self {
            risk_levels: BTreeSet::new(),
            color: Some(color),
        }
    }

    pub fn from_levels<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            risk_levels: levels
                .into_iter()
                .filter_map(|l| SeverityLevel::parse(l.as_ref()))
                .collect(),
            color: None,
        }
    }
}

/// Which rule decided a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskBasis {
    RiskLevels,
    Color,
    UnknownColor,
    Defects,
}

/// A tier plus the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    pub basis: RiskBasis,
}

/// Maps risk signals to a tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskClassifier {
    unknown_color: UnknownColorPolicy,
}

impl RiskClassifier {
    pub fn new(unknown_color: UnknownColorPolicy) -> Self {
        Self { unknown_color }
    }

    pub fn unknown_color_policy(&self) -> UnknownColorPolicy {
        self.unknown_color
    }

    pub fn classify(&self, signals: &RiskSignals, defects: &[DefectRecord]) -> RiskTier {
        self.assess(signals, defects).tier
    }

    /// Classify and report which rule applied.
    pub fn assess(&self, signals: &RiskSignals, defects: &[DefectRecord]) -> RiskAssessment {
        if let Some(tier) = tier_from_levels(&signals.risk_levels) {
            return RiskAssessment {
                tier,
                basis: RiskBasis::RiskLevels,
            };
        }

        match signals.color {
            Some(ColorTag::Unknown) => {
                let tier = match self.unknown_color {
                    UnknownColorPolicy::Medium => Some(RiskTier::Medium),
                    UnknownColorPolicy::Low => Some(RiskTier::Low),
                    UnknownColorPolicy::DefectHeuristic => None,
                };
                if let Some(tier) = tier {
                    debug!("Unrecognized card color resolved to {} by policy", tier);
                    return RiskAssessment {
                        tier,
                        basis: RiskBasis::UnknownColor,
                    };
                }
            }
            Some(color) => {
                if let Some(tier) = color.tier() {
                    return RiskAssessment {
                        tier,
                        basis: RiskBasis::Color,
                    };
                }
            }
            None => {}
        }

        RiskAssessment {
            tier: classify_defects(defects),
            basis: RiskBasis::Defects,
        }
    }
}

fn tier_from_levels(levels: &BTreeSet<SeverityLevel>) -> Option<RiskTier> {
    if levels.contains(&SeverityLevel::High) {
        Some(RiskTier::High)
    } else if levels.contains(&SeverityLevel::Medium) {
        Some(RiskTier::Medium)
    } else if levels.contains(&SeverityLevel::Low) {
        Some(RiskTier::Low)
    } else {
        None
    }
}

/// Defect-count heuristic: any REOPEN or NEW is high, else any OPEN is
/// medium, else low.
pub fn classify_defects(defects: &[DefectRecord]) -> RiskTier {
    let has = |wanted: &[StatusName]| {
        defects
            .iter()
            .filter_map(DefectRecord::status_name)
            .any(|s| wanted.contains(&s))
    };

    if has(&[StatusName::Reopen, StatusName::New]) {
        RiskTier::High
    } else if has(&[StatusName::Open]) {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// `getProjectCardColor` adapter.
///
/// Accepts `{projectCardColor: "..."}`, `{availableRiskLevels: [...]}`, or
/// both. An object carrying neither is `Empty`.
pub fn adapt_card_color(data: &Value) -> MetricState<RiskSignals> {
    let Some(map) = data.as_object() else {
        return MetricState::Invalid("project card color: expected object".to_string());
    };

    let mut signals = RiskSignals::none();

    match map.get("availableRiskLevels") {
        None | Some(Value::Null) => {}
        Some(Value::Array(levels)) => {
            signals.risk_levels = levels
                .iter()
                .filter_map(fields::text)
                .filter_map(|l| SeverityLevel::parse(&l))
                .collect();
        }
        Some(_) => {
            return MetricState::Invalid("availableRiskLevels is not a list".to_string());
        }
    }

    signals.color = map
        .get("projectCardColor")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(ColorTag::from_descriptor);

    if signals.risk_levels.is_empty() && signals.color.is_none() {
        MetricState::Empty
    } else {
        MetricState::Ready(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defects(statuses: &[&str]) -> Vec<DefectRecord> {
        statuses.iter().map(|s| DefectRecord::new(*s)).collect()
    }

    #[test]
    fn test_color_descriptor_matching() {
        assert_eq!(
            ColorTag::from_descriptor("bg-gradient-to-r from-red-600 to-red-800"),
            ColorTag::Red
        );
        assert_eq!(ColorTag::from_descriptor("AMBER"), ColorTag::Yellow);
        assert_eq!(ColorTag::from_descriptor("from-orange-400"), ColorTag::Yellow);
        assert_eq!(ColorTag::from_descriptor("Emerald-500"), ColorTag::Green);
        assert_eq!(ColorTag::from_descriptor("slate-400"), ColorTag::Unknown);
    }

    #[test]
    fn test_risk_levels_take_priority_in_order() {
        let classifier = RiskClassifier::default();
        let signals = RiskSignals {
            risk_levels: RiskSignals::from_levels(["High", "Low"]).risk_levels,
            color: Some(ColorTag::Green),
        };
        assert_eq!(classifier.classify(&signals, &[]), RiskTier::High);

        let signals = RiskSignals::from_levels(["Low", "Medium"]);
        assert_eq!(classifier.classify(&signals, &[]), RiskTier::Medium);
    }

    #[test]
    fn test_unrecognized_levels_fall_through_to_color() {
        let classifier = RiskClassifier::default();
        let signals = RiskSignals {
            risk_levels: RiskSignals::from_levels(["Critical"]).risk_levels,
            color: Some(ColorTag::Red),
        };
        let assessment = classifier.assess(&signals, &[]);
        assert_eq!(assessment.tier, RiskTier::High);
        assert_eq!(assessment.basis, RiskBasis::Color);
    }

    #[test]
    fn test_green_color_is_low() {
        let classifier = RiskClassifier::default();
        let signals = RiskSignals::from_color(ColorTag::Green);
        assert_eq!(
            classifier.classify(&signals, &defects(&["NEW"])),
            RiskTier::Low
        );
    }

    #[test]
    fn test_no_signal_uses_defect_heuristic() {
        let classifier = RiskClassifier::default();
        let none = RiskSignals::none();
        assert_eq!(classifier.classify(&none, &defects(&["NEW"])), RiskTier::High);
        assert_eq!(
            classifier.classify(&none, &defects(&["FIXED", "reopen"])),
            RiskTier::High
        );
        assert_eq!(
            classifier.classify(&none, &defects(&["OPEN", "FIXED"])),
            RiskTier::Medium
        );
        assert_eq!(classifier.classify(&none, &defects(&["FIXED"])), RiskTier::Low);
        assert_eq!(classifier.classify(&none, &[]), RiskTier::Low);
    }

    #[test]
    fn test_unknown_color_medium_policy() {
        let classifier = RiskClassifier::new(UnknownColorPolicy::Medium);
        let signals = RiskSignals::from_color(ColorTag::Unknown);
        let assessment = classifier.assess(&signals, &defects(&["FIXED"]));
        assert_eq!(assessment.tier, RiskTier::Medium);
        assert_eq!(assessment.basis, RiskBasis::UnknownColor);
    }

    #[test]
    fn test_unknown_color_low_policy() {
        let classifier = RiskClassifier::new(UnknownColorPolicy::Low);
        let signals = RiskSignals::from_color(ColorTag::Unknown);
        assert_eq!(
            classifier.classify(&signals, &defects(&["NEW"])),
            RiskTier::Low
        );
    }

    #[test]
    fn test_unknown_color_defect_heuristic_policy() {
        let classifier = RiskClassifier::new(UnknownColorPolicy::DefectHeuristic);
        let signals = RiskSignals::from_color(ColorTag::Unknown);
        let assessment = classifier.assess(&signals, &defects(&["OPEN"]));
        assert_eq!(assessment.tier, RiskTier::Medium);
        assert_eq!(assessment.basis, RiskBasis::Defects);
    }

    #[test]
    fn test_policy_parses_from_str() {
        assert_eq!(
            "LOW".parse::<UnknownColorPolicy>(),
            Ok(UnknownColorPolicy::Low)
        );
        assert_eq!(
            "defect-heuristic".parse::<UnknownColorPolicy>(),
            Ok(UnknownColorPolicy::DefectHeuristic)
        );
        assert!("gray".parse::<UnknownColorPolicy>().is_err());
    }

    #[test]
    fn test_adapt_card_color_shapes() {
        let state = adapt_card_color(&json!({"projectCardColor": "from-red-600"}));
        assert_eq!(state, MetricState::Ready(RiskSignals::from_color(ColorTag::Red)));

        let state = adapt_card_color(&json!({"availableRiskLevels": ["Medium", "Low"]}));
        assert_eq!(
            state,
            MetricState::Ready(RiskSignals::from_levels(["Medium", "Low"]))
        );

        assert_eq!(adapt_card_color(&json!({})), MetricState::Empty);
        assert!(matches!(
            adapt_card_color(&json!({"availableRiskLevels": "High"})),
            MetricState::Invalid(_)
        ));
    }
}
