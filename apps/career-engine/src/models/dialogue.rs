use serde::{Deserialize, Serialize};

/// Quality band of a single turn's overall score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    #[default]
    Poor,
    Adequate,
    Good,
    Excellent,
}

impl QualityLevel {
    pub fn from_overall(overall: f64) -> Self {
        match overall {
            s if s >= 0.8 => QualityLevel::Excellent,
            s if s >= 0.6 => QualityLevel::Good,
            s if s >= 0.4 => QualityLevel::Adequate,
            _ => QualityLevel::Poor,
        }
    }

    pub fn is_good_or_better(&self) -> bool {
        matches!(self, QualityLevel::Good | QualityLevel::Excellent)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub clarity: f64,
    pub specificity: f64,
    pub achievement_density: f64,
    pub quantification: f64,
    pub overall: f64,
    pub level: QualityLevel,
    pub suggestions: Vec<String>,
    pub token_count: usize,
    /// Content-word overlap with the prior turn, when one was supplied.
    pub context_overlap: Option<f64>,
}

/// The next conversational move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpStrategy {
    QuantificationProbe,
    ConfidenceBoost,
    Clarification,
    DepthExploration,
    Proceed,
}

impl std::fmt::Display for FollowUpStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::QuantificationProbe => "quantification_probe",
            Self::ConfidenceBoost => "confidence_boost",
            Self::Clarification => "clarification",
            Self::DepthExploration => "depth_exploration",
            Self::Proceed => "proceed",
        };
        write!(f, "{s}")
    }
}

/// A phase-required field that a turn did not supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingElement {
    Role,
    Audience,
    Context,
    Action,
    Result,
    Quantification,
    Scope,
}

impl MissingElement {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Audience => "audience",
            Self::Context => "context",
            Self::Action => "action",
            Self::Result => "result",
            Self::Quantification => "quantification",
            Self::Scope => "scope",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bands() {
        assert_eq!(QualityLevel::from_overall(0.85), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_overall(0.8), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_overall(0.6), QualityLevel::Good);
        assert_eq!(QualityLevel::from_overall(0.59), QualityLevel::Adequate);
        assert_eq!(QualityLevel::from_overall(0.4), QualityLevel::Adequate);
        assert_eq!(QualityLevel::from_overall(0.39), QualityLevel::Poor);
        assert_eq!(QualityLevel::from_overall(0.0), QualityLevel::Poor);
    }

    #[test]
    fn test_good_or_better() {
        assert!(QualityLevel::Good.is_good_or_better());
        assert!(QualityLevel::Excellent.is_good_or_better());
        assert!(!QualityLevel::Adequate.is_good_or_better());
    }

    #[test]
    fn test_strategy_serde_snake_case() {
        let json = serde_json::to_string(&FollowUpStrategy::QuantificationProbe).unwrap();
        assert_eq!(json, "\"quantification_probe\"");
        let back: FollowUpStrategy = serde_json::from_str("\"depth_exploration\"").unwrap();
        assert_eq!(back, FollowUpStrategy::DepthExploration);
    }
}
