use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::dialogue::FollowUpStrategy;

pub const CONTEXT_PLACEHOLDER: &str = "Context not yet described";
pub const ACTION_PLACEHOLDER: &str = "Action not yet described";
pub const RESULT_PLACEHOLDER: &str = "Result not yet described";

/// The user's positioning statement, rebuilt from the whole conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalStory {
    pub role_identity: Option<String>,
    pub target_audience: Option<String>,
    pub value_proposition: Option<String>,
    pub story_statement: Option<String>,
    /// 0.0 – 1.0
    pub coherence_score: f64,
}

/// Context-Action-Result. Fields are never empty: unextractable parts carry
/// the placeholder constants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub context: String,
    pub action: String,
    pub results: String,
}

impl Default for Car {
    fn default() -> Self {
        Self {
            context: CONTEXT_PLACEHOLDER.to_string(),
            action: ACTION_PLACEHOLDER.to_string(),
            results: RESULT_PLACEHOLDER.to_string(),
        }
    }
}

impl Car {
    pub fn has_results(&self) -> bool {
        self.results != RESULT_PLACEHOLDER
    }
}

/// Results-Efficiency-Scope-Time. Each facet is free text with the embedded
/// quantity, e.g. "increased revenue by 30%".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rest {
    pub results: Option<String>,
    pub efficiency: Option<String>,
    pub scope: Option<String>,
    pub time: Option<String>,
}

impl Rest {
    pub fn is_empty(&self) -> bool {
        self.results.is_none()
            && self.efficiency.is_none()
            && self.scope.is_none()
            && self.time.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub car: Car,
    pub rest: Rest,
    /// 0.0 – 1.0
    pub confidence: f64,
    /// Turn number (1-based) the experience was extracted from.
    pub turn_index: u32,
}

/// Accumulated career profile. 1:1 with a `Session`.
///
/// `experiences` is append-only and `summary_bullets` holds either nothing or
/// exactly five bullets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub session_id: Uuid,
    pub display_name: Option<String>,
    pub target_role: Option<String>,
    pub personal_story: PersonalStory,
    pub experiences: Vec<Experience>,
    pub summary_bullets: Vec<String>,
    pub turn_history: Vec<String>,
    /// Mean confidence across experiences.
    pub achievement_quantification: f64,
    pub last_strategy: Option<FollowUpStrategy>,
}

impl Profile {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            display_name: None,
            target_role: None,
            personal_story: PersonalStory::default(),
            experiences: Vec::new(),
            summary_bullets: Vec::new(),
            turn_history: Vec::new(),
            achievement_quantification: 0.0,
            last_strategy: None,
        }
    }

    pub fn mean_confidence(&self) -> f64 {
        if self.experiences.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.experiences.iter().map(|e| e.confidence).sum();
        (sum / self.experiences.len() as f64).clamp(0.0, 1.0)
    }
}
