//! Structured extraction — personal story, CAR/REST achievements, and profile
//! hints from free text.
//!
//! One `StructuredExtractor` fronts a versioned `ExtractionStrategy`. The
//! shipped strategy is `PatternStrategy`, whose pattern tables live as data in
//! the `story`, `car`, `rest` and `hints` modules. Extraction never fails: an
//! unmatched turn degrades to positional sentences, then placeholders.

pub mod car;
pub mod hints;
pub mod rest;
pub mod story;

use crate::models::{Experience, PersonalStory, Rest};
use crate::scoring::quantity::{self, QuantityKind};
use crate::text;

pub use car::{CarExtraction, FieldSource};
pub use hints::ProfileHints;

/// Everything the extractor pulls from a single turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnExtraction {
    pub car: CarExtraction,
    pub rest: Rest,
    /// Present only when the turn describes an actual achievement.
    pub experience: Option<Experience>,
    pub hints: ProfileHints,
    pub has_quantification: bool,
}

/// Extraction backend. Implement this to swap the heuristics without touching
/// the engine.
pub trait ExtractionStrategy: Send + Sync {
    /// Stable identifier, recorded alongside results for traceability.
    fn version(&self) -> &'static str;

    /// Rebuilds the personal story from every accepted turn so far.
    fn extract_story(&self, turns: &[String]) -> PersonalStory;

    /// CAR/REST from one turn; `turn_index` is 1-based. Hints are filled
    /// separately through `extract_hints`.
    fn extract_experience(&self, turn: &str, turn_index: u32) -> TurnExtraction;

    fn extract_hints(&self, turn: &str) -> ProfileHints;
}

/// Regex and indicator-table heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternStrategy;

impl ExtractionStrategy for PatternStrategy {
    fn version(&self) -> &'static str {
        "pattern-v1"
    }

    fn extract_story(&self, turns: &[String]) -> PersonalStory {
        story::extract_story(turns)
    }

    fn extract_experience(&self, turn: &str, turn_index: u32) -> TurnExtraction {
        let car = car::extract_car(turn);
        let rest = rest::extract_rest(turn);
        let has_quantification = !rest.is_empty() || quantity::has_any(turn, &QuantityKind::ALL);

        let experience = is_candidate(&car, &rest).then(|| Experience {
            car: car.car.clone(),
            rest: rest.clone(),
            confidence: confidence(&car, has_quantification, text::tokens(turn).len()),
            turn_index,
        });

        TurnExtraction {
            car,
            rest,
            experience,
            hints: ProfileHints::default(),
            has_quantification,
        }
    }

    fn extract_hints(&self, turn: &str) -> ProfileHints {
        hints::extract_hints(turn)
    }
}

/// A turn only becomes an experience when it names what the user did and
/// what came of it.
fn is_candidate(car: &CarExtraction, rest: &Rest) -> bool {
    car.action_source == FieldSource::Indicator
        && (car.result_source == FieldSource::Indicator || !rest.is_empty())
}

const FULL_LENGTH_TOKENS: f64 = 60.0;

/// Weighted: CAR sourcing 0.3, quantification 0.3, action-verb strength 0.2,
/// turn length 0.2.
pub fn confidence(car: &CarExtraction, has_quantification: bool, token_count: usize) -> f64 {
    let quantified = if has_quantification { 1.0 } else { 0.0 };
    let length = (token_count as f64 / FULL_LENGTH_TOKENS).min(1.0);
    (car.sourcing_score() * 0.3 + quantified * 0.3 + car.action_strength * 0.2 + length * 0.2)
        .clamp(0.0, 1.0)
}

pub struct StructuredExtractor {
    strategy: Box<dyn ExtractionStrategy>,
}

impl StructuredExtractor {
    pub fn new(strategy: Box<dyn ExtractionStrategy>) -> Self {
        Self { strategy }
    }

    pub fn version(&self) -> &'static str {
        self.strategy.version()
    }

    pub fn story(&self, turns: &[String]) -> PersonalStory {
        self.strategy.extract_story(turns)
    }

    pub fn turn(&self, turn: &str, turn_index: u32) -> TurnExtraction {
        let mut extraction = self.strategy.extract_experience(turn, turn_index);
        extraction.hints = self.strategy.extract_hints(turn);
        extraction
    }
}

impl Default for StructuredExtractor {
    fn default() -> Self {
        Self::new(Box::new(PatternStrategy))
    }
}

impl std::fmt::Debug for StructuredExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredExtractor")
            .field("strategy", &self.strategy.version())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACHIEVEMENT: &str = "Our team was struggling with a slow release process. \
        I led a rewrite of the deployment pipeline using GitHub Actions. \
        As a result we reduced deploy time by 60% and saved 10 hours a week.";

    #[test]
    fn test_default_strategy_version() {
        assert_eq!(StructuredExtractor::default().version(), "pattern-v1");
    }

    #[test]
    fn test_achievement_turn_yields_experience() {
        let extraction = StructuredExtractor::default().turn(ACHIEVEMENT, 2);
        let experience = extraction.experience.expect("experience");
        assert_eq!(experience.turn_index, 2);
        assert!(experience.car.action.starts_with("I led"));
        assert!(experience.rest.efficiency.is_some());
        assert!(experience.confidence > 0.8, "confidence {}", experience.confidence);
        assert!(extraction.has_quantification);
    }

    #[test]
    fn test_vague_turn_yields_no_experience() {
        let extraction = StructuredExtractor::default().turn("I helped the team a lot", 1);
        assert!(extraction.experience.is_none());
        assert!(!extraction.has_quantification);
    }

    #[test]
    fn test_action_without_result_is_not_a_candidate() {
        let extraction = StructuredExtractor::default().turn("I built a dashboard.", 1);
        assert_eq!(extraction.car.action_source, FieldSource::Indicator);
        assert!(extraction.experience.is_none());
    }

    #[test]
    fn test_confidence_is_bounded() {
        let car = car::extract_car(ACHIEVEMENT);
        let c = confidence(&car, true, 10_000);
        assert!((0.0..=1.0).contains(&c));
        let empty = car::extract_car("");
        assert_eq!(confidence(&empty, false, 0), 0.0);
    }

    /// Delegates to the pattern strategy except for hints.
    struct FixedHints;

    impl ExtractionStrategy for FixedHints {
        fn version(&self) -> &'static str {
            "fixed-hints"
        }

        fn extract_story(&self, turns: &[String]) -> PersonalStory {
            PatternStrategy.extract_story(turns)
        }

        fn extract_experience(&self, turn: &str, turn_index: u32) -> TurnExtraction {
            PatternStrategy.extract_experience(turn, turn_index)
        }

        fn extract_hints(&self, _turn: &str) -> ProfileHints {
            ProfileHints {
                display_name: Some("Robin".to_string()),
                target_role: None,
            }
        }
    }

    #[test]
    fn test_hints_come_from_the_strategy() {
        let extractor = StructuredExtractor::new(Box::new(FixedHints));
        assert_eq!(extractor.version(), "fixed-hints");
        let extraction = extractor.turn("My name is Dana and I build things.", 1);
        assert_eq!(extraction.hints.display_name.as_deref(), Some("Robin"));

        let extraction = StructuredExtractor::default().turn("My name is Dana and I build things.", 1);
        assert_eq!(extraction.hints.display_name.as_deref(), Some("Dana"));
    }

    #[test]
    fn test_story_goes_through_strategy() {
        let story = StructuredExtractor::default()
            .story(&["I'm the product manager who helps startups achieve faster launches".to_string()]);
        assert_eq!(story.role_identity.as_deref(), Some("product manager"));
    }
}
