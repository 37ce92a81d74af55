//! Follow-up policy — picks the next conversational move for a turn.
//!
//! Decision tree, first match wins:
//! 1. no numeric evidence          → QuantificationProbe
//! 2. modesty phrasing             → ConfidenceBoost
//! 3. vague phrasing               → Clarification
//! 4. fewer than 20 tokens         → DepthExploration
//! 5. otherwise                    → Proceed

use crate::dialogue::phase::required_elements;
use crate::dialogue::ElementPresence;
use crate::models::{FollowUpStrategy, MissingElement, Phase, QualityMetrics};
use crate::text;

const MODESTY_PHRASES: &[&str] = &[
    "helped",
    "assisted",
    "supported",
    "contributed to",
    "was involved",
    "was part of",
];

const VAGUE_PHRASES: &[&str] = &[
    "some", "several", "various", "many", "a lot", "stuff", "things",
];

const LOW_DETAIL_TOKENS: usize = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct FollowUpPolicy;

impl FollowUpPolicy {
    pub fn decide(&self, turn: &str, metrics: &QualityMetrics) -> FollowUpStrategy {
        let normalized = text::normalized(turn);

        if !text::has_numeric_evidence(turn) {
            FollowUpStrategy::QuantificationProbe
        } else if MODESTY_PHRASES
            .iter()
            .any(|p| text::contains_phrase(&normalized, p))
        {
            FollowUpStrategy::ConfidenceBoost
        } else if VAGUE_PHRASES
            .iter()
            .any(|p| text::contains_phrase(&normalized, p))
        {
            FollowUpStrategy::Clarification
        } else if metrics.token_count < LOW_DETAIL_TOKENS {
            FollowUpStrategy::DepthExploration
        } else {
            FollowUpStrategy::Proceed
        }
    }

    /// The phase's required elements this turn did not supply, in the phase's
    /// own order.
    pub fn missing_elements(&self, phase: Phase, presence: &ElementPresence) -> Vec<MissingElement> {
        required_elements(phase)
            .iter()
            .copied()
            .filter(|e| !presence.has(*e))
            .collect()
    }

    /// Rule-based wording for the next question. Used verbatim when no
    /// augmentation is configured.
    pub fn next_question(
        &self,
        phase: Phase,
        strategy: FollowUpStrategy,
        missing: Option<MissingElement>,
    ) -> String {
        match strategy {
            FollowUpStrategy::QuantificationProbe => {
                "Can you put a number on that? For example a percentage, an amount of money, \
                 time saved, or how many people were affected."
                    .to_string()
            }
            FollowUpStrategy::ConfidenceBoost => {
                "It sounds like you played a real part in that. What did you personally \
                 own or decide, and what would not have happened without you?"
                    .to_string()
            }
            FollowUpStrategy::Clarification => {
                "Could you be more specific? Which team, which project, and what exactly changed?"
                    .to_string()
            }
            FollowUpStrategy::DepthExploration => {
                "Tell me more. What was the situation, what did you do, and how did it turn out?"
                    .to_string()
            }
            FollowUpStrategy::Proceed => match missing {
                Some(element) => element_question(element).to_string(),
                None => phase_opening(phase).to_string(),
            },
        }
    }
}

fn element_question(element: MissingElement) -> &'static str {
    match element {
        MissingElement::Role => "How would you describe what you do in a few words?",
        MissingElement::Audience => "Who benefits most from your work, and what do they get out of it?",
        MissingElement::Context => "What was the situation or challenge when this started?",
        MissingElement::Action => "What did you personally do about it?",
        MissingElement::Result => "What was the outcome?",
        MissingElement::Quantification => "How would you measure that outcome?",
        MissingElement::Scope => "How many people, customers, or markets did this reach?",
    }
}

/// Opening question for a phase the conversation just entered.
pub fn phase_opening(phase: Phase) -> &'static str {
    match phase {
        Phase::Introduction => "Let's start with you. What do you do, and what are you looking for next?",
        Phase::StoryDiscovery => {
            "Complete this sentence: I'm the kind of professional who helps ... achieve ..."
        }
        Phase::AchievementMining => {
            "Tell me about an achievement you're proud of: the situation, what you did, and the result."
        }
        Phase::Quantification => {
            "Let's size that achievement. What changed in numbers, for how many people, and how quickly?"
        }
        Phase::Synthesis => {
            "I have enough to draft your profile. Is there anything you'd add before I summarise it?"
        }
        Phase::Review => "Here is your profile summary. Take a look and tell me what you'd change.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_quality;

    fn decide(turn: &str) -> FollowUpStrategy {
        FollowUpPolicy.decide(turn, &score_quality(turn, None))
    }

    #[test]
    fn test_no_numbers_asks_for_quantification() {
        assert_eq!(decide("I helped the team a lot"), FollowUpStrategy::QuantificationProbe);
        assert_eq!(
            decide("I led the migration and everything got much better for everyone"),
            FollowUpStrategy::QuantificationProbe
        );
    }

    #[test]
    fn test_modesty_before_vagueness() {
        assert_eq!(
            decide("I helped with some of the 3 launches"),
            FollowUpStrategy::ConfidenceBoost
        );
    }

    #[test]
    fn test_vague_phrasing() {
        assert_eq!(
            decide("I shipped several features in 2022"),
            FollowUpStrategy::Clarification
        );
    }

    #[test]
    fn test_low_detail() {
        assert_eq!(decide("I cut cloud spend by 30%"), FollowUpStrategy::DepthExploration);
    }

    #[test]
    fn test_proceed_for_detailed_quantified_turn() {
        let turn = "At Stripe in 2021 our checkout conversion was falling because the payment \
                    page was slow. I led 4 engineers and rebuilt the service in 3 months.";
        assert_eq!(decide(turn), FollowUpStrategy::Proceed);
    }

    #[test]
    fn test_missing_elements_follow_phase_requirements() {
        let presence = ElementPresence {
            action: true,
            ..ElementPresence::default()
        };
        let missing = FollowUpPolicy.missing_elements(Phase::AchievementMining, &presence);
        assert_eq!(missing, vec![MissingElement::Context, MissingElement::Result]);
        assert!(FollowUpPolicy
            .missing_elements(Phase::Review, &presence)
            .is_empty());
    }

    #[test]
    fn test_next_question_targets_first_missing_element() {
        let q = FollowUpPolicy.next_question(
            Phase::AchievementMining,
            FollowUpStrategy::Proceed,
            Some(MissingElement::Result),
        );
        assert_eq!(q, "What was the outcome?");
        let q = FollowUpPolicy.next_question(Phase::Synthesis, FollowUpStrategy::Proceed, None);
        assert_eq!(q, phase_opening(Phase::Synthesis));
    }
}
