//! Profile accumulator — the only place a profile is written.

use tracing::debug;

use crate::dialogue::PhaseDecision;
use crate::extraction::ProfileHints;
use crate::models::{Experience, FollowUpStrategy, Phase, PersonalStory, Profile};
use crate::synthesis;

/// The outcome of one accepted turn, as the accumulator consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub text: String,
    /// Story rebuilt from the full history including `text`.
    pub story: PersonalStory,
    pub experience: Option<Experience>,
    pub hints: ProfileHints,
    pub strategy: FollowUpStrategy,
    pub decision: PhaseDecision,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileAccumulator;

impl ProfileAccumulator {
    /// Returns the updated profile. Prior experiences are never touched.
    pub fn apply(&self, profile: &Profile, turn: TurnResult) -> Profile {
        let mut next = profile.clone();

        next.turn_history.push(turn.text);
        if let Some(experience) = turn.experience {
            next.experiences.push(experience);
        }
        next.personal_story = turn.story;
        next.achievement_quantification = next.mean_confidence();

        if next.display_name.is_none() {
            next.display_name = turn.hints.display_name;
        }
        if next.target_role.is_none() {
            next.target_role = turn
                .hints
                .target_role
                .or_else(|| next.personal_story.role_identity.clone());
        }

        next.last_strategy = Some(turn.strategy);

        if turn.decision.changed() && turn.decision.target() == Phase::Review {
            next.summary_bullets = synthesis::build(&next).bullets;
        }

        debug!(
            experiences = next.experiences.len(),
            coherence = next.personal_story.coherence_score,
            achievement_quantification = next.achievement_quantification,
            "profile updated"
        );

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Car, Rest};
    use uuid::Uuid;

    fn turn(text: &str, experience: Option<Experience>, decision: PhaseDecision) -> TurnResult {
        TurnResult {
            text: text.to_string(),
            story: PersonalStory::default(),
            experience,
            hints: ProfileHints::default(),
            strategy: FollowUpStrategy::Proceed,
            decision,
        }
    }

    fn experience(confidence: f64) -> Experience {
        Experience {
            car: Car::default(),
            rest: Rest::default(),
            confidence,
            turn_index: 1,
        }
    }

    const STAY: PhaseDecision = PhaseDecision::Stay {
        phase: Phase::AchievementMining,
    };

    #[test]
    fn test_apply_appends_and_keeps_input_untouched() {
        let profile = Profile::new(Uuid::new_v4());
        let snapshot = profile.clone();

        let next = ProfileAccumulator.apply(&profile, turn("first", Some(experience(0.6)), STAY));
        assert_eq!(profile, snapshot);
        assert_eq!(next.turn_history, vec!["first"]);
        assert_eq!(next.experiences.len(), 1);

        let next = ProfileAccumulator.apply(&next, turn("second", Some(experience(0.8)), STAY));
        assert_eq!(next.experiences.len(), 2);
        assert_eq!(next.experiences[0].confidence, 0.6);
        assert!((next.achievement_quantification - 0.7).abs() < 1e-9);
        assert_eq!(next.last_strategy, Some(FollowUpStrategy::Proceed));
    }

    #[test]
    fn test_hints_fill_once() {
        let profile = Profile::new(Uuid::new_v4());
        let mut first = turn("hi", None, STAY);
        first.hints.display_name = Some("Dana".to_string());
        let next = ProfileAccumulator.apply(&profile, first);

        let mut second = turn("again", None, STAY);
        second.hints.display_name = Some("Someone Else".to_string());
        let next = ProfileAccumulator.apply(&next, second);
        assert_eq!(next.display_name.as_deref(), Some("Dana"));
    }

    #[test]
    fn test_target_role_falls_back_to_story_role() {
        let profile = Profile::new(Uuid::new_v4());
        let mut t = turn("I'm a data engineer at Acme.", None, STAY);
        t.story.role_identity = Some("data engineer".to_string());
        let next = ProfileAccumulator.apply(&profile, t);
        assert_eq!(next.target_role.as_deref(), Some("data engineer"));
    }

    #[test]
    fn test_entering_review_fills_five_bullets() {
        let profile = Profile::new(Uuid::new_v4());
        let next = ProfileAccumulator.apply(&profile, turn("done", None, STAY));
        assert!(next.summary_bullets.is_empty());

        let review = PhaseDecision::Advance {
            from: Phase::Synthesis,
            to: Phase::Review,
        };
        let next = ProfileAccumulator.apply(&next, turn("looks good", None, review));
        assert_eq!(next.summary_bullets.len(), 5);
    }
}
