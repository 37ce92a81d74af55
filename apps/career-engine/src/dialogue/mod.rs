// Dialogue decisions: which follow-up to ask, whether the phase moves, and
// how the profile absorbs a turn.

pub mod accumulator;
pub mod follow_up;
pub mod phase;

pub use accumulator::{ProfileAccumulator, TurnResult};
pub use follow_up::FollowUpPolicy;
pub use phase::{PhaseDecision, PhaseStateMachine};

use serde::{Deserialize, Serialize};

use crate::extraction::{FieldSource, TurnExtraction};
use crate::models::{MissingElement, PersonalStory};

/// Which phase-relevant elements are present after a turn. Story elements are
/// judged on the accumulated story; CAR/REST elements on this turn alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementPresence {
    pub role: bool,
    pub audience: bool,
    pub context: bool,
    pub action: bool,
    pub result: bool,
    pub quantification: bool,
    pub scope: bool,
}

impl ElementPresence {
    pub fn from_turn(story: &PersonalStory, extraction: &TurnExtraction) -> Self {
        let car = &extraction.car;
        Self {
            role: story.role_identity.is_some(),
            audience: story.target_audience.is_some() || story.value_proposition.is_some(),
            context: car.context_source != FieldSource::Placeholder,
            action: car.action_source == FieldSource::Indicator,
            result: car.result_source == FieldSource::Indicator
                || extraction.rest.results.is_some(),
            quantification: extraction.has_quantification,
            scope: extraction.rest.scope.is_some(),
        }
    }

    pub fn has(&self, element: MissingElement) -> bool {
        match element {
            MissingElement::Role => self.role,
            MissingElement::Audience => self.audience,
            MissingElement::Context => self.context,
            MissingElement::Action => self.action,
            MissingElement::Result => self.result,
            MissingElement::Quantification => self.quantification,
            MissingElement::Scope => self.scope,
        }
    }
}
