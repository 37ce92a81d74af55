//! Engine — the per-turn pipeline.
//!
//! ```text
//! raw input ─┬─ QualityScorer ──────┐
//!            └─ StructuredExtractor ┴─ FollowUpPolicy ─ PhaseStateMachine ─ ProfileAccumulator
//! ```
//!
//! Pure and synchronous: the caller's session and profile are never mutated,
//! updated copies come back in `TurnOutcome`. The engine holds no per-session
//! state and takes no locks; callers serialise turns per session.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::dialogue::phase::{completeness, progress_percentage};
use crate::dialogue::{
    ElementPresence, FollowUpPolicy, PhaseDecision, PhaseStateMachine, ProfileAccumulator,
    TurnResult,
};
use crate::errors::EngineError;
use crate::extraction::{StructuredExtractor, TurnExtraction};
use crate::models::{
    FollowUpStrategy, MissingElement, Phase, PersonalStory, Profile, QualityMetrics, Session,
};
use crate::scoring::score_quality;
use crate::synthesis::{self, Summary};

/// What the caller needs to render the next message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageContext {
    pub phase: Phase,
    pub progress_percentage: u8,
    pub follow_up_strategy: FollowUpStrategy,
    pub quality_metrics: QualityMetrics,
    pub missing_elements: Vec<MissingElement>,
    pub next_question: String,
    pub decision: PhaseDecision,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub session: Session,
    pub profile: Profile,
    pub message_context: MessageContext,
}

#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    extractor: StructuredExtractor,
    policy: FollowUpPolicy,
    machine: PhaseStateMachine,
    accumulator: ProfileAccumulator,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_extractor(config, StructuredExtractor::default())
    }

    pub fn with_extractor(config: EngineConfig, extractor: StructuredExtractor) -> Self {
        Self {
            machine: PhaseStateMachine::new(&config),
            config,
            extractor,
            policy: FollowUpPolicy,
            accumulator: ProfileAccumulator,
        }
    }

    /// A fresh session at Introduction with its empty profile.
    pub fn start(&self) -> (Session, Profile) {
        let session = Session::new();
        let profile = Profile::new(session.id);
        info!(session_id = %session.id, extractor = self.extractor.version(), "session started");
        (session, profile)
    }

    fn validate(&self, text: &str) -> Result<(), EngineError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidInput("input is empty".to_string()));
        }
        let chars = trimmed.chars().count();
        if chars < self.config.min_input_chars {
            return Err(EngineError::InvalidInput(format!(
                "input must be at least {} characters",
                self.config.min_input_chars
            )));
        }
        if chars > self.config.max_input_chars {
            return Err(EngineError::InvalidInput(format!(
                "input must be at most {} characters",
                self.config.max_input_chars
            )));
        }
        Ok(())
    }

    /// Scores and extracts the turn. The two halves share no data, so they
    /// may run on separate threads.
    fn analyse(
        &self,
        text: &str,
        previous: Option<&str>,
        history: &[String],
        turn_index: u32,
    ) -> (QualityMetrics, TurnExtraction, PersonalStory) {
        let extract = || {
            let extraction = self.extractor.turn(text, turn_index);
            let story = self.extractor.story(history);
            (extraction, story)
        };

        if self.config.parallel_analysis {
            std::thread::scope(|scope| {
                let scorer = scope.spawn(|| score_quality(text, previous));
                let (extraction, story) = extract();
                let metrics = scorer
                    .join()
                    .unwrap_or_else(|_| score_quality(text, previous));
                (metrics, extraction, story)
            })
        } else {
            let metrics = score_quality(text, previous);
            let (extraction, story) = extract();
            (metrics, extraction, story)
        }
    }

    /// Processes one user turn. On error nothing is returned and the caller's
    /// values stay as they were.
    pub fn process_turn(
        &self,
        session: &Session,
        profile: &Profile,
        text: &str,
    ) -> Result<TurnOutcome, EngineError> {
        if session.is_completed() {
            return Err(EngineError::SessionCompleted(session.id));
        }
        if profile.session_id != session.id {
            return Err(EngineError::ProfileNotFound(session.id));
        }
        self.validate(text)?;

        let text = text.trim();
        let turn_index = session.turn_count + 1;
        let mut history = profile.turn_history.clone();
        history.push(text.to_string());
        let previous = profile.turn_history.last().map(String::as_str);

        let (metrics, extraction, story) = self.analyse(text, previous, &history, turn_index);
        debug!(
            session_id = %session.id,
            turn = turn_index,
            overall = metrics.overall,
            level = ?metrics.level,
            experience = extraction.experience.is_some(),
            "turn analysed"
        );

        let strategy = self.policy.decide(text, &metrics);
        let presence = ElementPresence::from_turn(&story, &extraction);
        let current = session.phase;
        let current_completeness = completeness(current, &presence);
        let missing_elements = self.policy.missing_elements(current, &presence);

        let mut prospective = profile.experiences.clone();
        prospective.extend(extraction.experience.iter().cloned());
        let decision = self
            .machine
            .decide(current, &metrics, current_completeness, &prospective);

        let next_phase = decision.target();
        let mut next_session = session.clone();
        next_session.turn_count = turn_index;
        next_session.phase = next_phase;
        if next_phase.is_terminal() && next_session.completed_at.is_none() {
            next_session.completed_at = Some(Utc::now());
            info!(session_id = %session.id, "session completed");
        }

        let next_question = if decision.changed() {
            crate::dialogue::follow_up::phase_opening(next_phase).to_string()
        } else {
            self.policy
                .next_question(current, strategy, missing_elements.first().copied())
        };

        let next_profile = self.accumulator.apply(
            profile,
            TurnResult {
                text: text.to_string(),
                story,
                experience: extraction.experience,
                hints: extraction.hints,
                strategy,
                decision,
            },
        );

        let message_context = MessageContext {
            phase: next_phase,
            progress_percentage: progress_percentage(next_phase, completeness(next_phase, &presence)),
            follow_up_strategy: strategy,
            quality_metrics: metrics,
            missing_elements,
            next_question,
            decision,
        };

        Ok(TurnOutcome {
            session: next_session,
            profile: next_profile,
            message_context,
        })
    }

    /// Summary of the profile as it stands. Callable before the session ends
    /// for a live preview.
    pub fn synthesize(&self, profile: &Profile) -> Summary {
        synthesis::build(profile)
    }
}
