//! Phase state machine.
//!
//! Introduction → StoryDiscovery → AchievementMining → Quantification →
//! Synthesis → Review. A turn advances one step when it is good enough and
//! complete enough for the current phase; otherwise the phase stays. Enough
//! high-confidence experiences force a single jump straight to Synthesis.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::dialogue::ElementPresence;
use crate::models::{Experience, MissingElement, Phase, QualityMetrics};

/// Why a turn skipped ahead to Synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceReason {
    ExperienceCount,
    HighConfidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseDecision {
    Stay { phase: Phase },
    Advance { from: Phase, to: Phase },
    ForceAdvance { from: Phase, to: Phase, reason: ForceReason },
}

impl PhaseDecision {
    /// The phase the session is in after this decision.
    pub fn target(&self) -> Phase {
        match self {
            PhaseDecision::Stay { phase } => *phase,
            PhaseDecision::Advance { to, .. } | PhaseDecision::ForceAdvance { to, .. } => *to,
        }
    }

    pub fn changed(&self) -> bool {
        !matches!(self, PhaseDecision::Stay { .. })
    }
}

pub fn required_elements(phase: Phase) -> &'static [MissingElement] {
    use MissingElement::*;
    match phase {
        Phase::Introduction => &[Role],
        Phase::StoryDiscovery => &[Role, Audience],
        Phase::AchievementMining => &[Context, Action, Result],
        Phase::Quantification => &[Result, Quantification, Scope],
        Phase::Synthesis => &[Role, Audience, Quantification],
        Phase::Review => &[],
    }
}

/// Fraction of the phase's required elements that are present.
pub fn completeness(phase: Phase, presence: &ElementPresence) -> f64 {
    let required = required_elements(phase);
    if required.is_empty() {
        return 1.0;
    }
    let present = required.iter().filter(|e| presence.has(**e)).count();
    present as f64 / required.len() as f64
}

/// Progress shown to the user, looked up from the phase and how complete the
/// phase is on this turn.
pub fn progress_percentage(phase: Phase, completeness: f64) -> u8 {
    let early = completeness < 0.5;
    match phase {
        Phase::Introduction => 10,
        Phase::StoryDiscovery => {
            if early {
                25
            } else {
                35
            }
        }
        Phase::AchievementMining => {
            if early {
                50
            } else {
                70
            }
        }
        Phase::Quantification => {
            if early {
                70
            } else {
                85
            }
        }
        Phase::Synthesis => 90,
        Phase::Review => 100,
    }
}

#[derive(Debug, Clone)]
pub struct PhaseStateMachine {
    ready_completeness: f64,
    force_min_experiences: usize,
    force_high_confidence_experiences: usize,
    force_confidence: f64,
}

impl PhaseStateMachine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            ready_completeness: config.ready_completeness,
            force_min_experiences: config.force_min_experiences,
            force_high_confidence_experiences: config.force_high_confidence_experiences,
            force_confidence: config.force_confidence,
        }
    }

    pub fn is_ready(&self, metrics: &QualityMetrics, completeness: f64) -> bool {
        metrics.level.is_good_or_better() && completeness >= self.ready_completeness
    }

    /// `experiences` is the profile's list including anything this turn adds.
    fn force_reason(&self, experiences: &[Experience]) -> Option<ForceReason> {
        if experiences.len() >= self.force_min_experiences {
            return Some(ForceReason::ExperienceCount);
        }
        if experiences.len() >= self.force_high_confidence_experiences {
            let mean = experiences.iter().map(|e| e.confidence).sum::<f64>()
                / experiences.len() as f64;
            if mean > self.force_confidence {
                return Some(ForceReason::HighConfidence);
            }
        }
        None
    }

    pub fn decide(
        &self,
        current: Phase,
        metrics: &QualityMetrics,
        completeness: f64,
        experiences: &[Experience],
    ) -> PhaseDecision {
        let decision = self.choose(current, metrics, completeness, experiences);
        debug_assert!(
            !decision.changed() || current.can_transition_to(decision.target()),
            "illegal transition {current} -> {}",
            decision.target()
        );
        decision
    }

    fn choose(
        &self,
        current: Phase,
        metrics: &QualityMetrics,
        completeness: f64,
        experiences: &[Experience],
    ) -> PhaseDecision {
        if current < Phase::Synthesis {
            if let Some(reason) = self.force_reason(experiences) {
                info!(from = %current, ?reason, "force-advancing to synthesis");
                return PhaseDecision::ForceAdvance {
                    from: current,
                    to: Phase::Synthesis,
                    reason,
                };
            }
        }

        if !self.is_ready(metrics, completeness) {
            return PhaseDecision::Stay { phase: current };
        }

        match current.next() {
            Some(next) => {
                info!(from = %current, to = %next, "advancing phase");
                PhaseDecision::Advance {
                    from: current,
                    to: next,
                }
            }
            None => PhaseDecision::Stay { phase: current },
        }
    }
}

impl Default for PhaseStateMachine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Car, QualityLevel, Rest};

    fn metrics(level: QualityLevel) -> QualityMetrics {
        QualityMetrics {
            level,
            ..QualityMetrics::default()
        }
    }

    fn experiences(confidences: &[f64]) -> Vec<Experience> {
        confidences
            .iter()
            .enumerate()
            .map(|(i, c)| Experience {
                car: Car::default(),
                rest: Rest::default(),
                confidence: *c,
                turn_index: i as u32 + 1,
            })
            .collect()
    }

    #[test]
    fn test_stays_when_quality_is_low() {
        let d = PhaseStateMachine::default().decide(
            Phase::Introduction,
            &metrics(QualityLevel::Adequate),
            1.0,
            &[],
        );
        assert_eq!(d, PhaseDecision::Stay { phase: Phase::Introduction });
        assert!(!d.changed());
    }

    #[test]
    fn test_stays_when_incomplete() {
        let d = PhaseStateMachine::default().decide(
            Phase::AchievementMining,
            &metrics(QualityLevel::Excellent),
            1.0 / 3.0,
            &[],
        );
        assert_eq!(d.target(), Phase::AchievementMining);
    }

    #[test]
    fn test_advances_one_step_when_ready() {
        let d = PhaseStateMachine::default().decide(
            Phase::StoryDiscovery,
            &metrics(QualityLevel::Good),
            1.0,
            &[],
        );
        assert_eq!(
            d,
            PhaseDecision::Advance {
                from: Phase::StoryDiscovery,
                to: Phase::AchievementMining
            }
        );
    }

    #[test]
    fn test_force_advance_on_experience_count() {
        let d = PhaseStateMachine::default().decide(
            Phase::StoryDiscovery,
            &metrics(QualityLevel::Poor),
            0.0,
            &experiences(&[0.5, 0.5, 0.5]),
        );
        assert_eq!(
            d,
            PhaseDecision::ForceAdvance {
                from: Phase::StoryDiscovery,
                to: Phase::Synthesis,
                reason: ForceReason::ExperienceCount
            }
        );
    }

    #[test]
    fn test_force_advance_on_high_confidence_pair() {
        let machine = PhaseStateMachine::default();
        let d = machine.decide(
            Phase::Introduction,
            &metrics(QualityLevel::Poor),
            0.0,
            &experiences(&[0.85, 0.9]),
        );
        assert_eq!(d.target(), Phase::Synthesis);

        let d = machine.decide(
            Phase::Introduction,
            &metrics(QualityLevel::Poor),
            0.0,
            &experiences(&[0.8, 0.8]),
        );
        assert_eq!(d.target(), Phase::Introduction);
    }

    #[test]
    fn test_no_force_once_at_synthesis() {
        let d = PhaseStateMachine::default().decide(
            Phase::Synthesis,
            &metrics(QualityLevel::Poor),
            0.0,
            &experiences(&[0.9, 0.9, 0.9, 0.9]),
        );
        assert_eq!(d, PhaseDecision::Stay { phase: Phase::Synthesis });
    }

    #[test]
    fn test_review_is_terminal() {
        let d = PhaseStateMachine::default().decide(
            Phase::Review,
            &metrics(QualityLevel::Excellent),
            1.0,
            &[],
        );
        assert_eq!(d, PhaseDecision::Stay { phase: Phase::Review });
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let config = EngineConfig {
            force_min_experiences: 5,
            ..EngineConfig::default()
        };
        let d = PhaseStateMachine::new(&config).decide(
            Phase::Introduction,
            &metrics(QualityLevel::Poor),
            0.0,
            &experiences(&[0.5, 0.5, 0.5]),
        );
        assert_eq!(d.target(), Phase::Introduction);
    }

    #[test]
    fn test_every_decision_is_a_legal_transition() {
        let machine = PhaseStateMachine::default();
        let phases = [
            Phase::Introduction,
            Phase::StoryDiscovery,
            Phase::AchievementMining,
            Phase::Quantification,
            Phase::Synthesis,
            Phase::Review,
        ];
        for current in phases {
            for level in [QualityLevel::Poor, QualityLevel::Good, QualityLevel::Excellent] {
                for history in [experiences(&[]), experiences(&[0.9, 0.9, 0.9])] {
                    let d = machine.decide(current, &metrics(level), 1.0, &history);
                    if d.changed() {
                        assert!(current.can_transition_to(d.target()), "{current} -> {}", d.target());
                    } else {
                        assert_eq!(d.target(), current);
                    }
                }
            }
        }
    }

    #[test]
    fn test_completeness_fractions() {
        let presence = ElementPresence {
            context: true,
            action: true,
            ..ElementPresence::default()
        };
        assert!((completeness(Phase::AchievementMining, &presence) - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(completeness(Phase::Introduction, &presence), 0.0);
        assert_eq!(completeness(Phase::Review, &presence), 1.0);
    }

    #[test]
    fn test_progress_lookup() {
        assert_eq!(progress_percentage(Phase::Introduction, 0.0), 10);
        assert_eq!(progress_percentage(Phase::StoryDiscovery, 0.0), 25);
        assert_eq!(progress_percentage(Phase::StoryDiscovery, 1.0), 35);
        assert_eq!(progress_percentage(Phase::AchievementMining, 0.4), 50);
        assert_eq!(progress_percentage(Phase::AchievementMining, 0.7), 70);
        assert_eq!(progress_percentage(Phase::Quantification, 0.3), 70);
        assert_eq!(progress_percentage(Phase::Quantification, 0.9), 85);
        assert_eq!(progress_percentage(Phase::Synthesis, 0.0), 90);
        assert_eq!(progress_percentage(Phase::Review, 0.0), 100);
    }

    #[test]
    fn test_decision_serialises_tagged() {
        let json = serde_json::to_value(PhaseDecision::Stay {
            phase: Phase::Quantification,
        })
        .unwrap();
        assert_eq!(json["kind"], "stay");
        assert_eq!(json["phase"], "quantification");
    }
}
