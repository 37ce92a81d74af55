use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conversation phases in canonical forward order.
///
/// Introduction → StoryDiscovery → AchievementMining → Quantification →
/// Synthesis → Review. Review is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Introduction,
    StoryDiscovery,
    AchievementMining,
    Quantification,
    Synthesis,
    Review,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Introduction,
        Phase::StoryDiscovery,
        Phase::AchievementMining,
        Phase::Quantification,
        Phase::Synthesis,
        Phase::Review,
    ];

    /// The next phase in the linear progression, if any.
    pub fn next(&self) -> Option<Phase> {
        use Phase::*;
        match self {
            Introduction => Some(StoryDiscovery),
            StoryDiscovery => Some(AchievementMining),
            AchievementMining => Some(Quantification),
            Quantification => Some(Synthesis),
            Synthesis => Some(Review),
            Review => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Review)
    }

    /// Single-step forward moves, plus the forced jump into Synthesis from
    /// any earlier phase.
    pub fn can_transition_to(&self, target: Phase) -> bool {
        if self.next() == Some(target) {
            return true;
        }
        target == Phase::Synthesis && *self < Phase::Synthesis
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Introduction => "introduction",
            Self::StoryDiscovery => "story_discovery",
            Self::AchievementMining => "achievement_mining",
            Self::Quantification => "quantification",
            Self::Synthesis => "synthesis",
            Self::Review => "review",
        };
        write!(f, "{s}")
    }
}

/// A single discovery conversation. Owned by the caller; the engine returns
/// updated copies and never mutates one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub phase: Phase,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub turn_count: u32,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Introduction,
            created_at: Utc::now(),
            completed_at: None,
            turn_count: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
