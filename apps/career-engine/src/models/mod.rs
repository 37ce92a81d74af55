pub mod dialogue;
pub mod profile;
pub mod session;

pub use dialogue::{FollowUpStrategy, MissingElement, QualityLevel, QualityMetrics};
pub use profile::{Car, Experience, PersonalStory, Profile, Rest};
pub use session::{Phase, Session};
