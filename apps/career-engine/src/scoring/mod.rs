// Turn quality scoring. No extraction here: the scorer only rates text.

pub mod quality;
pub mod quantity;

pub use quality::{score_quality, QualityWeights};
