//! Quality scoring — rates a single user turn on clarity, specificity,
//! achievement density and quantification.
//!
//! Pure and deterministic. Empty input scores zero on every dimension.

use std::collections::HashSet;

use crate::models::{QualityLevel, QualityMetrics};
use crate::scoring::quantity::{self, QuantityKind};
use crate::text;

#[derive(Debug, Clone)]
pub struct QualityWeights {
    pub clarity: f64,
    pub specificity: f64,
    pub achievement_density: f64,
    pub quantification: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            clarity: 0.25,
            specificity: 0.25,
            achievement_density: 0.30,
            quantification: 0.20,
        }
    }
}

const CONNECTIVES: &[&str] = &[
    "because",
    "therefore",
    "so that",
    "as a result",
    "which meant",
    "consequently",
    "since",
    "thus",
    "which led to",
];

const EXAMPLE_MARKERS: &[&str] = &["for example", "for instance", "specifically", "such as"];

const FILLER_WORDS: &[&str] = &[
    "um",
    "uh",
    "like",
    "basically",
    "actually",
    "just",
    "really",
    "kind of",
    "sort of",
    "you know",
    "stuff",
    "whatever",
];

const TECHNICAL_VERBS: &[&str] = &[
    "implemented",
    "architected",
    "optimized",
    "deployed",
    "migrated",
    "automated",
    "integrated",
    "configured",
    "refactored",
    "engineered",
    "analyzed",
    "designed",
    "developed",
    "scaled",
    "debugged",
    "benchmarked",
    "modeled",
    "prototyped",
];

const ACHIEVEMENT_VERBS: &[&str] = &[
    "achieved",
    "achieve",
    "delivered",
    "improved",
    "led",
    "built",
    "launched",
    "increased",
    "reduced",
    "created",
    "developed",
    "designed",
    "implemented",
    "managed",
    "grew",
    "saved",
    "generated",
    "won",
    "exceeded",
    "optimized",
    "streamlined",
    "transformed",
    "spearheaded",
    "drove",
    "established",
    "negotiated",
    "accelerated",
    "boosted",
    "shipped",
    "founded",
    "pioneered",
    "expanded",
    "redesigned",
    "rebuilt",
    "automated",
    "secured",
];

const MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const PRONOUN_TOKENS: &[&str] = &["I", "I'm", "I've", "I'd", "I'll"];

const STOP_WORDS: &[&str] = &[
    "that", "this", "with", "from", "have", "were", "which", "there", "their", "they", "them",
    "then", "than", "what", "when", "where", "would", "could", "should", "about", "into", "also",
    "very", "some",
];

const DENSITY_SCALE: f64 = 8.0;
const READABLE_SENTENCE_WORDS: std::ops::RangeInclusive<f64> = 12.0..=20.0;
const FILLER_THRESHOLD: usize = 2;
const SHORT_ANSWER_TOKENS: usize = 50;

/// Scores `input`. `previous` is the prior turn, if any; it only feeds the
/// informational `context_overlap` field.
pub fn score_quality(input: &str, previous: Option<&str>) -> QualityMetrics {
    score_quality_with(input, previous, &QualityWeights::default())
}

pub fn score_quality_with(
    input: &str,
    previous: Option<&str>,
    weights: &QualityWeights,
) -> QualityMetrics {
    if input.trim().is_empty() {
        return QualityMetrics {
            suggestions: vec![
                "Share a few sentences about your work so there is something to build on."
                    .to_string(),
            ],
            ..QualityMetrics::default()
        };
    }

    let tokens = text::tokens(input);
    let normalized = text::normalized(input);
    let sentences = text::sentences(input);

    let clarity = clarity_score(&normalized, tokens.len(), sentences.len());
    let specificity = specificity_score(&sentences, &tokens);
    let achievement_density = achievement_density_score(&tokens);
    let quantification = quantification_score(input);

    let overall = (weights.clarity * clarity
        + weights.specificity * specificity
        + weights.achievement_density * achievement_density
        + weights.quantification * quantification)
        .clamp(0.0, 1.0);

    let suggestions = build_suggestions(
        clarity,
        specificity,
        achievement_density,
        quantification,
        tokens.len(),
    );

    QualityMetrics {
        clarity,
        specificity,
        achievement_density,
        quantification,
        overall,
        level: QualityLevel::from_overall(overall),
        suggestions,
        token_count: tokens.len(),
        context_overlap: previous.map(|p| content_overlap(input, p)),
    }
}

fn clarity_score(normalized: &str, token_count: usize, sentence_count: usize) -> f64 {
    let mut score = 0.5;

    if sentence_count > 0 {
        let mean_len = token_count as f64 / sentence_count as f64;
        if READABLE_SENTENCE_WORDS.contains(&mean_len) {
            score += 0.2;
        }
    }

    let connectives = text::count_phrases(normalized, CONNECTIVES);
    score += (connectives as f64 * 0.05).min(0.15);

    if EXAMPLE_MARKERS
        .iter()
        .any(|m| text::contains_phrase(normalized, m))
    {
        score += 0.1;
    }

    if text::count_phrases(normalized, FILLER_WORDS) > FILLER_THRESHOLD {
        score -= 0.2;
    }

    score.clamp(0.0, 1.0)
}

fn specificity_score(sentences: &[String], tokens: &[String]) -> f64 {
    let proper_nouns: usize = sentences
        .iter()
        .map(|s| {
            text::raw_tokens(s)
                .into_iter()
                .skip(1)
                .filter(|t| is_proper_noun_like(t))
                .count()
        })
        .sum();

    let numeric = tokens
        .iter()
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()))
        .count();

    let technical = tokens
        .iter()
        .filter(|t| TECHNICAL_VERBS.contains(&t.as_str()))
        .count();

    let dates = tokens.iter().filter(|t| is_date_token(t)).count();

    let score = 0.4
        + (proper_nouns as f64 * 0.05).min(0.2)
        + (numeric as f64 * 0.05).min(0.2)
        + (technical as f64 * 0.03).min(0.15)
        + (dates as f64 * 0.05).min(0.1);
    score.clamp(0.0, 1.0)
}

fn is_proper_noun_like(token: &str) -> bool {
    if PRONOUN_TOKENS.contains(&token) {
        return false;
    }
    token
        .chars()
        .next()
        .map(|c| c.is_uppercase())
        .unwrap_or(false)
        && token.chars().any(|c| c.is_alphabetic())
}

fn is_date_token(token: &str) -> bool {
    if MONTHS.contains(&token) {
        return true;
    }
    let is_year = token.len() == 4
        && token.chars().all(|c| c.is_ascii_digit())
        && (token.starts_with("19") || token.starts_with("20"));
    let is_quarter = token.len() == 2 && token.starts_with('q') && matches!(&token[1..], "1" | "2" | "3" | "4");
    is_year || is_quarter
}

fn achievement_density_score(tokens: &[String]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let hits = tokens
        .iter()
        .filter(|t| ACHIEVEMENT_VERBS.contains(&t.as_str()))
        .count();
    (hits as f64 / tokens.len() as f64 * DENSITY_SCALE).clamp(0.0, 1.0)
}

/// Per-family weight and cap for the quantification score.
fn family_weight(kind: QuantityKind) -> (f64, f64) {
    match kind {
        QuantityKind::Percentage => (0.3, 0.4),
        QuantityKind::Currency => (0.3, 0.4),
        QuantityKind::TimeSpan => (0.15, 0.3),
        QuantityKind::HeadCount => (0.15, 0.3),
        QuantityKind::Multiplier => (0.2, 0.3),
        QuantityKind::ChangeBy => (0.2, 0.3),
    }
}

pub fn quantification_score(input: &str) -> f64 {
    QuantityKind::ALL
        .iter()
        .map(|kind| {
            let (weight, cap) = family_weight(*kind);
            (quantity::count(input, *kind) as f64 * weight).min(cap)
        })
        .sum::<f64>()
        .clamp(0.0, 1.0)
}

fn build_suggestions(
    clarity: f64,
    specificity: f64,
    achievement_density: f64,
    quantification: f64,
    token_count: usize,
) -> Vec<String> {
    let mut suggestions = Vec::new();
    if clarity < 0.6 {
        suggestions.push(
            "Explain the why: connect what you did to the outcome with words like 'because' or 'as a result'."
                .to_string(),
        );
    }
    if specificity < 0.5 {
        suggestions.push(
            "Name specifics: the company, product, tools, or dates involved.".to_string(),
        );
    }
    if achievement_density < 0.3 {
        suggestions.push(
            "Lead with strong action verbs such as 'led', 'built', 'launched', or 'delivered'."
                .to_string(),
        );
    }
    if quantification < 0.4 {
        suggestions.push(
            "Add numbers: percentages, revenue, time saved, or the number of people involved."
                .to_string(),
        );
    }
    if token_count < SHORT_ANSWER_TOKENS {
        suggestions.push(
            "Say a little more. A few more sentences of detail make the story easier to quantify."
                .to_string(),
        );
    }
    suggestions
}

fn content_words(input: &str) -> HashSet<String> {
    text::tokens(input)
        .into_iter()
        .filter(|t| t.len() > 3 && !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// Jaccard overlap of content words.
fn content_overlap(input: &str, previous: &str) -> f64 {
    let a = content_words(input);
    let b = content_words(previous);
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    (a.intersection(&b).count() as f64 / union as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRONG_TURN: &str = "At Stripe in 2021 our checkout conversion was falling because \
        the payment page was slow. I led 4 engineers and rebuilt the service in 3 months. \
        As a result we increased conversion by 18% and saved $400,000 per year.";

    fn assert_in_unit_range(m: &QualityMetrics) {
        for v in [
            m.clarity,
            m.specificity,
            m.achievement_density,
            m.quantification,
            m.overall,
        ] {
            assert!((0.0..=1.0).contains(&v), "score out of range: {v}");
        }
    }

    #[test]
    fn test_empty_input_is_all_zero_and_poor() {
        for input in ["", "   ", "\n\t"] {
            let m = score_quality(input, None);
            assert_eq!(m.clarity, 0.0);
            assert_eq!(m.specificity, 0.0);
            assert_eq!(m.achievement_density, 0.0);
            assert_eq!(m.quantification, 0.0);
            assert_eq!(m.overall, 0.0);
            assert_eq!(m.level, QualityLevel::Poor);
        }
    }

    #[test]
    fn test_vague_turn_has_no_quantification() {
        let m = score_quality("I helped the team a lot", None);
        assert!(m.quantification.abs() < f64::EPSILON);
        assert_eq!(m.level, QualityLevel::Poor);
        assert_in_unit_range(&m);
    }

    #[test]
    fn test_strong_turn_scores_high() {
        let m = score_quality(STRONG_TURN, None);
        assert_in_unit_range(&m);
        assert!(m.quantification >= 0.8, "quantification was {}", m.quantification);
        assert!(m.specificity > 0.65, "specificity was {}", m.specificity);
        assert!(m.level.is_good_or_better(), "level was {:?} ({})", m.level, m.overall);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let a = score_quality(STRONG_TURN, Some("previous answer"));
        let b = score_quality(STRONG_TURN, Some("previous answer"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_overall_is_fixed_weighted_sum() {
        let m = score_quality(STRONG_TURN, None);
        let expected = 0.25 * m.clarity
            + 0.25 * m.specificity
            + 0.30 * m.achievement_density
            + 0.20 * m.quantification;
        assert!((m.overall - expected.clamp(0.0, 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_fillers_penalise_clarity() {
        let m = score_quality("um so basically I just really did like stuff", None);
        assert!(m.clarity < 0.5, "clarity was {}", m.clarity);
    }

    #[test]
    fn test_example_marker_and_connectives_raise_clarity() {
        let plain = score_quality("I fixed the build", None);
        let explained = score_quality(
            "I fixed the build because releases kept failing, for example on Fridays",
            None,
        );
        assert!(explained.clarity > plain.clarity);
    }

    #[test]
    fn test_short_answer_gets_length_suggestion() {
        let m = score_quality("I led the migration", None);
        assert!(m.suggestions.iter().any(|s| s.contains("Say a little more")));
    }

    #[test]
    fn test_suggestion_order_is_fixed() {
        let m = score_quality("I helped the team a lot", None);
        assert!(m.suggestions.len() >= 4);
        assert!(m.suggestions[0].contains("Explain the why"));
        assert!(m.suggestions.last().unwrap().contains("Say a little more"));
    }

    #[test]
    fn test_context_overlap_only_with_previous() {
        assert!(score_quality(STRONG_TURN, None).context_overlap.is_none());
        let m = score_quality(
            "The checkout service rebuild",
            Some("Tell me about the checkout service"),
        );
        let overlap = m.context_overlap.unwrap();
        assert!(overlap > 0.0 && overlap <= 1.0);
    }

    #[test]
    fn test_quantification_is_capped() {
        let m = score_quality("10% 20% 30% 40% 50% $1 $2 $3 $4 5x 6x 7x", None);
        assert!(m.quantification <= 1.0);
    }
}
