//! CAR extraction — assigns each sentence of a turn to Context, Action or
//! Result by indicator-word scoring.
//!
//! Extraction never fails. A category with no indicator sentence falls back to
//! its positional sentence (1st/2nd/3rd) if that sentence is unclaimed, and
//! finally to placeholder text.

use serde::{Deserialize, Serialize};

use crate::models::profile::{ACTION_PLACEHOLDER, CONTEXT_PLACEHOLDER, RESULT_PLACEHOLDER};
use crate::models::Car;
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Indicator,
    Positional,
    Placeholder,
}

impl FieldSource {
    pub fn weight(&self) -> f64 {
        match self {
            FieldSource::Indicator => 1.0,
            FieldSource::Positional => 0.5,
            FieldSource::Placeholder => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Context = 0,
    Action = 1,
    Result = 2,
}

const CATEGORIES: [Category; 3] = [Category::Context, Category::Action, Category::Result];

const CONTEXT_CUES: &[&str] = &[
    "when",
    "faced",
    "facing",
    "challenge",
    "challenges",
    "problem",
    "problems",
    "situation",
    "struggling",
    "declining",
    "falling",
    "needed",
    "goal",
    "issue",
    "issues",
    "previously",
    "initially",
    "background",
    "at the time",
    "was losing",
    "were losing",
    "our company",
    "our team",
    "joined",
    "inherited",
    "backlog",
    "bottleneck",
    "legacy",
    "context",
];

const STRONG_ACTION_VERBS: &[&str] = &[
    "led",
    "architected",
    "spearheaded",
    "drove",
    "founded",
    "pioneered",
    "owned",
    "championed",
    "orchestrated",
    "overhauled",
];

const ACTION_VERBS: &[&str] = &[
    "designed",
    "built",
    "implemented",
    "developed",
    "created",
    "launched",
    "managed",
    "organized",
    "introduced",
    "automated",
    "negotiated",
    "rebuilt",
    "redesigned",
    "established",
    "coordinated",
    "wrote",
    "set up",
    "ran",
    "trained",
    "mentored",
    "migrated",
    "refactored",
    "deployed",
    "initiated",
    "proposed",
    "analyzed",
    "hired",
];

const RESULT_VERBS: &[&str] = &[
    "increased",
    "reduced",
    "saved",
    "improved",
    "grew",
    "resulted",
    "achieved",
    "generated",
    "boosted",
    "cut",
    "decreased",
    "doubled",
    "tripled",
    "raised",
    "lowered",
    "won",
    "exceeded",
    "delivered",
    "as a result",
    "outcome",
    "impact",
];

/// CAR fields together with where each one came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CarExtraction {
    pub car: Car,
    pub context_source: FieldSource,
    pub action_source: FieldSource,
    pub result_source: FieldSource,
    /// 1.0 for a strong ownership verb, 0.6 for a regular action verb, else 0.
    pub action_strength: f64,
}

impl CarExtraction {
    pub fn sourcing_score(&self) -> f64 {
        (self.context_source.weight() + self.action_source.weight() + self.result_source.weight())
            / 3.0
    }
}

fn category_scores(sentence: &str) -> [usize; 3] {
    let normalized = text::normalized(sentence);
    [
        text::count_phrases(&normalized, CONTEXT_CUES),
        text::count_phrases(&normalized, ACTION_VERBS)
            + text::count_phrases(&normalized, STRONG_ACTION_VERBS),
        text::count_phrases(&normalized, RESULT_VERBS),
    ]
}

pub fn action_strength(sentence: &str) -> f64 {
    let normalized = text::normalized(sentence);
    if STRONG_ACTION_VERBS
        .iter()
        .any(|v| text::contains_phrase(&normalized, v))
    {
        1.0
    } else if ACTION_VERBS
        .iter()
        .any(|v| text::contains_phrase(&normalized, v))
    {
        0.6
    } else {
        0.0
    }
}

/// Highest non-zero category; ties go to context, then action, then result.
fn best_category(scores: &[usize; 3]) -> Option<Category> {
    CATEGORIES
        .iter()
        .copied()
        .filter(|c| scores[*c as usize] > 0)
        .fold(None, |best: Option<Category>, c| match best {
            Some(b) if scores[b as usize] >= scores[c as usize] => Some(b),
            _ => Some(c),
        })
}

pub fn extract_car(turn: &str) -> CarExtraction {
    let sentences = text::sentences(turn);
    // slot per category: (sentence index, source)
    let mut slots: [Option<(usize, FieldSource)>; 3] = [None; 3];
    let mut claimed = vec![false; sentences.len()];

    for (i, sentence) in sentences.iter().enumerate() {
        // A sentence only competes for its best category. If that slot is
        // already taken the sentence stays free for positional fallback.
        let Some(category) = best_category(&category_scores(sentence)) else {
            continue;
        };
        if slots[category as usize].is_none() {
            slots[category as usize] = Some((i, FieldSource::Indicator));
            claimed[i] = true;
        }
    }

    for category in CATEGORIES {
        let idx = category as usize;
        if slots[idx].is_none() && idx < sentences.len() && !claimed[idx] {
            slots[idx] = Some((idx, FieldSource::Positional));
            claimed[idx] = true;
        }
    }

    let field = |category: Category, placeholder: &str| -> (String, FieldSource) {
        match slots[category as usize] {
            Some((i, source)) => (sentences[i].clone(), source),
            None => (placeholder.to_string(), FieldSource::Placeholder),
        }
    };

    let (context, context_source) = field(Category::Context, CONTEXT_PLACEHOLDER);
    let (action, action_source) = field(Category::Action, ACTION_PLACEHOLDER);
    let (results, result_source) = field(Category::Result, RESULT_PLACEHOLDER);

    let action_strength = match action_source {
        FieldSource::Placeholder => 0.0,
        _ => action_strength(&action),
    };

    CarExtraction {
        car: Car {
            context,
            action,
            results,
        },
        context_source,
        action_source,
        result_source,
        action_strength,
    }
}
