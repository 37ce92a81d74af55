//! Personal story extraction — role identity, audience, and value proposition
//! from the whole conversation so far.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::PersonalStory;
use crate::text;

/// Ordered; the first non-trivial capture wins.
const ROLE_PATTERNS: &[&str] = &[
    r"(?i)\bI(?:'|’)?m (?:a|an|the) ([a-z][a-z0-9 \-/&]{1,60}?)\s+(?:who|that|which)\b",
    r"(?i)\bI am (?:a|an|the) ([a-z][a-z0-9 \-/&]{1,60}?)\s+(?:who|that|which)\b",
    r"(?i)\bAs (?:a|an) ([a-z][a-z0-9 \-/&]{1,60}?),",
    r"(?i)\bI work as (?:a |an |the )?([a-z][a-z0-9 \-/&]{1,60}?)(?:\s+(?:at|for|in|with)\b|[.,;!?\n]|$)",
    r"(?i)\bI(?:'|’)?m (?:a|an) ([a-z][a-z0-9 \-/&]{1,60}?)\s+(?:at|with|for|in)\b",
    r"(?i)\bI am (?:a|an) ([a-z][a-z0-9 \-/&]{1,60}?)\s+(?:at|with|for|in)\b",
    r"(?i)\bI(?:'|’)?m (?:a|an) ([a-z][a-z0-9 \-/&]{1,40}?)(?:[.,;!?\n]|$)",
];

const AUDIENCE_NOUNS: &str = "companies|teams|organizations|organisations|businesses|startups|founders|clients|customers|brands|leaders|executives|enterprises|engineers|developers|people|nonprofits|agencies|retailers|hospitals|schools|governments";

/// Value proposition patterns. Group `aud` is the audience, group `val` the value.
fn value_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let raw = [
            r"(?i)\bhelp(?:s|ing)?\s+(?P<aud>[a-z][a-z0-9 \-&]{1,50}?)\s+(?:to\s+)?achieve\s+(?P<val>[^.,;!?\n]{3,80})"
                .to_string(),
            format!(
                r"(?i)\bhelp(?:s|ing)?\s+(?P<aud>(?:[a-z\-]+\s+){{0,2}}(?:{AUDIENCE_NOUNS}))\s+(?:to\s+)?(?P<val>[^.,;!?\n]{{3,80}})"
            ),
            r"(?i)\bto achieve\s+(?P<val>[^.,;!?\n]{3,80})".to_string(),
            r"(?i)\bspeciali[sz](?:e|es|ed|ing)\s+in\s+(?P<val>[^.,;!?\n]{3,80})".to_string(),
        ];
        raw.iter().filter_map(|p| Regex::new(p).ok()).collect()
    })
}

fn role_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| ROLE_PATTERNS.iter().filter_map(|p| Regex::new(p).ok()).collect())
}

fn audience_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(&format!(
                r"(?i)\b(?:for|with|serve|serving|help(?:s|ing)?)\s+(?P<aud>(?:[a-z\-]+\s+){{0,2}}(?:{AUDIENCE_NOUNS}))\b"
            ))
            .ok()
        })
        .as_ref()
}

/// Whole captures that satisfy the grammar but carry no identity.
const TRIVIAL_ROLES: &[&str] = &["team", "kid", "child", "whole", "group"];

/// Leading words that turn "As a ..." / "I'm a ..." into a figure of speech
/// or a mood rather than a role.
const NON_ROLE_LEADS: &[&str] = &[
    "result",
    "consequence",
    "matter",
    "rule",
    "bonus",
    "side",
    "reminder",
    "first",
    "little",
    "bit",
    "lot",
    "whole",
    "means",
    "part",
    "way",
    "kind",
    "sort",
    "few",
    "couple",
    "quick",
    "favor",
    "courtesy",
];

const BUSINESS_IMPACT_WORDS: &[&str] = &[
    "revenue",
    "profit",
    "growth",
    "customers",
    "market",
    "roi",
    "cost",
    "costs",
    "sales",
    "efficiency",
    "retention",
    "conversion",
    "impact",
    "business",
];

const MAX_ROLE_WORDS: usize = 6;
const DEFAULT_AUDIENCE: &str = "teams";
const MIN_TURNS_FOR_COHERENCE: usize = 3;

fn is_trivial_role(role: &str) -> bool {
    let lower = role.to_lowercase();
    let leading = lower.split_whitespace().next().unwrap_or_default();
    role.len() < 3
        || role.split_whitespace().count() > MAX_ROLE_WORDS
        || TRIVIAL_ROLES.contains(&lower.as_str())
        || NON_ROLE_LEADS.contains(&leading)
}

fn clean(capture: &str) -> String {
    capture
        .trim()
        .trim_end_matches(|c: char| !c.is_alphanumeric())
        .trim()
        .to_string()
}

pub fn extract_role(combined: &str) -> Option<String> {
    role_patterns().iter().find_map(|re| {
        re.captures_iter(combined)
            .filter_map(|caps| caps.get(1).map(|m| clean(m.as_str())))
            .find(|role| !is_trivial_role(role))
    })
}

/// Returns `(audience, value)`; the first pattern producing a value wins.
pub fn extract_value(combined: &str) -> (Option<String>, Option<String>) {
    for re in value_patterns() {
        if let Some(caps) = re.captures(combined) {
            let value = caps
                .name("val")
                .map(|m| clean(m.as_str()))
                .filter(|v| !v.is_empty());
            if let Some(value) = value {
                let audience = caps
                    .name("aud")
                    .map(|m| clean(m.as_str()))
                    .filter(|a| !a.is_empty());
                return (audience, Some(value));
            }
        }
    }
    (None, None)
}

pub fn extract_audience(combined: &str) -> Option<String> {
    audience_pattern()?
        .captures(combined)
        .and_then(|caps| caps.name("aud").map(|m| clean(m.as_str())))
        .filter(|a| !a.is_empty())
}

/// Rebuilds the personal story from every turn so far.
pub fn extract_story(turns: &[String]) -> PersonalStory {
    let combined = turns.join("\n");
    if combined.trim().is_empty() {
        return PersonalStory::default();
    }

    let role_identity = extract_role(&combined);
    let (value_audience, value_proposition) = extract_value(&combined);
    let target_audience = value_audience.or_else(|| extract_audience(&combined));

    let story_statement = match (&role_identity, &value_proposition) {
        (Some(role), Some(value)) => Some(format!(
            "I'm the {role} who helps {} achieve {value}",
            target_audience.as_deref().unwrap_or(DEFAULT_AUDIENCE)
        )),
        _ => None,
    };

    let normalized = text::normalized(&combined);
    let mut coherence_score = 0.0;
    if role_identity.is_some() {
        coherence_score += 0.3;
    }
    if value_proposition.is_some() {
        coherence_score += 0.3;
    }
    if turns.len() >= MIN_TURNS_FOR_COHERENCE {
        coherence_score += 0.2;
    }
    if text::has_numeric_evidence(&combined) {
        coherence_score += 0.1;
    }
    if BUSINESS_IMPACT_WORDS
        .iter()
        .any(|w| text::contains_phrase(&normalized, w))
    {
        coherence_score += 0.1;
    }

    PersonalStory {
        role_identity,
        target_audience,
        value_proposition,
        story_statement,
        coherence_score: f64::min(coherence_score, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turns(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(role_patterns().len(), ROLE_PATTERNS.len());
        assert_eq!(value_patterns().len(), 4);
        assert!(audience_pattern().is_some());
    }

    #[test]
    fn test_full_statement_from_single_turn() {
        let story = extract_story(&turns(&[
            "I'm the product manager who helps startups achieve faster launches",
        ]));
        assert_eq!(story.role_identity.as_deref(), Some("product manager"));
        assert!(story
            .value_proposition
            .as_deref()
            .unwrap()
            .contains("faster launches"));
        assert_eq!(story.target_audience.as_deref(), Some("startups"));
        assert_eq!(
            story.story_statement.as_deref(),
            Some("I'm the product manager who helps startups achieve faster launches")
        );
    }

    #[test]
    fn test_as_a_result_is_not_a_role() {
        assert_eq!(extract_role("As a result, we shipped on time."), None);
    }

    #[test]
    fn test_figures_of_speech_are_not_roles() {
        for text in [
            "As a result of the migration, we shipped 3 releases in 2 months.",
            "As a consequence of the outage, we rewrote the runbooks.",
            "I'm a little nervous about this.",
            "As a rule of thumb, I write tests first.",
            "I'm a bit of a perfectionist.",
        ] {
            assert_eq!(extract_role(text), None, "{text}");
        }
    }

    #[test]
    fn test_team_prefixed_role_is_kept() {
        assert_eq!(
            extract_role("I'm a team lead at a logistics startup.").as_deref(),
            Some("team lead")
        );
    }

    #[test]
    fn test_false_role_does_not_reach_story() {
        let story = extract_story(&turns(&[
            "As a result of the migration, we shipped 3 releases in 2 months.",
        ]));
        assert!(story.role_identity.is_none());
        assert!(story.story_statement.is_none());
    }

    #[test]
    fn test_as_a_role_pattern() {
        assert_eq!(
            extract_role("As a data scientist, I build forecasting models.").as_deref(),
            Some("data scientist")
        );
    }

    #[test]
    fn test_work_as_pattern() {
        assert_eq!(
            extract_role("I work as a site reliability engineer at Shopify.").as_deref(),
            Some("site reliability engineer")
        );
    }

    #[test]
    fn test_role_without_value_has_no_statement() {
        let story = extract_story(&turns(&["I'm a backend engineer at a logistics company."]));
        assert_eq!(story.role_identity.as_deref(), Some("backend engineer"));
        assert!(story.value_proposition.is_none());
        assert!(story.story_statement.is_none());
        assert!((story.coherence_score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_story_combines_turns() {
        let story = extract_story(&turns(&[
            "I'm a designer who loves research.",
            "I specialize in onboarding flows for fintech apps.",
        ]));
        assert_eq!(story.role_identity.as_deref(), Some("designer"));
        assert_eq!(
            story.value_proposition.as_deref(),
            Some("onboarding flows for fintech apps")
        );
        assert_eq!(
            story.story_statement.as_deref(),
            Some("I'm the designer who helps teams achieve onboarding flows for fintech apps")
        );
    }

    #[test]
    fn test_help_audience_pattern() {
        let (aud, val) = extract_value("I help early-stage startups ship reliable software.");
        assert_eq!(aud.as_deref(), Some("early-stage startups"));
        assert_eq!(val.as_deref(), Some("ship reliable software"));
    }

    #[test]
    fn test_coherence_full_marks() {
        let story = extract_story(&turns(&[
            "I'm the growth lead who helps startups achieve faster revenue growth.",
            "We grew revenue 40% last year.",
            "I also mentor two analysts.",
        ]));
        assert!((story.coherence_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_history_is_default() {
        assert_eq!(extract_story(&[]), PersonalStory::default());
    }
}
