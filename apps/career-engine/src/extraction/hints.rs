//! Profile hints — the user's name and the role they are aiming for, when a
//! turn happens to state them.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileHints {
    pub display_name: Option<String>,
    pub target_role: Option<String>,
}

const NAME_PATTERNS: &[&str] = &[
    r"\b[Mm]y name is ([A-Z][a-zA-Z'\-]+(?: [A-Z][a-zA-Z'\-]+)?)",
    r"\b[Cc]all me ([A-Z][a-zA-Z'\-]+)",
];

const TARGET_ROLE_PATTERNS: &[&str] = &[
    r"(?i)\blooking for (?:a|an) ([a-z][a-z0-9 \-/&]{1,50}?) (?:role|position|job)\b",
    r"(?i)\bwant to become (?:a|an) ([a-z][a-z0-9 \-/&]{1,50}?)(?:[.,;!?\n]|$)",
    r"(?i)\btransition into ([a-z][a-z0-9 \-/&]{1,50}?)(?:[.,;!?\n]|$)",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

fn name_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile(NAME_PATTERNS))
}

fn target_role_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile(TARGET_ROLE_PATTERNS))
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

pub fn extract_hints(turn: &str) -> ProfileHints {
    ProfileHints {
        display_name: first_capture(name_patterns(), turn),
        target_role: first_capture(target_role_patterns(), turn),
    }
}
