//! Quantity pattern families shared by the quantification score and REST
//! extraction. Patterns are data; they are compiled once on first use.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityKind {
    Percentage,
    Currency,
    TimeSpan,
    HeadCount,
    Multiplier,
    ChangeBy,
}

impl QuantityKind {
    pub const ALL: [QuantityKind; 6] = [
        QuantityKind::Percentage,
        QuantityKind::Currency,
        QuantityKind::TimeSpan,
        QuantityKind::HeadCount,
        QuantityKind::Multiplier,
        QuantityKind::ChangeBy,
    ];
}

const QUANTITY_PATTERNS: &[(QuantityKind, &str)] = &[
    (QuantityKind::Percentage, r"(?i)\b\d+(?:\.\d+)?\s?(?:%|percent\b)"),
    (
        QuantityKind::Currency,
        r"(?i)[$€£¥]\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:k|m|mm|million|billion|bn)\b)?",
    ),
    (
        QuantityKind::Currency,
        r"(?i)\b\d[\d,]*(?:\.\d+)?\s?(?:k|m|million|billion)?\s?(?:dollars|usd|euros?|pounds|gbp)\b",
    ),
    (
        QuantityKind::TimeSpan,
        r"(?i)\b\d+(?:\.\d+)?\s?-?\s?(?:seconds?|minutes?|mins?|hours?|hrs?|days?|weeks?|months?|quarters?|years?|yrs?)\b",
    ),
    (
        QuantityKind::HeadCount,
        r"(?i)\b\d[\d,]*\+?\s(?:[a-z\-]+\s)?(?:people|persons|engineers|developers|members|employees|staff|users|customers|clients|reports|designers|analysts|stakeholders|teams|students|volunteers|countries|offices|markets)\b",
    ),
    (QuantityKind::Multiplier, r"(?i)\b\d+(?:\.\d+)?\s?(?:x|times)\b"),
    (
        QuantityKind::ChangeBy,
        r"(?i)\b(?:increased|reduced|decreased|cut|grew|improved|boosted|raised|lowered|dropped|expanded|accelerated)\b[^.!?]{0,40}?\bby\s+(?:[$€£]\s?)?\d",
    ),
];

struct CompiledQuantity {
    kind: QuantityKind,
    regex: Regex,
}

fn compiled() -> &'static Vec<CompiledQuantity> {
    static PATTERNS: OnceLock<Vec<CompiledQuantity>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        QUANTITY_PATTERNS
            .iter()
            .filter_map(|(kind, pattern)| {
                Regex::new(pattern).ok().map(|regex| CompiledQuantity {
                    kind: *kind,
                    regex,
                })
            })
            .collect()
    })
}

/// Number of matches of one family in `text`.
pub fn count(text: &str, kind: QuantityKind) -> usize {
    compiled()
        .iter()
        .filter(|p| p.kind == kind)
        .map(|p| p.regex.find_iter(text).count())
        .sum()
}

/// First matched fragment of one family, if any.
pub fn find(text: &str, kind: QuantityKind) -> Option<String> {
    compiled()
        .iter()
        .filter(|p| p.kind == kind)
        .find_map(|p| p.regex.find(text))
        .map(|m| m.as_str().trim().to_string())
}

pub fn has_any(text: &str, kinds: &[QuantityKind]) -> bool {
    kinds.iter().any(|k| count(text, *k) > 0)
}
