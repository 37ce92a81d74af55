//! Shared tokenisation helpers used by the scorer, the extractor, and the
//! follow-up policy. All of them agree on what a "word" and a "sentence" is.

/// Whitespace tokens with leading/trailing punctuation stripped. Case is kept.
pub fn raw_tokens(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Lowercased word tokens.
pub fn tokens(text: &str) -> Vec<String> {
    raw_tokens(text).into_iter().map(str::to_lowercase).collect()
}

/// Lowercased tokens joined by single spaces and padded on both sides, so a
/// phrase lookup of `" {phrase} "` only matches on word boundaries.
pub fn normalized(text: &str) -> String {
    format!(" {} ", tokens(text).join(" "))
}

/// Whole-word/phrase containment against the output of [`normalized`].
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    normalized.contains(&format!(" {phrase} "))
}

/// Number of occurrences of each phrase, summed.
pub fn count_phrases(normalized: &str, phrases: &[&str]) -> usize {
    phrases
        .iter()
        .map(|p| normalized.matches(&format!(" {p} ")).count())
        .sum()
}

/// Splits on `.`, `!`, `?` followed by whitespace (or end of text) and on line
/// breaks. Decimal points such as "2.5x" do not split.
pub fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' || c == '\r' {
            push_sentence(&mut out, &mut current);
            continue;
        }
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let boundary = chars.peek().map_or(true, |n| n.is_whitespace());
            if boundary {
                push_sentence(&mut out, &mut current);
            }
        }
    }
    push_sentence(&mut out, &mut current);
    out
}

fn push_sentence(out: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() && trimmed.chars().any(char::is_alphanumeric) {
        out.push(trimmed.to_string());
    }
    current.clear();
}

/// Digits, percent markers, or currency markers anywhere in the text.
pub fn has_numeric_evidence(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_ascii_digit() || matches!(c, '%' | '$' | '€' | '£' | '¥'))
        || contains_phrase(&normalized(text), "percent")
}
