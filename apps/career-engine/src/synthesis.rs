//! Resume synthesis — a five-bullet summary from the accumulated profile.
//!
//! Bullet 1 is the story statement. Bullets 2–5 come from the first four
//! experiences in submission order, padded with a generic bullet. The output
//! always has exactly five bullets.

use serde::{Deserialize, Serialize};

use crate::models::{Experience, Profile};

pub const BULLET_COUNT: usize = 5;
const EXPERIENCE_BULLETS: usize = BULLET_COUNT - 1;

const FALLBACK_TITLE: &str = "Professional Profile";
const FALLBACK_STATEMENT: &str =
    "Professional who turns hands-on experience into measurable results for the teams they work with";
const PADDING_BULLET: &str =
    "Collaborates across teams to deliver reliable outcomes and keep commitments";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub bullets: Vec<String>,
}

impl Summary {
    pub fn to_markdown(&self) -> String {
        let mut out = format!("## {}\n\n", self.title);
        for bullet in &self.bullets {
            out.push_str("- ");
            out.push_str(bullet);
            out.push('\n');
        }
        out
    }
}

pub fn build(profile: &Profile) -> Summary {
    let role = profile.personal_story.role_identity.as_deref();

    let title = role.map(title_case).unwrap_or_else(|| FALLBACK_TITLE.to_string());

    let mut bullets = Vec::with_capacity(BULLET_COUNT);
    bullets.push(
        profile
            .personal_story
            .story_statement
            .clone()
            .unwrap_or_else(|| FALLBACK_STATEMENT.to_string()),
    );

    bullets.extend(
        profile
            .experiences
            .iter()
            .take(EXPERIENCE_BULLETS)
            .map(|e| experience_bullet(e, role)),
    );

    while bullets.len() < BULLET_COUNT {
        bullets.push(PADDING_BULLET.to_string());
    }

    Summary { title, bullets }
}

fn experience_bullet(experience: &Experience, role: Option<&str>) -> String {
    if let Some(results) = &experience.rest.results {
        return sentence_case(results);
    }
    if experience.car.has_results() {
        return sentence_case(&experience.car.results);
    }
    format!(
        "Brings hands-on expertise as {}",
        role.unwrap_or("a professional")
    )
}

/// Capitalises the first letter and drops trailing sentence punctuation.
fn sentence_case(text: &str) -> String {
    let trimmed = text
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?'));
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
