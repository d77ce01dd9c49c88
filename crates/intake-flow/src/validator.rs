//! Normalization and checks for the collected request fields.

use std::sync::OnceLock;

use regex::Regex;

use crate::ui_text::CATEGORY_LABELS;

const MIN_DESCRIPTION_CHARS: usize = 3;

fn plate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-ZА-ЯІЇЄ0-9]{5,10}$").expect("plate pattern is a valid regex")
    })
}

/// Uppercases `text` and drops every whitespace and hyphen character.
pub fn normalize_identifier(text: &str) -> String {
    text.chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Advisory plate check: 5 to 10 Latin capitals, regional Cyrillic capitals or digits.
pub fn looks_like_identifier(normalized: &str) -> bool {
    plate_pattern().is_match(normalized)
}

pub fn is_known_category(text: &str) -> bool {
    CATEGORY_LABELS.contains(&text)
}

pub fn is_description_acceptable(text: &str) -> bool {
    text.trim().chars().count() >= MIN_DESCRIPTION_CHARS
}
