//! Rule-based sentence segmentation for line-oriented corpus preparation.

use once_cell::sync::Lazy;
use regex::Regex;

static BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["')\]]*\s+"#).expect("valid boundary regex"));

/// Abbreviations that a period does not terminate a sentence after.
const ABBREVIATIONS: &[&str] = &[
    "et al", "Fig", "fig", "Figs", "Dr", "Prof", "vs", "cf", "e.g", "i.e", "approx", "No",
];

/// Split one raw text line into sentences.
///
/// Boundaries are terminal punctuation runs followed by whitespace, with a
/// guard for single-letter initials and common bibliographic abbreviations.
pub fn segment(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in BOUNDARY.find_iter(text) {
        let candidate = &text[start..boundary.end()];
        if ends_with_abbreviation(candidate.trim_end()) {
            continue;
        }
        let sentence = candidate.trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = boundary.end();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

fn ends_with_abbreviation(candidate: &str) -> bool {
    let trimmed = candidate.trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | '"' | '\'' | ')' | ']'));
    let last_word = trimmed
        .rsplit(|c: char| c.is_whitespace())
        .next()
        .unwrap_or("");
    if last_word.len() == 1 && last_word.chars().all(|c| c.is_ascii_uppercase()) {
        return true;
    }
    ABBREVIATIONS.iter().any(|abbr| trimmed.ends_with(abbr))
}
