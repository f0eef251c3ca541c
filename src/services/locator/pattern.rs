use regex::{Regex, RegexBuilder};

use crate::services::normalize;

/// Matches extraction noise between two words: whitespace and straight or
/// curly quotes, nothing else.
const SEPARATOR: &str = "[\\s'\"\u{2018}\u{2019}\u{201C}\u{201D}]*";
const OPENING_QUOTES: &str = "[\u{201C}\u{2018}]*";
const CLOSING_QUOTES: &str = "[\u{201D}\u{2019}]*";

/// Builds the tolerant pattern source for a verse, or `None` when the verse
/// has no tokens (an empty pattern would match anywhere).
///
/// Tokens are escaped, so any verse text yields a valid pattern. Up to
/// `context_words` preceding words are captured for the reviewer.
pub fn pattern_source(text: &str, context_words: usize) -> Option<String> {
    let tokens = normalize::tokens(text);
    if tokens.is_empty() {
        return None;
    }

    let body = tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    let context = if context_words > 0 {
        format!(r"(?:\S+\s+){{0,{context_words}}}")
    } else {
        String::new()
    };

    Some(format!("{context}{OPENING_QUOTES}{body}{CLOSING_QUOTES}"))
}

/// Compiles the case-insensitive pattern for a verse.
pub fn compile(text: &str, context_words: usize) -> Result<Option<Regex>, regex::Error> {
    let Some(source) = pattern_source(text, context_words) else {
        return Ok(None);
    };

    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map(Some)
}
