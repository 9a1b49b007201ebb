//! Shared tokenization helpers for the classifier and recovery engine.

/// Words that carry no classification signal and are dropped before keyword
/// scoring. Reference words ("that", "it") are listed here too; they are
/// handled separately via [`has_reference`].
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "at", "can", "could", "do", "for", "in", "is", "it", "me", "my", "of", "on",
    "please", "that", "the", "this", "to", "us", "with", "would", "you",
];

/// Words that refer back to an earlier turn.
const REFERENCE_WORDS: &[&str] = &["that", "it", "this", "again", "last", "previous"];

/// Lowercases and splits `text` into alphanumeric tokens.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| {
            token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Tokens of `text` with stopwords removed.
pub(crate) fn content_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| !STOPWORDS.contains(&token.as_str()))
        .collect()
}

/// Whether any token refers back to an earlier turn ("undo that").
pub(crate) fn has_reference(tokens: &[String]) -> bool {
    tokens
        .iter()
        .any(|token| REFERENCE_WORDS.contains(&token.as_str()))
}

/// Collapses runs of whitespace and lowercases, for phrase-level matching.
pub(crate) fn normalize_phrase(text: &str) -> String {
    tokenize(text).join(" ")
}
