//! Text normalization and tokenization
//!
//! Every string that is compared against a table (queries, player names, team
//! names, vocabulary phrases) goes through the same pipeline:
//! - Unicode NFKC fold
//! - Lowercase conversion
//! - Whitespace split
//! - Leading/trailing punctuation stripped from each word
//!
//! Punctuation inside a word is kept, so "pull-up", "3-pointer" and
//! "gilgeous-alexander" stay single tokens.

use unicode_normalization::UnicodeNormalization;

/// Capability that turns free text into normalized tokens.
pub trait Tokenizer: Send + Sync {
    /// Split `text` into a sequence of normalized tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Default whitespace/punctuation tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize(text)
    }
}

/// Unicode-fold and lowercase text, collapsing runs of whitespace.
///
/// # Examples
///
/// ```
/// use highlight_search::matching::normalize::normalize_text;
///
/// assert_eq!(normalize_text("  LeBron   James "), "lebron james");
/// ```
pub fn normalize_text(s: &str) -> String {
    let folded: String = s.nfkc().collect();
    folded
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokenize text for table lookup.
pub fn tokenize(s: &str) -> Vec<String> {
    normalize_text(s)
        .split(' ')
        .map(trim_token)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Canonical lookup key for a multi-word name ("Jaren Jackson Jr." → "jaren jackson jr").
pub fn normalize_key(s: &str) -> String {
    tokenize(s).join(" ")
}

fn trim_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}
