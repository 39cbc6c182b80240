//! Phrase matching over token streams
//!
//! Finds known multi-word phrases in a tokenized query. Matching is
//! leftmost-longest: scanning left to right, the longest phrase starting at the
//! current token wins, and the scan resumes after it, so matches never overlap.

use std::collections::HashMap;

use smallvec::SmallVec;

/// A phrase found in a token stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch<T> {
    /// Index of the first matched token
    pub start: usize,
    /// Index one past the last matched token
    pub end: usize,
    /// Payload registered with the phrase
    pub value: T,
}

impl<T> PhraseMatch<T> {
    /// The matched tokens joined by single spaces
    pub fn text(&self, tokens: &[String]) -> String {
        tokens[self.start..self.end].join(" ")
    }
}

/// Longest non-overlapping phrase matcher keyed by first token.
#[derive(Debug, Clone)]
pub struct PhraseMatcher<T> {
    /// First token → candidate phrases, longest first
    by_first_token: HashMap<String, SmallVec<[(Vec<String>, T); 4]>>,
    len: usize,
}

impl<T> Default for PhraseMatcher<T> {
    fn default() -> Self {
        Self {
            by_first_token: HashMap::new(),
            len: 0,
        }
    }
}

impl<T: Clone> PhraseMatcher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tokenized phrase. Empty phrases and phrases already
    /// registered are ignored; the first registration keeps its payload.
    pub fn add(&mut self, tokens: Vec<String>, value: T) {
        let Some(first) = tokens.first().cloned() else {
            return;
        };

        let bucket = self.by_first_token.entry(first).or_default();
        if bucket.iter().any(|(existing, _)| existing == &tokens) {
            return;
        }

        // Keep longest first; equal lengths keep insertion order
        let pos = bucket
            .iter()
            .position(|(existing, _)| existing.len() < tokens.len())
            .unwrap_or(bucket.len());
        bucket.insert(pos, (tokens, value));
        self.len += 1;
    }

    /// Number of registered phrases
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Find all leftmost-longest, non-overlapping matches in token order.
    pub fn find_all(&self, tokens: &[String]) -> Vec<PhraseMatch<T>> {
        let mut matches = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            match self.longest_at(tokens, i) {
                Some((len, value)) => {
                    matches.push(PhraseMatch {
                        start: i,
                        end: i + len,
                        value: value.clone(),
                    });
                    i += len;
                }
                None => i += 1,
            }
        }

        matches
    }

    /// First match in token order, if any.
    pub fn find_first(&self, tokens: &[String]) -> Option<PhraseMatch<T>> {
        (0..tokens.len()).find_map(|i| {
            self.longest_at(tokens, i).map(|(len, value)| PhraseMatch {
                start: i,
                end: i + len,
                value: value.clone(),
            })
        })
    }

    fn longest_at(&self, tokens: &[String], start: usize) -> Option<(usize, &T)> {
        let candidates = self.by_first_token.get(&tokens[start])?;
        candidates.iter().find_map(|(phrase, value)| {
            let end = start + phrase.len();
            (end <= tokens.len() && tokens[start..end] == phrase[..])
                .then_some((phrase.len(), value))
        })
    }
}

impl<T: Clone> FromIterator<(Vec<String>, T)> for PhraseMatcher<T> {
    fn from_iter<I: IntoIterator<Item = (Vec<String>, T)>>(iter: I) -> Self {
        let mut matcher = Self::new();
        for (tokens, value) in iter {
            matcher.add(tokens, value);
        }
        matcher
    }
}
