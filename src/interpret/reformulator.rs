//! Fuzzy pre-correction of free-text queries
//!
//! Runs before any structural parsing:
//!
//! 1. Score the whole query against every player full name with
//!    [`partial_ratio`]; keep the best name when it clears the player threshold.
//! 2. Cut the misspelled mention out of the query: the contiguous word span
//!    (1 to name-length + 1 words) whose [`ratio`] against the name is highest,
//!    if that score clears the fragment threshold.
//! 3. Correct each remaining word against the vocabulary with [`ratio`],
//!    replacing it only above the keyword threshold.
//! 4. Prepend the corrected player name.
//!
//! Ties resolve to the earliest candidate: players in directory order,
//! keywords in [`Vocabulary::correction_keywords`] order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::matching::{extract_one, normalize_text, partial_ratio, ratio};
use crate::reference::ReferenceSnapshot;
use crate::vocabulary::Vocabulary;

/// Similarity cut-offs on the 0-100 scale. A candidate must score strictly
/// above its threshold to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    pub player: f64,
    pub fragment: f64,
    pub keyword: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            player: 70.0,
            fragment: 70.0,
            keyword: 85.0,
        }
    }
}

/// Corrects typos in player names and vocabulary words
#[derive(Debug, Clone)]
pub struct QueryReformulator {
    directory: Arc<ReferenceSnapshot>,
    vocabulary: Arc<Vocabulary>,
    thresholds: MatchThresholds,
}

impl QueryReformulator {
    pub fn new(directory: Arc<ReferenceSnapshot>, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            directory,
            vocabulary,
            thresholds: MatchThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: MatchThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> MatchThresholds {
        self.thresholds
    }

    /// Rewrite `raw_query` with the player name and keywords corrected.
    /// The result is lowercase and single-spaced.
    pub fn reformulate(&self, raw_query: &str) -> String {
        let query = normalize_text(raw_query);
        if query.is_empty() {
            return query;
        }

        let player = self.match_player(&query);
        let remainder = match player {
            Some(name) => remove_fragment(&query, name, self.thresholds.fragment),
            None => query.clone(),
        };

        let words = remainder.split_whitespace().map(|word| self.correct_word(word));

        let reformulated = player
            .into_iter()
            .chain(words)
            .collect::<Vec<_>>()
            .join(" ");

        if reformulated != query {
            tracing::debug!(from = %query, to = %reformulated, "Reformulated query");
        }
        reformulated
    }

    /// Best player full-name key for the whole query, if it clears the threshold
    pub fn match_player(&self, query: &str) -> Option<&str> {
        let best = extract_one(query, self.directory.player_keys(), partial_ratio)?;
        (best.score > self.thresholds.player).then_some(best.candidate)
    }

    fn correct_word<'a>(&'a self, word: &'a str) -> &'a str {
        match extract_one(word, self.vocabulary.correction_keywords(), ratio) {
            Some(best) if best.score > self.thresholds.keyword => best.candidate,
            _ => word,
        }
    }
}

/// Remove the word span of `query` that best matches `fragment`.
///
/// Spans of 1 to `words(fragment) + 1` words are tried from left to right;
/// the first span with the highest [`ratio`] wins and is removed only when
/// that score exceeds `threshold`. Returns the remaining words lowercased and
/// space-joined.
pub fn remove_fragment(query: &str, fragment: &str, threshold: f64) -> String {
    let fragment = normalize_text(fragment);
    let query = normalize_text(query);
    let mut words: Vec<&str> = query.split(' ').filter(|w| !w.is_empty()).collect();
    let max_span = fragment.split(' ').count() + 1;

    let mut best: Option<(usize, usize, f64)> = None;
    for start in 0..words.len() {
        let longest = max_span.min(words.len() - start);
        for len in 1..=longest {
            let score = ratio(&words[start..start + len].join(" "), &fragment);
            if best.map_or(true, |(_, _, s)| score > s) {
                best = Some((start, len, score));
            }
        }
    }

    if let Some((start, len, score)) = best {
        if score > threshold {
            words.drain(start..start + len);
        }
    }

    words.join(" ")
}
