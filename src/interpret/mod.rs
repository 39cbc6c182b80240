//! Query interpretation
//!
//! Turns free text into a [`ParsedQuery`]:
//!
//! ```text
//! raw text → stopword removal → QueryReformulator → EntityExtractor → ParsedQuery
//! ```
//!
//! Every stage reads only the immutable reference and vocabulary tables, so a
//! [`QueryInterpreter`] can be shared across threads behind an `Arc`.

pub mod extractor;
pub mod reformulator;
pub mod types;

pub use extractor::{extract_season_type, EntityExtractor};
pub use reformulator::{remove_fragment, MatchThresholds, QueryReformulator};
pub use types::{ClutchWindow, ContextMeasure, ParsedQuery, ScoreSpecifier, SeasonType, ANY_MONTH};

use std::collections::HashSet;
use std::sync::Arc;

use crate::matching::normalize_text;
use crate::reference::ReferenceSnapshot;
use crate::vocabulary::Vocabulary;

/// Words dropped before reformulation
pub const DEFAULT_STOPWORDS: [&str; 3] = ["the", "a", "an"];

/// Full interpretation pipeline
pub struct QueryInterpreter {
    stopwords: HashSet<String>,
    reformulator: QueryReformulator,
    extractor: EntityExtractor,
}

impl QueryInterpreter {
    pub fn new(directory: Arc<ReferenceSnapshot>, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            reformulator: QueryReformulator::new(directory.clone(), vocabulary.clone()),
            extractor: EntityExtractor::new(directory, vocabulary),
        }
    }

    pub fn with_thresholds(mut self, thresholds: MatchThresholds) -> Self {
        self.reformulator = self.reformulator.with_thresholds(thresholds);
        self
    }

    pub fn with_stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords = stopwords
            .into_iter()
            .map(|w| normalize_text(w.as_ref()))
            .collect();
        self
    }

    /// Lowercase the query and drop stopwords
    pub fn preprocess(&self, query: &str) -> String {
        normalize_text(query)
            .split(' ')
            .filter(|w| !w.is_empty() && !self.stopwords.contains(*w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn reformulator(&self) -> &QueryReformulator {
        &self.reformulator
    }

    pub fn extractor(&self) -> &EntityExtractor {
        &self.extractor
    }

    /// Interpret a raw query
    pub fn interpret(&self, query: &str) -> ParsedQuery {
        let cleaned = self.preprocess(query);
        let reformulated = self.reformulator.reformulate(&cleaned);
        self.extractor.extract(&reformulated)
    }
}
