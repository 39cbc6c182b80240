//! Post-fetch result filtering
//!
//! Each [`Predicate`] narrows the row set independently and filtering keeps a
//! row only when every predicate holds, so predicates commute. All of them
//! read the derived scoring columns of [`PlayRecord`].

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::PlayRecord;
use crate::error::QueryError;
use crate::interpret::types::{ClutchWindow, ContextMeasure, ParsedQuery, ScoreSpecifier};

/// Largest pre-play margin that still counts as clutch
pub const DEFAULT_CLUTCH_MARGIN: i32 = 5;

/// What to keep from one category's rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub category: ContextMeasure,
    /// Every specifier must appear in the description as a whole word
    pub shot_specifiers: Vec<String>,
    pub score_specifier: Option<ScoreSpecifier>,
    pub clutch_window: Option<ClutchWindow>,
    /// Attempts narrowed to makes
    pub makes_requested: bool,
    pub clutch_margin: i32,
}

impl FilterCriteria {
    pub fn new(category: ContextMeasure) -> Self {
        Self {
            category,
            shot_specifiers: Vec::new(),
            score_specifier: None,
            clutch_window: None,
            makes_requested: false,
            clutch_margin: DEFAULT_CLUTCH_MARGIN,
        }
    }

    /// Criteria for one category of a parsed query. Shot specifiers only
    /// narrow categories that describe shots (points and attempts).
    pub fn from_parsed(parsed: &ParsedQuery, category: ContextMeasure) -> Self {
        Self {
            category,
            shot_specifiers: parsed.shot_specifiers_for(category).to_vec(),
            score_specifier: parsed.score_specifier,
            clutch_window: parsed.clutch_window,
            makes_requested: parsed.makes_requested,
            clutch_margin: DEFAULT_CLUTCH_MARGIN,
        }
    }

    pub fn with_clutch_margin(mut self, margin: i32) -> Self {
        self.clutch_margin = margin;
        self
    }
}

/// A single row condition
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Description contains the word, case-insensitive
    Describes(Regex),
    /// Score tied after the play
    GameTying,
    /// Leader before and after the play differ
    LeadTaking,
    /// Pre-play margin within the bound
    CloseGame(i32),
    /// No points scored
    Missed,
    /// Points scored
    Made,
}

impl Predicate {
    pub fn matches(&self, row: &PlayRecord) -> bool {
        match self {
            Self::Describes(pattern) => pattern.is_match(&row.description),
            Self::GameTying => row.score_diff_after == 0,
            Self::LeadTaking => row.score_diff_before.signum() * row.score_diff_after.signum() < 0,
            Self::CloseGame(margin) => row.score_diff_before.abs() <= *margin,
            Self::Missed => row.point_change == 0,
            Self::Made => row.point_change > 0,
        }
    }
}

/// Filters rows of one category
#[derive(Debug, Clone)]
pub struct ResultFilter {
    predicates: Vec<Predicate>,
}

impl ResultFilter {
    /// Compile the predicates for `criteria`. Shot specifier patterns are
    /// built here once and reused for every row.
    pub fn new(criteria: &FilterCriteria) -> Result<Self, QueryError> {
        let mut predicates = criteria
            .shot_specifiers
            .iter()
            .map(|s| word_pattern(s).map(Predicate::Describes))
            .collect::<Result<Vec<_>, _>>()?;

        match criteria.score_specifier {
            Some(ScoreSpecifier::GameTying) => predicates.push(Predicate::GameTying),
            Some(ScoreSpecifier::LeadTaking) => predicates.push(Predicate::LeadTaking),
            None => {}
        }

        if criteria.clutch_window.is_some() {
            predicates.push(Predicate::CloseGame(criteria.clutch_margin));
        }

        match criteria.category {
            ContextMeasure::Miss => predicates.push(Predicate::Missed),
            ContextMeasure::Fga if criteria.makes_requested => predicates.push(Predicate::Made),
            _ => {}
        }

        Ok(Self { predicates })
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn keeps(&self, row: &PlayRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }

    /// Keep the rows every predicate accepts, preserving order
    pub fn apply(&self, rows: Vec<PlayRecord>) -> Vec<PlayRecord> {
        rows.into_iter().filter(|row| self.keeps(row)).collect()
    }
}

/// Case-insensitive whole-word pattern for a shot specifier.
///
/// "Dunk" matches "Driving Dunk Shot" but not "Dunked".
pub fn word_pattern(word: &str) -> Result<Regex, QueryError> {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(word.trim()));
    Regex::new(&pattern).map_err(|e| QueryError::InvalidShotSpecifier {
        specifier: word.to_string(),
        message: e.to_string(),
    })
}
