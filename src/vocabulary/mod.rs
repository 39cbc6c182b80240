//! Query vocabulary tables
//!
//! Compiles a [`VocabularyConfig`] into the lookup structures the
//! interpretation pipeline reads:
//!
//! 1. A term lexicon: normalized keyword → categories it selects and the
//!    canonical shot specifier it names (single tokens in a hash map,
//!    multi-word keywords in a [`PhraseMatcher`])
//! 2. Whole-word regexes for score-specifier and clutch phrases, in table order
//! 3. Month names → season-calendar codes
//! 4. The flat keyword list used for typo correction
//!
//! The compiled tables are immutable and shared by reference.

pub mod config;

pub use config::{
    CategoryDefinition, ClutchDefinition, MonthDefinition, ScoreSpecifierDefinition,
    ShotSpecifierDefinition, VocabularyConfig,
};

use regex::Regex;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::VocabularyError;
use crate::interpret::types::{ClutchWindow, ContextMeasure, ScoreSpecifier};
use crate::matching::{normalize_key, normalize_text, tokenize, PhraseMatch, PhraseMatcher};

/// The default English vocabulary shipped with the crate
pub const BUILTIN_VOCABULARY: &str = include_str!("../../config/vocabulary.yaml");

/// What a keyword means
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Term {
    /// Categories the keyword selects (a keyword may select several)
    pub measures: SmallVec<[ContextMeasure; 2]>,
    /// Canonical shot specifier named by the keyword
    pub shot_specifier: Option<String>,
}

/// Compiled vocabulary
#[derive(Debug, Clone)]
pub struct Vocabulary {
    version: String,
    single_terms: HashMap<String, Term>,
    phrase_terms: PhraseMatcher<Term>,
    score_patterns: Vec<(Regex, ScoreSpecifier)>,
    clutch_patterns: Vec<(Regex, ClutchWindow)>,
    months: HashMap<String, String>,
    makes_keywords: HashSet<String>,
    correction_keywords: Vec<String>,
}

impl Vocabulary {
    /// Compile the vocabulary embedded in the crate
    pub fn builtin() -> Result<Self, VocabularyError> {
        Self::load_from_str(BUILTIN_VOCABULARY)
    }

    /// Load and compile from a YAML file
    pub fn load_from_file(path: &Path) -> Result<Self, VocabularyError> {
        Self::from_config(&VocabularyConfig::load_from_file(path)?)
    }

    /// Load and compile from a YAML string
    pub fn load_from_str(yaml: &str) -> Result<Self, VocabularyError> {
        Self::from_config(&VocabularyConfig::load_from_str(yaml)?)
    }

    /// Compile a parsed configuration
    pub fn from_config(config: &VocabularyConfig) -> Result<Self, VocabularyError> {
        let terms = Self::compile_terms(config);

        let mut single_terms = HashMap::new();
        let mut phrase_terms = PhraseMatcher::new();
        for (key, term) in terms {
            let tokens = tokenize(&key);
            match tokens.len() {
                0 => {}
                1 => {
                    single_terms.insert(key, term);
                }
                _ => phrase_terms.add(tokens, term),
            }
        }

        let score_patterns = config
            .score_specifiers
            .iter()
            .flat_map(|def| def.phrases.iter().map(move |p| (p, def.tag)))
            .map(|(phrase, tag)| Ok((whole_word_regex(phrase)?, tag)))
            .collect::<Result<Vec<_>, VocabularyError>>()?;

        let clutch_patterns = config
            .clutch_windows
            .iter()
            .flat_map(|def| def.phrases.iter().map(move |p| (p, def.window)))
            .map(|(phrase, window)| Ok((whole_word_regex(phrase)?, window)))
            .collect::<Result<Vec<_>, VocabularyError>>()?;

        let mut months = HashMap::new();
        for def in &config.months {
            for name in &def.names {
                months
                    .entry(normalize_text(name))
                    .or_insert_with(|| def.code.clone());
            }
        }

        let makes_keywords = config
            .makes_keywords
            .iter()
            .map(|k| normalize_text(k))
            .collect();

        let vocabulary = Self {
            version: config.version.clone(),
            single_terms,
            phrase_terms,
            score_patterns,
            clutch_patterns,
            months,
            makes_keywords,
            correction_keywords: Self::correction_list(config),
        };

        tracing::debug!(
            version = %vocabulary.version,
            single_terms = vocabulary.single_terms.len(),
            phrase_terms = vocabulary.phrase_terms.len(),
            correction_keywords = vocabulary.correction_keywords.len(),
            "Compiled vocabulary"
        );

        Ok(vocabulary)
    }

    /// Merge category and shot-specifier keywords into one lexicon
    fn compile_terms(config: &VocabularyConfig) -> HashMap<String, Term> {
        let mut terms: HashMap<String, Term> = HashMap::new();

        for category in &config.categories {
            let shot_keys = config
                .shot_keywords()
                .map(|(k, _)| k)
                .filter(|_| category.include_shot_specifiers);
            for keyword in category.keywords.iter().map(String::as_str).chain(shot_keys) {
                let term = terms.entry(normalize_key(keyword)).or_default();
                if !term.measures.contains(&category.measure) {
                    term.measures.push(category.measure);
                }
            }
        }

        for (keyword, tag) in config.shot_keywords() {
            terms
                .entry(normalize_key(keyword))
                .or_default()
                .shot_specifier
                .get_or_insert_with(|| tag.to_string());
        }

        terms
    }

    /// Every correctable surface form, deduplicated, in a fixed order:
    /// categories, months, shot specifiers, clutch, season, score phrases.
    fn correction_list(config: &VocabularyConfig) -> Vec<String> {
        let categories = config.categories.iter().flat_map(|c| {
            let shot_keys = config
                .shot_keywords()
                .map(|(k, _)| k)
                .filter(move |_| c.include_shot_specifiers);
            c.keywords.iter().map(String::as_str).chain(shot_keys)
        });
        let months = config
            .months
            .iter()
            .flat_map(|m| m.names.iter().map(String::as_str));
        let shots = config.shot_keywords().map(|(k, _)| k);
        let clutch = config
            .clutch_windows
            .iter()
            .flat_map(|c| c.phrases.iter().map(String::as_str));
        let seasons = config.season_phrases.iter().map(String::as_str);
        let scores = config
            .score_specifiers
            .iter()
            .flat_map(|s| s.phrases.iter().map(String::as_str));

        let mut seen = HashSet::new();
        categories
            .chain(months)
            .chain(shots)
            .chain(clutch)
            .chain(seasons)
            .chain(scores)
            .map(normalize_text)
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Meaning of a single normalized token
    pub fn term(&self, token: &str) -> Option<&Term> {
        self.single_terms.get(token)
    }

    /// Multi-word keywords found in a token stream
    pub fn find_phrase_terms(&self, tokens: &[String]) -> Vec<PhraseMatch<Term>> {
        self.phrase_terms.find_all(tokens)
    }

    /// Score-specifier patterns in table order
    pub fn score_patterns(&self) -> &[(Regex, ScoreSpecifier)] {
        &self.score_patterns
    }

    /// Clutch patterns in table order
    pub fn clutch_patterns(&self) -> &[(Regex, ClutchWindow)] {
        &self.clutch_patterns
    }

    /// Season-calendar code for a month name or abbreviation
    pub fn month_code(&self, token: &str) -> Option<&str> {
        self.months.get(token).map(String::as_str)
    }

    pub fn is_makes_keyword(&self, token: &str) -> bool {
        self.makes_keywords.contains(token)
    }

    /// Surface forms the reformulator may correct a word to, in tie-break order
    pub fn correction_keywords(&self) -> &[String] {
        &self.correction_keywords
    }
}

fn whole_word_regex(phrase: &str) -> Result<Regex, VocabularyError> {
    let pattern = format!(r"\b{}\b", regex::escape(&normalize_text(phrase)));
    Regex::new(&pattern).map_err(|e| VocabularyError::ParseError(e.to_string()))
}
