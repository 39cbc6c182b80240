//! Vocabulary configuration
//!
//! Serde model of `config/vocabulary.yaml`. Every table is a YAML sequence so
//! that authoring order survives loading; the compiled [`Vocabulary`] relies
//! on it for tie-breaking.
//!
//! [`Vocabulary`]: super::Vocabulary

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::VocabularyError;
use crate::interpret::types::{ClutchWindow, ContextMeasure, ScoreSpecifier};

/// Root configuration for the query vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    pub version: String,
    #[serde(default)]
    pub description: String,
    pub categories: Vec<CategoryDefinition>,
    #[serde(default)]
    pub shot_specifiers: Vec<ShotSpecifierDefinition>,
    #[serde(default)]
    pub score_specifiers: Vec<ScoreSpecifierDefinition>,
    #[serde(default)]
    pub clutch_windows: Vec<ClutchDefinition>,
    #[serde(default)]
    pub months: Vec<MonthDefinition>,
    /// Season-phase phrases, used only for typo correction
    #[serde(default)]
    pub season_phrases: Vec<String>,
    /// Words that ask for made shots explicitly
    #[serde(default)]
    pub makes_keywords: Vec<String>,
}

/// Keywords that select one statistical category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub measure: ContextMeasure,
    /// Also treat every shot-specifier keyword as a keyword of this category
    #[serde(default)]
    pub include_shot_specifiers: bool,
    pub keywords: Vec<String>,
}

/// Surface keywords for one canonical shot specifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotSpecifierDefinition {
    pub tag: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSpecifierDefinition {
    pub tag: ScoreSpecifier,
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClutchDefinition {
    pub window: ClutchWindow,
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthDefinition {
    /// Two-digit season-calendar code
    pub code: String,
    pub names: Vec<String>,
}

impl VocabularyConfig {
    /// Load from a YAML file
    pub fn load_from_file(path: &Path) -> Result<Self, VocabularyError> {
        let content = std::fs::read_to_string(path).map_err(|e| VocabularyError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::load_from_str(&content)
    }

    /// Load from a YAML string
    pub fn load_from_str(yaml: &str) -> Result<Self, VocabularyError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| VocabularyError::ParseError(e.to_string()))?;

        if config.categories.is_empty() {
            return Err(VocabularyError::EmptyTable { table: "categories" });
        }

        Ok(config)
    }

    /// All shot-specifier keywords in table order
    pub fn shot_keywords(&self) -> impl Iterator<Item = (&str, &str)> {
        self.shot_specifiers
            .iter()
            .flat_map(|def| def.keywords.iter().map(move |k| (k.as_str(), def.tag.as_str())))
    }
}
