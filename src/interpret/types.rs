//! Typed values produced by query interpretation

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Statistical category a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContextMeasure {
    Pts,
    Blk,
    Stl,
    Ast,
    Reb,
    Tov,
    Miss,
    Fga,
}

impl ContextMeasure {
    pub const ALL: [ContextMeasure; 8] = [
        Self::Pts,
        Self::Blk,
        Self::Stl,
        Self::Ast,
        Self::Reb,
        Self::Tov,
        Self::Miss,
        Self::Fga,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pts => "PTS",
            Self::Blk => "BLK",
            Self::Stl => "STL",
            Self::Ast => "AST",
            Self::Reb => "REB",
            Self::Tov => "TOV",
            Self::Miss => "MISS",
            Self::Fga => "FGA",
        }
    }

    /// Category sent upstream. Misses have no upstream category of their own;
    /// they are fetched as attempts and split out afterwards.
    pub fn upstream(&self) -> ContextMeasure {
        match self {
            Self::Miss => Self::Fga,
            other => *other,
        }
    }

    /// Whether shot-type specifiers narrow this category's results
    pub fn accepts_shot_specifiers(&self) -> bool {
        matches!(self, Self::Pts | Self::Fga)
    }
}

impl fmt::Display for ContextMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextMeasure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown context measure '{s}'"))
    }
}

/// Season phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonType {
    #[serde(rename = "Playoffs")]
    Playoffs,
    #[default]
    #[serde(rename = "Regular Season")]
    RegularSeason,
    #[serde(rename = "Pre Season")]
    PreSeason,
    #[serde(rename = "All Star")]
    AllStar,
}

impl SeasonType {
    /// Name used by the stats provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playoffs => "Playoffs",
            Self::RegularSeason => "Regular Season",
            Self::PreSeason => "Pre Season",
            Self::AllStar => "All Star",
        }
    }
}

impl fmt::Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Game-state significance of a play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreSpecifier {
    GameTying,
    LeadTaking,
}

impl ScoreSpecifier {
    pub fn code(&self) -> &'static str {
        match self {
            Self::GameTying => "GT",
            Self::LeadTaking => "LT",
        }
    }
}

/// Time-remaining bucket for clutch plays.
///
/// Variants are declared most specific first, so the derived ordering ranks
/// `Last10Seconds` highest in priority (lowest in `Ord`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClutchWindow {
    Last10Seconds,
    Last1Minute,
    Last5Minutes,
}

impl ClutchWindow {
    /// Name used by the stats provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Last10Seconds => "Last 10 Seconds",
            Self::Last1Minute => "Last 1 Minute",
            Self::Last5Minutes => "Last 5 Minutes",
        }
    }
}

impl fmt::Display for ClutchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Month code meaning "any month"
pub const ANY_MONTH: &str = "0";

/// Structured interpretation of one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// Normalized full-name key of the resolved player
    pub player_name: Option<String>,
    /// Normalized team name (treated as the opponent)
    pub team_name: Option<String>,
    pub season_type: SeasonType,
    /// Never empty: defaults to `{PTS}`
    pub context_measures: BTreeSet<ContextMeasure>,
    /// Canonical shot specifiers, deduplicated, in query order
    pub shot_specifiers: Vec<String>,
    pub score_specifier: Option<ScoreSpecifier>,
    /// Two-digit season-calendar month code, or "0"
    pub month: String,
    pub clutch_window: Option<ClutchWindow>,
    /// Query text after stopword removal and reformulation
    pub reformulated: String,
    /// The query asked for made shots explicitly ("makes", "made")
    pub makes_requested: bool,
}

impl ParsedQuery {
    pub fn has_month(&self) -> bool {
        self.month != ANY_MONTH
    }

    /// Shot specifiers that apply to `measure`; empty for categories that do
    /// not describe shots.
    pub fn shot_specifiers_for(&self, measure: ContextMeasure) -> &[String] {
        if measure.accepts_shot_specifiers() {
            &self.shot_specifiers
        } else {
            &[]
        }
    }
}
