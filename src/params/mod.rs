//! Structured search parameters
//!
//! [`SearchParameters`] is the immutable request handed to a
//! [`StatsProvider`](crate::stats::StatsProvider): one value per statistical
//! category. It is only obtainable through [`SearchParametersBuilder::build`],
//! which refuses to produce a value while any required key is unset.

pub mod interpretation;

pub use interpretation::{
    action_phrase, month_name, render_interpretation, title_case, NO_INTERPRETATION,
};

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::interpret::types::{ClutchWindow, ContextMeasure, ParsedQuery, SeasonType, ANY_MONTH};
use crate::reference::{PlayerId, TeamId};

pub const DEFAULT_SEASON: &str = "2023-24";
pub const DEFAULT_LAST_N_GAMES: u32 = 200;

/// Complete, validated request for one category of plays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameters {
    pub context_measure: ContextMeasure,
    pub season: String,
    pub season_type: SeasonType,
    pub last_n_games: u32,
    /// 0 means every period
    pub period: u8,
    /// Season-calendar month code, "0" for any month
    pub month: String,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub opponent_team_id: Option<TeamId>,
    pub clutch_time: Option<ClutchWindow>,
}

impl SearchParameters {
    pub fn builder() -> SearchParametersBuilder {
        SearchParametersBuilder::default()
    }

    /// Copy of these parameters targeting another category
    pub fn for_measure(&self, measure: ContextMeasure) -> Self {
        Self {
            context_measure: measure,
            ..self.clone()
        }
    }
}

/// Builder for [`SearchParameters`]
///
/// `last_n_games`, `period` and `month` carry defaults; every other key
/// without a setter call stays unset and makes [`build`](Self::build) fail.
#[derive(Debug, Clone)]
pub struct SearchParametersBuilder {
    context_measure: Option<ContextMeasure>,
    season: Option<String>,
    season_type: Option<SeasonType>,
    last_n_games: u32,
    period: u8,
    month: String,
    player_id: Option<PlayerId>,
    team_id: Option<TeamId>,
    opponent_team_id: Option<TeamId>,
    clutch_time: Option<ClutchWindow>,
}

impl Default for SearchParametersBuilder {
    fn default() -> Self {
        Self {
            context_measure: None,
            season: None,
            season_type: None,
            last_n_games: DEFAULT_LAST_N_GAMES,
            period: 0,
            month: ANY_MONTH.to_string(),
            player_id: None,
            team_id: None,
            opponent_team_id: None,
            clutch_time: None,
        }
    }
}

impl SearchParametersBuilder {
    /// Start from what the query itself determines: season type, month and
    /// clutch window.
    pub fn from_parsed(parsed: &ParsedQuery) -> Self {
        Self::default()
            .season_type(parsed.season_type)
            .month(parsed.month.clone())
            .clutch_time(parsed.clutch_window)
    }

    pub fn context_measure(mut self, measure: ContextMeasure) -> Self {
        self.context_measure = Some(measure);
        self
    }

    pub fn season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    pub fn season_type(mut self, season_type: SeasonType) -> Self {
        self.season_type = Some(season_type);
        self
    }

    pub fn last_n_games(mut self, n: u32) -> Self {
        self.last_n_games = n;
        self
    }

    pub fn period(mut self, period: u8) -> Self {
        self.period = period;
        self
    }

    pub fn month(mut self, month: impl Into<String>) -> Self {
        self.month = month.into();
        self
    }

    pub fn player_id(mut self, id: PlayerId) -> Self {
        self.player_id = Some(id);
        self
    }

    pub fn team_id(mut self, id: TeamId) -> Self {
        self.team_id = Some(id);
        self
    }

    pub fn opponent_team_id(mut self, id: Option<TeamId>) -> Self {
        self.opponent_team_id = id;
        self
    }

    pub fn clutch_time(mut self, window: Option<ClutchWindow>) -> Self {
        self.clutch_time = window;
        self
    }

    /// Validate and freeze.
    ///
    /// Fails with [`QueryError::MissingRequiredParameter`] naming every
    /// absent required key.
    pub fn build(self) -> Result<SearchParameters, QueryError> {
        let mut missing = Vec::new();
        if self.context_measure.is_none() {
            missing.push("context_measure");
        }
        if self.season.is_none() {
            missing.push("season");
        }
        if self.season_type.is_none() {
            missing.push("season_type");
        }
        if self.team_id.is_none() {
            missing.push("team_id");
        }
        if self.player_id.is_none() {
            missing.push("player_id");
        }

        match (
            self.context_measure,
            self.season,
            self.season_type,
            self.team_id,
            self.player_id,
        ) {
            (
                Some(context_measure),
                Some(season),
                Some(season_type),
                Some(team_id),
                Some(player_id),
            ) => Ok(SearchParameters {
                context_measure,
                season,
                season_type,
                last_n_games: self.last_n_games,
                period: self.period,
                month: self.month,
                player_id,
                team_id,
                opponent_team_id: self.opponent_team_id,
                clutch_time: self.clutch_time,
            }),
            _ => Err(QueryError::MissingRequiredParameter { missing }),
        }
    }
}

/// Build the parameters for one category of a parsed query
pub fn build_parameters(
    parsed: &ParsedQuery,
    measure: ContextMeasure,
    season: &str,
    player_id: Option<PlayerId>,
    team_id: Option<TeamId>,
    opponent_team_id: Option<TeamId>,
) -> Result<SearchParameters, QueryError> {
    let mut builder = SearchParametersBuilder::from_parsed(parsed)
        .context_measure(measure)
        .season(season)
        .opponent_team_id(opponent_team_id);
    if let Some(id) = player_id {
        builder = builder.player_id(id);
    }
    if let Some(id) = team_id {
        builder = builder.team_id(id);
    }
    builder.build()
}
