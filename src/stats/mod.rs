//! Play fetch boundary
//!
//! The engine talks to the stats provider only through [`StatsProvider`]:
//! a blocking, fallible call per request. [`StatsApiClient`] implements it
//! against the public stats API; tests substitute in-memory providers.

pub mod client;

pub use client::{parse_player_team_id, parse_video_details, StatsApiClient, DEFAULT_STATS_BASE_URL};

use crate::error::FetchError;
use crate::params::SearchParameters;
use crate::plays::RawPlayRow;
use crate::reference::{PlayerId, TeamId};

/// Source of play-by-play rows
pub trait StatsProvider: Send + Sync {
    /// The player's current team, if the provider knows it
    fn player_team_id(&self, player_id: PlayerId) -> Result<Option<TeamId>, FetchError>;

    /// Rows for one category. Callers send upstream categories only
    /// (see [`ContextMeasure::upstream`]).
    ///
    /// [`ContextMeasure::upstream`]: crate::interpret::ContextMeasure::upstream
    fn fetch_plays(&self, params: &SearchParameters) -> Result<Vec<RawPlayRow>, FetchError>;
}

impl<P: StatsProvider + ?Sized> StatsProvider for std::sync::Arc<P> {
    fn player_team_id(&self, player_id: PlayerId) -> Result<Option<TeamId>, FetchError> {
        (**self).player_team_id(player_id)
    }

    fn fetch_plays(&self, params: &SearchParameters) -> Result<Vec<RawPlayRow>, FetchError> {
        (**self).fetch_plays(params)
    }
}
