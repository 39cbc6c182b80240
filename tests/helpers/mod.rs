//! Shared fixtures for integration tests
//!
//! The directory fixtures are the shipped `data/*.json` files and the
//! vocabulary is the built-in one, so these tests exercise the same tables the
//! server runs with. Plays come from [`StubStatsProvider`].

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use highlight_search::error::FetchError;
use highlight_search::interpret::ContextMeasure;
use highlight_search::params::SearchParameters;
use highlight_search::plays::{RawPlayRow, VideoAsset};
use highlight_search::reference::{PlayerId, ReferenceSnapshot, TeamId};
use highlight_search::{EngineConfig, QueryInterpreter, SearchEngine, StatsProvider, Vocabulary};

pub fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

pub fn directory() -> Arc<ReferenceSnapshot> {
    Arc::new(
        ReferenceSnapshot::load(&data_path("players.json"), &data_path("teams.json"))
            .expect("shipped directory loads"),
    )
}

pub fn vocabulary() -> Arc<Vocabulary> {
    Arc::new(Vocabulary::builtin().expect("built-in vocabulary loads"))
}

pub fn interpreter() -> QueryInterpreter {
    QueryInterpreter::new(directory(), vocabulary())
}

pub fn engine(provider: StubStatsProvider) -> (SearchEngine, Arc<StubStatsProvider>) {
    let provider = Arc::new(provider);
    let engine = SearchEngine::new(
        EngineConfig::default(),
        directory(),
        vocabulary(),
        provider.clone(),
    );
    (engine, provider)
}

/// In-memory stats provider
///
/// Serves canned rows per upstream category, fails the categories it is told
/// to fail and records every request it receives.
#[derive(Default)]
pub struct StubStatsProvider {
    rows: HashMap<ContextMeasure, Vec<RawPlayRow>>,
    teams: HashMap<PlayerId, TeamId>,
    failing: HashSet<ContextMeasure>,
    requests: Mutex<Vec<SearchParameters>>,
}

impl StubStatsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, measure: ContextMeasure, rows: Vec<RawPlayRow>) -> Self {
        self.rows.entry(measure).or_default().extend(rows);
        self
    }

    pub fn with_team(mut self, player_id: PlayerId, team_id: TeamId) -> Self {
        self.teams.insert(player_id, team_id);
        self
    }

    pub fn failing(mut self, measure: ContextMeasure) -> Self {
        self.failing.insert(measure);
        self
    }

    pub fn requests(&self) -> Vec<SearchParameters> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_measures(&self) -> Vec<ContextMeasure> {
        self.requests().iter().map(|p| p.context_measure).collect()
    }
}

impl StatsProvider for StubStatsProvider {
    fn player_team_id(&self, player_id: PlayerId) -> Result<Option<TeamId>, FetchError> {
        Ok(self.teams.get(&player_id).copied())
    }

    fn fetch_plays(&self, params: &SearchParameters) -> Result<Vec<RawPlayRow>, FetchError> {
        self.requests.lock().unwrap().push(params.clone());
        if self.failing.contains(&params.context_measure) {
            return Err(FetchError::Status {
                endpoint: "videodetailsasset".to_string(),
                status: 503,
            });
        }
        Ok(self
            .rows
            .get(&params.context_measure)
            .cloned()
            .unwrap_or_default())
    }
}

/// Builder for provider rows
pub struct PlayBuilder {
    row: RawPlayRow,
}

/// A play on the given date with no score change
pub fn play(year: i32, month: u32, day: u32, description: &str) -> PlayBuilder {
    PlayBuilder {
        row: RawPlayRow {
            game_id: format!("0022300{month:02}{day:02}"),
            event_index: 1,
            year,
            month,
            day,
            game_code: format!("{year}{month:02}{day:02}/BOSLAL"),
            period: 4,
            description: description.to_string(),
            home_team: "LAL".to_string(),
            home_team_id: 1610612747,
            visitor_team: "BOS".to_string(),
            visitor_team_id: 1610612738,
            home_points_before: 100,
            home_points_after: 100,
            visitor_points_before: 100,
            visitor_points_after: 100,
            points_this_action: 0,
            video: None,
        },
    }
}

impl PlayBuilder {
    /// Home and visitor points before and after the play
    pub fn score(mut self, before: (i32, i32), after: (i32, i32)) -> Self {
        self.row.home_points_before = before.0;
        self.row.visitor_points_before = before.1;
        self.row.home_points_after = after.0;
        self.row.visitor_points_after = after.1;
        self
    }

    pub fn event(mut self, index: i64) -> Self {
        self.row.event_index = index;
        self
    }

    pub fn video(mut self, link: &str) -> Self {
        self.row.video = Some(VideoAsset {
            video_link: Some(link.to_string()),
            thumbnail_link: None,
        });
        self
    }

    pub fn build(self) -> RawPlayRow {
        self.row
    }
}
