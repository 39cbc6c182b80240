//! Stats API client
//!
//! Blocking HTTP client for the public basketball stats API.
//!
//! # Important
//!
//! The API rejects requests without browser-like headers (`User-Agent`,
//! `Referer`, `Origin` and the `x-nba-stats-*` pair). The blocking client
//! must not be created or used from inside an async runtime; servers call it
//! from `spawn_blocking`.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::StatsProvider;
use crate::error::FetchError;
use crate::params::SearchParameters;
use crate::plays::{RawPlayRow, VideoAsset};
use crate::reference::{PlayerId, TeamId};

pub const DEFAULT_STATS_BASE_URL: &str = "https://stats.nba.com/stats/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36",
);

/// Column of `commonplayerinfo` rows holding the team id
const TEAM_ID_COLUMN: usize = 18;

/// Filters the video endpoint requires but the engine never narrows
const UNUSED_FILTERS: [&str; 16] = [
    "AheadBehind",
    "ContextFilter",
    "DateFrom",
    "DateTo",
    "EndPeriod",
    "EndRange",
    "GameID",
    "GameSegment",
    "Location",
    "Outcome",
    "PointDiff",
    "Position",
    "RangeType",
    "RookieYear",
    "SeasonSegment",
    "StartPeriod",
];

/// Stats API client
pub struct StatsApiClient {
    http: Client,
    base_url: Url,
}

impl StatsApiClient {
    /// Create a client against the public API
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_STATS_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client against another base URL (mirrors, test servers)
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&base_url)
            .map_err(|e| FetchError::Unavailable(format!("invalid base URL '{base_url}': {e}")))?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(browser_headers())
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        tracing::debug!(%url, "Stats API request");
        let response = self.http.get(url).query(query).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text()?)
    }
}

impl StatsProvider for StatsApiClient {
    fn player_team_id(&self, player_id: PlayerId) -> Result<Option<TeamId>, FetchError> {
        let body = self.get(
            "commonplayerinfo",
            &[
                ("PlayerID", player_id.to_string()),
                ("LeagueID", String::new()),
            ],
        )?;
        parse_player_team_id(&body)
    }

    fn fetch_plays(&self, params: &SearchParameters) -> Result<Vec<RawPlayRow>, FetchError> {
        let body = self.get("videodetailsasset", &video_query(params))?;
        let rows = parse_video_details(&body)?;
        tracing::debug!(
            measure = %params.context_measure,
            rows = rows.len(),
            "Fetched plays"
        );
        Ok(rows)
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
    headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
    headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));
    headers
}

/// Query string for the video endpoint
fn video_query(params: &SearchParameters) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("ContextMeasure", params.context_measure.to_string()),
        ("Season", params.season.clone()),
        ("SeasonType", params.season_type.to_string()),
        ("LastNGames", params.last_n_games.to_string()),
        ("Period", params.period.to_string()),
        ("Month", params.month.clone()),
        ("PlayerID", params.player_id.to_string()),
        ("TeamID", params.team_id.to_string()),
        (
            "OpponentTeamID",
            params.opponent_team_id.unwrap_or(0).to_string(),
        ),
        (
            "ClutchTime",
            params
                .clutch_time
                .map(|c| c.to_string())
                .unwrap_or_default(),
        ),
        ("LeagueID", "00".to_string()),
        ("VsConference", String::new()),
        ("VsDivision", String::new()),
        ("StartRange", String::new()),
    ];
    query.extend(UNUSED_FILTERS.iter().map(|key| (*key, String::new())));
    query
}

#[derive(Deserialize)]
struct VideoDetailsResponse {
    #[serde(rename = "resultSets")]
    result_sets: VideoResultSets,
}

#[derive(Deserialize)]
struct VideoResultSets {
    #[serde(rename = "Meta", default)]
    meta: VideoMeta,
    #[serde(default)]
    playlist: Vec<RawPlayRow>,
}

#[derive(Deserialize, Default)]
struct VideoMeta {
    #[serde(rename = "videoUrls", default)]
    video_urls: Vec<Option<VideoAsset>>,
}

/// Parse a `videodetailsasset` body, pairing each playlist entry with the
/// video entry at the same position.
pub fn parse_video_details(body: &str) -> Result<Vec<RawPlayRow>, FetchError> {
    let response: VideoDetailsResponse = serde_json::from_str(body)?;
    let VideoResultSets { meta, playlist } = response.result_sets;

    let mut videos = meta.video_urls.into_iter();
    Ok(playlist
        .into_iter()
        .map(|mut row| {
            row.video = videos.next().flatten();
            row
        })
        .collect())
}

/// Team id from a `commonplayerinfo` body
pub fn parse_player_team_id(body: &str) -> Result<Option<TeamId>, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let row = value
        .get("resultSets")
        .and_then(|sets| sets.get(0))
        .and_then(|set| set.get("rowSet"))
        .and_then(|rows| rows.get(0))
        .ok_or_else(|| FetchError::Malformed("commonplayerinfo has no rows".to_string()))?;

    match row.get(TEAM_ID_COLUMN) {
        Some(serde_json::Value::Number(n)) => Ok(n.as_i64().filter(|id| *id != 0)),
        Some(serde_json::Value::Null) | None => Ok(None),
        Some(other) => Err(FetchError::Malformed(format!(
            "unexpected team id value {other}"
        ))),
    }
}
