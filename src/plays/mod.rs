//! Play rows returned by the stats provider
//!
//! [`RawPlayRow`] mirrors the provider's short-keyed playlist entry.
//! [`PlayRecord`] is the derived row the engine filters and returns: the
//! upstream `pta` column is kept but never trusted, and the point change and
//! score differentials are recomputed from the before/after points.

pub mod filter;

pub use filter::{word_pattern, FilterCriteria, Predicate, ResultFilter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reference::TeamId;

/// Video links for one play
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAsset {
    #[serde(rename = "lurl", default)]
    pub video_link: Option<String>,
    #[serde(rename = "lth", default)]
    pub thumbnail_link: Option<String>,
}

/// One playlist entry as the provider sends it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPlayRow {
    #[serde(rename = "gi")]
    pub game_id: String,
    #[serde(rename = "ei")]
    pub event_index: i64,
    #[serde(rename = "y")]
    pub year: i32,
    #[serde(rename = "m")]
    pub month: u32,
    #[serde(rename = "d")]
    pub day: u32,
    #[serde(rename = "gc", default)]
    pub game_code: String,
    #[serde(rename = "p")]
    pub period: u8,
    #[serde(rename = "dsc", default)]
    pub description: String,
    #[serde(rename = "ha")]
    pub home_team: String,
    #[serde(rename = "hid")]
    pub home_team_id: TeamId,
    #[serde(rename = "va")]
    pub visitor_team: String,
    #[serde(rename = "vid")]
    pub visitor_team_id: TeamId,
    #[serde(rename = "hpb")]
    pub home_points_before: i32,
    #[serde(rename = "hpa")]
    pub home_points_after: i32,
    #[serde(rename = "vpb")]
    pub visitor_points_before: i32,
    #[serde(rename = "vpa")]
    pub visitor_points_after: i32,
    #[serde(rename = "pta", default)]
    pub points_this_action: i32,
    /// Entry of the parallel `videoUrls` list, attached by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoAsset>,
}

/// A play with derived scoring columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRecord {
    #[serde(rename = "Game_ID")]
    pub game_id: String,
    #[serde(rename = "Event_Index")]
    pub event_index: i64,
    /// None when year/month/day do not form a calendar date
    #[serde(rename = "Game_Date")]
    pub game_date: Option<NaiveDate>,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Day")]
    pub day: u32,
    #[serde(rename = "Game_Code")]
    pub game_code: String,
    #[serde(rename = "Period")]
    pub period: u8,
    #[serde(rename = "Home_Team")]
    pub home_team: String,
    #[serde(rename = "Visitor_Team")]
    pub visitor_team: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Home_Points_Before")]
    pub home_points_before: i32,
    #[serde(rename = "Home_Points_After")]
    pub home_points_after: i32,
    #[serde(rename = "Visitor_Points_Before")]
    pub visitor_points_before: i32,
    #[serde(rename = "Visitor_Points_After")]
    pub visitor_points_after: i32,
    #[serde(rename = "Points_This_Action")]
    pub points_this_action: i32,
    #[serde(rename = "Point_Change")]
    pub point_change: i32,
    /// Absolute pre-play margin
    #[serde(rename = "Score_Diff")]
    pub score_diff: i32,
    /// Home minus visitor, before the play
    #[serde(rename = "Score_Diff_Before")]
    pub score_diff_before: i32,
    /// Home minus visitor, after the play
    #[serde(rename = "Score_Diff_After")]
    pub score_diff_after: i32,
    #[serde(rename = "Home_Team_ID")]
    pub home_team_id: TeamId,
    #[serde(rename = "Visitor_Team_ID")]
    pub visitor_team_id: TeamId,
    #[serde(rename = "Video_Link")]
    pub video_link: Option<String>,
    #[serde(rename = "Thumbnail_Link")]
    pub thumbnail_link: Option<String>,
}

impl From<RawPlayRow> for PlayRecord {
    fn from(raw: RawPlayRow) -> Self {
        let score_diff_before = raw.home_points_before - raw.visitor_points_before;
        let score_diff_after = raw.home_points_after - raw.visitor_points_after;
        let point_change = (raw.home_points_after - raw.home_points_before)
            + (raw.visitor_points_after - raw.visitor_points_before);
        let video = raw.video.unwrap_or_default();

        Self {
            game_date: NaiveDate::from_ymd_opt(raw.year, raw.month, raw.day),
            game_id: raw.game_id,
            event_index: raw.event_index,
            year: raw.year,
            month: raw.month,
            day: raw.day,
            game_code: raw.game_code,
            period: raw.period,
            home_team: raw.home_team,
            visitor_team: raw.visitor_team,
            description: raw.description,
            home_points_before: raw.home_points_before,
            home_points_after: raw.home_points_after,
            visitor_points_before: raw.visitor_points_before,
            visitor_points_after: raw.visitor_points_after,
            points_this_action: raw.points_this_action,
            point_change,
            score_diff: score_diff_before.abs(),
            score_diff_before,
            score_diff_after,
            home_team_id: raw.home_team_id,
            visitor_team_id: raw.visitor_team_id,
            video_link: video.video_link,
            thumbnail_link: video.thumbnail_link,
        }
    }
}

/// Most recent game first; rows without a valid date go last. Stable.
pub fn sort_by_date_desc(rows: &mut [PlayRecord]) {
    rows.sort_by(|a, b| b.game_date.cmp(&a.game_date));
}
