//! Human-readable summary of a search
//!
//! Parts are concatenated in a fixed order:
//!
//! ```text
//! Interpreted as: <player> <specifiers + action | action> [in the <season type>]
//!                 [in <Month>] during the <season> season [against the <Team>] [in <clutch>]
//! ```

use std::borrow::Cow;

use super::SearchParameters;
use crate::interpret::types::SeasonType;
use crate::reference::ReferenceDirectory;

/// Month names indexed by season-calendar code (01 = October)
const SEASON_MONTHS: [&str; 12] = [
    "October",
    "November",
    "December",
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
];

pub const NO_INTERPRETATION: &str = "No specific interpretation available";

/// Noun phrase for a category code; unknown codes fall back to their
/// lowercased name.
pub fn action_phrase(measure: &str) -> Cow<'static, str> {
    match measure {
        "PTS" => Cow::Borrowed("field goals made"),
        "AST" => Cow::Borrowed("assists"),
        "REB" => Cow::Borrowed("rebounds"),
        "STL" => Cow::Borrowed("steals"),
        "BLK" => Cow::Borrowed("blocks"),
        "TOV" => Cow::Borrowed("turnovers"),
        "FGA" => Cow::Borrowed("shot attempts"),
        "MISS" => Cow::Borrowed("misses"),
        other => Cow::Owned(other.to_lowercase()),
    }
}

/// Month name for a season-calendar code ("01" → "October")
pub fn month_name(code: &str) -> Option<&'static str> {
    let index: usize = code.parse().ok()?;
    index.checked_sub(1).and_then(|i| SEASON_MONTHS.get(i)).copied()
}

/// Capitalize the first letter of every alphabetic run ("LOS ANGELES LAKERS"
/// → "Los Angeles Lakers", "trail-blazers" → "Trail-Blazers").
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Render the summary for one parameter set
pub fn render_interpretation(
    params: &SearchParameters,
    shot_specifiers: &[String],
    directory: &dyn ReferenceDirectory,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(name) = directory.player_name(params.player_id) {
        parts.push(name.to_string());
    }

    let action = action_phrase(params.context_measure.as_str());
    if shot_specifiers.is_empty() {
        parts.push(action.into_owned());
    } else {
        parts.push(format!("{} {}", shot_specifiers.join(" ").to_lowercase(), action));
    }

    if params.season_type != SeasonType::RegularSeason {
        parts.push(format!("in the {}", params.season_type));
    }

    if let Some(month) = month_name(&params.month) {
        parts.push(format!("in {month}"));
    }

    if !params.season.is_empty() {
        parts.push(format!("during the {} season", params.season));
    }

    if let Some(team) = params
        .opponent_team_id
        .and_then(|id| directory.team_name(id))
    {
        parts.push(format!("against the {}", title_case(team)));
    }

    if let Some(clutch) = params.clutch_time {
        parts.push(format!("in {clutch}"));
    }

    if parts.is_empty() {
        NO_INTERPRETATION.to_string()
    } else {
        format!("Interpreted as: {}", parts.join(" "))
    }
}
