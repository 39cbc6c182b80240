//! Player and team directory snapshot
//!
//! The `ReferenceSnapshot` provides fast, in-memory name lookup without any
//! network access in the hot path. It is built once from the player and team
//! directories and never mutated afterwards; the first/last-name indexes are
//! derived views rebuilt whenever a snapshot is constructed.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::DirectoryError;
use crate::matching::normalize_key;

/// Type alias for player IDs
pub type PlayerId = i64;

/// Type alias for team IDs
pub type TeamId = i64;

/// A single player in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Display name (original casing)
    pub full_name: String,

    pub id: PlayerId,

    /// Current team, when the directory knows it
    #[serde(default)]
    pub team_id: Option<TeamId>,
}

/// A single team name in the directory (one team may have several names)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    pub id: TeamId,
}

/// Read-only directory of players and teams.
pub trait ReferenceDirectory: Send + Sync {
    /// Resolve a player full name (any casing) to its id.
    fn lookup_player(&self, name: &str) -> Option<PlayerId>;

    /// Resolve a team name (exact, any casing) to its id.
    fn lookup_team(&self, name: &str) -> Option<TeamId>;

    /// Display name for a player id.
    fn player_name(&self, id: PlayerId) -> Option<&str>;

    /// Display name for a team id.
    fn team_name(&self, id: TeamId) -> Option<&str>;

    /// The player's current team, if the directory carries it.
    fn player_team_id(&self, id: PlayerId) -> Option<TeamId>;
}

/// In-memory player/team snapshot
#[derive(Debug, Clone, Default)]
pub struct ReferenceSnapshot {
    /// All players, in load order
    players: Vec<PlayerRecord>,

    /// Normalized full-name key per player, parallel to `players`
    player_keys: Vec<String>,

    /// Normalized full name → index into `players`
    name_index: HashMap<String, usize>,

    /// Player id → index into `players`
    id_index: HashMap<PlayerId, usize>,

    /// First name → full-name keys (may be ambiguous)
    first_name_index: HashMap<String, SmallVec<[String; 4]>>,

    /// Last name → full-name keys (may be ambiguous)
    last_name_index: HashMap<String, SmallVec<[String; 4]>>,

    /// All team names, sorted by name
    teams: Vec<TeamRecord>,

    /// Normalized team name keys, parallel to `teams`
    team_keys: Vec<String>,

    /// Normalized team name → team id
    team_index: HashMap<String, TeamId>,

    /// Team id → index of its longest name in `teams`
    team_display_index: HashMap<TeamId, usize>,
}

impl ReferenceSnapshot {
    /// Build a snapshot and its derived indexes.
    ///
    /// A duplicate full name keeps the first record.
    pub fn new(players: Vec<PlayerRecord>, teams: Vec<TeamRecord>) -> Self {
        let mut snapshot = Self::default();

        for player in players {
            let key = normalize_key(&player.full_name);
            if key.is_empty() {
                continue;
            }
            if snapshot.name_index.contains_key(&key) {
                tracing::warn!(
                    name = %player.full_name,
                    "Duplicate player name in directory, keeping first"
                );
                continue;
            }

            let idx = snapshot.players.len();
            let parts: Vec<&str> = key.split(' ').collect();
            if let (Some(first), Some(last)) = (parts.first(), parts.last()) {
                snapshot
                    .first_name_index
                    .entry(first.to_string())
                    .or_default()
                    .push(key.clone());
                snapshot
                    .last_name_index
                    .entry(last.to_string())
                    .or_default()
                    .push(key.clone());
            }

            snapshot.name_index.insert(key.clone(), idx);
            snapshot.id_index.entry(player.id).or_insert(idx);
            snapshot.player_keys.push(key);
            snapshot.players.push(player);
        }

        let mut teams = teams;
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        for team in teams {
            let key = normalize_key(&team.name);
            if key.is_empty() || snapshot.team_index.contains_key(&key) {
                continue;
            }

            let idx = snapshot.teams.len();
            let longer = snapshot
                .team_display_index
                .get(&team.id)
                .map_or(true, |&existing| team.name.len() > snapshot.teams[existing].name.len());
            if longer {
                snapshot.team_display_index.insert(team.id, idx);
            }

            snapshot.team_index.insert(key.clone(), team.id);
            snapshot.team_keys.push(key);
            snapshot.teams.push(team);
        }

        snapshot
    }

    /// Load from the player list JSON and the team `{NAME: id}` JSON.
    pub fn load(players_path: &Path, teams_path: &Path) -> Result<Self, DirectoryError> {
        let players_json = read(players_path)?;
        let teams_json = read(teams_path)?;
        Self::from_json(&players_json, &teams_json)
    }

    /// Parse both directories from JSON strings.
    pub fn from_json(players_json: &str, teams_json: &str) -> Result<Self, DirectoryError> {
        let players: Vec<PlayerRecord> = serde_json::from_str(players_json)?;
        let teams: BTreeMap<String, TeamId> = serde_json::from_str(teams_json)?;
        let teams = teams
            .into_iter()
            .map(|(name, id)| TeamRecord { name, id })
            .collect();

        let snapshot = Self::new(players, teams);
        tracing::info!(
            players = snapshot.players.len(),
            teams = snapshot.teams.len(),
            "Loaded reference directory"
        );
        Ok(snapshot)
    }

    /// Players in load order
    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    /// Normalized full-name keys in load order
    pub fn player_keys(&self) -> &[String] {
        &self.player_keys
    }

    /// Normalized team-name keys, sorted
    pub fn team_keys(&self) -> &[String] {
        &self.team_keys
    }

    /// Lookup by exact normalized full name
    pub fn player_by_key(&self, key: &str) -> Option<&PlayerRecord> {
        self.name_index.get(key).map(|&idx| &self.players[idx])
    }

    pub fn contains_player(&self, key: &str) -> bool {
        self.name_index.contains_key(key)
    }

    /// Full-name keys sharing a first name
    pub fn full_names_for_first(&self, first: &str) -> Option<&[String]> {
        self.first_name_index.get(first).map(|v| v.as_slice())
    }

    /// Full-name keys sharing a last name
    pub fn full_names_for_last(&self, last: &str) -> Option<&[String]> {
        self.last_name_index.get(last).map(|v| v.as_slice())
    }

    /// Statistics for debugging
    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats {
            player_count: self.players.len(),
            team_name_count: self.teams.len(),
            team_count: self.team_display_index.len(),
            first_name_index_size: self.first_name_index.len(),
            last_name_index_size: self.last_name_index.len(),
            ambiguous_last_names: self
                .last_name_index
                .values()
                .filter(|names| names.len() > 1)
                .count(),
        }
    }
}

impl ReferenceDirectory for ReferenceSnapshot {
    fn lookup_player(&self, name: &str) -> Option<PlayerId> {
        self.player_by_key(&normalize_key(name)).map(|p| p.id)
    }

    fn lookup_team(&self, name: &str) -> Option<TeamId> {
        self.team_index.get(&normalize_key(name)).copied()
    }

    fn player_name(&self, id: PlayerId) -> Option<&str> {
        self.id_index
            .get(&id)
            .map(|&idx| self.players[idx].full_name.as_str())
    }

    fn team_name(&self, id: TeamId) -> Option<&str> {
        self.team_display_index
            .get(&id)
            .map(|&idx| self.teams[idx].name.as_str())
    }

    fn player_team_id(&self, id: PlayerId) -> Option<TeamId> {
        self.id_index
            .get(&id)
            .and_then(|&idx| self.players[idx].team_id)
    }
}

fn read(path: &Path) -> Result<String, DirectoryError> {
    std::fs::read_to_string(path).map_err(|e| DirectoryError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Snapshot statistics
#[derive(Debug, Clone)]
pub struct SnapshotStats {
    pub player_count: usize,
    pub team_name_count: usize,
    pub team_count: usize,
    pub first_name_index_size: usize,
    pub last_name_index_size: usize,
    pub ambiguous_last_names: usize,
}

impl std::fmt::Display for SnapshotStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Reference Directory Statistics:")?;
        writeln!(f, "  Players: {}", self.player_count)?;
        writeln!(f, "  Teams: {} ({} names)", self.team_count, self.team_name_count)?;
        writeln!(f, "  First-name index entries: {}", self.first_name_index_size)?;
        writeln!(f, "  Last-name index entries: {}", self.last_name_index_size)?;
        writeln!(f, "  Ambiguous last names: {}", self.ambiguous_last_names)?;
        Ok(())
    }
}
