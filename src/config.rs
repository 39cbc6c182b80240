//! Engine configuration
//!
//! Loaded from YAML (every key optional, defaults below) and then overridden
//! from the environment:
//!
//! | Variable                   | Overrides           |
//! |----------------------------|---------------------|
//! | `HIGHLIGHT_CONFIG`         | YAML file to load   |
//! | `HIGHLIGHT_SEASON`         | `season`            |
//! | `HIGHLIGHT_PLAYERS_PATH`   | `paths.players`     |
//! | `HIGHLIGHT_TEAMS_PATH`     | `paths.teams`       |
//! | `HIGHLIGHT_STATS_BASE_URL` | `stats.base_url`    |

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::interpret::{MatchThresholds, DEFAULT_STOPWORDS};
use crate::params::{DEFAULT_LAST_N_GAMES, DEFAULT_SEASON};
use crate::plays::filter::DEFAULT_CLUTCH_MARGIN;
use crate::stats::DEFAULT_STATS_BASE_URL;

static SEASON_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}$").unwrap());

/// Root engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Season label sent upstream, e.g. "2023-24"
    pub season: String,
    pub last_n_games: u32,
    pub thresholds: MatchThresholds,
    pub clutch_margin: i32,
    pub stopwords: Vec<String>,
    pub stats: StatsConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub players: PathBuf,
    pub teams: PathBuf,
    /// Replaces the built-in vocabulary when set
    pub vocabulary: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON.to_string(),
            last_n_games: DEFAULT_LAST_N_GAMES,
            thresholds: MatchThresholds::default(),
            clutch_margin: DEFAULT_CLUTCH_MARGIN,
            stopwords: DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            stats: StatsConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STATS_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            players: PathBuf::from("data/players.json"),
            teams: PathBuf::from("data/teams.json"),
            vocabulary: None,
        }
    }
}

impl StatsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl EngineConfig {
    /// Load from a YAML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::load_from_str(&content)
    }

    /// Load from a YAML string
    pub fn load_from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `HIGHLIGHT_CONFIG` (or defaults) and apply environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) with an explicit variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("HIGHLIGHT_CONFIG") {
            Some(path) => Self::load_from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(season) = lookup("HIGHLIGHT_SEASON") {
            config.season = season;
        }
        if let Some(path) = lookup("HIGHLIGHT_PLAYERS_PATH") {
            config.paths.players = PathBuf::from(path);
        }
        if let Some(path) = lookup("HIGHLIGHT_TEAMS_PATH") {
            config.paths.teams = PathBuf::from(path);
        }
        if let Some(url) = lookup("HIGHLIGHT_STATS_BASE_URL") {
            config.stats.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SEASON_FORMAT.is_match(&self.season) {
            return Err(ConfigError::InvalidValue {
                key: "season",
                value: self.season.clone(),
            });
        }

        let thresholds = [
            ("thresholds.player", self.thresholds.player),
            ("thresholds.fragment", self.thresholds.fragment),
            ("thresholds.keyword", self.thresholds.keyword),
        ];
        for (key, value) in thresholds {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    key,
                    value: value.to_string(),
                });
            }
        }

        if self.clutch_margin < 0 {
            return Err(ConfigError::InvalidValue {
                key: "clutch_margin",
                value: self.clutch_margin.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.season, "2023-24");
        assert_eq!(config.last_n_games, 200);
        assert_eq!(config.thresholds.keyword, 85.0);
        assert_eq!(config.clutch_margin, 5);
        assert_eq!(config.stopwords, vec!["the", "a", "an"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EngineConfig::load_from_str(
            "season: \"2022-23\"\nthresholds:\n  player: 75\n  fragment: 70\n  keyword: 90\n",
        )
        .unwrap();
        assert_eq!(config.season, "2022-23");
        assert_eq!(config.thresholds.player, 75.0);
        assert_eq!(config.last_n_games, 200);
        assert_eq!(config.paths.players, PathBuf::from("data/players.json"));
    }

    #[test]
    fn test_invalid_season_rejected() {
        assert!(matches!(
            EngineConfig::load_from_str("season: \"2023\"\n"),
            Err(ConfigError::InvalidValue { key: "season", .. })
        ));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut config = EngineConfig::default();
        config.thresholds.keyword = 120.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                key: "thresholds.keyword",
                ..
            })
        ));
    }

    #[test]
    fn test_environment_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "season: \"2021-22\"\nclutch_margin: 3").unwrap();

        let vars: HashMap<&str, String> = HashMap::from([
            ("HIGHLIGHT_CONFIG", file.path().display().to_string()),
            ("HIGHLIGHT_SEASON", "2024-25".to_string()),
            ("HIGHLIGHT_STATS_BASE_URL", "http://localhost:8080/stats".to_string()),
        ]);
        let config = EngineConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();

        assert_eq!(config.season, "2024-25");
        assert_eq!(config.clutch_margin, 3);
        assert_eq!(config.stats.base_url, "http://localhost:8080/stats");
    }

    #[test]
    fn test_missing_config_file() {
        let result = EngineConfig::from_lookup(|key| {
            (key == "HIGHLIGHT_CONFIG").then(|| "/nonexistent/highlight.yaml".to_string())
        });
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
