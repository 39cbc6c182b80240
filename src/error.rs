//! Error types for the highlight search engine
//!
//! Query-scoped failures live in [`QueryError`]; none of them is fatal to the
//! process. Loading failures for the static tables are separate enums and only
//! surface at startup.

use thiserror::Error;

/// Failures scoped to a single query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("No player found for the name: {name}")]
    PlayerNotFound { name: String },

    #[error("Could not find opponent team with name: {name}")]
    UnknownTeam { name: String },

    #[error("Missing required parameters: {}", .missing.join(", "))]
    MissingRequiredParameter { missing: Vec<&'static str> },

    #[error("Fetch failed for {category}: {message}")]
    FetchFailed { category: String, message: String },

    #[error("Invalid shot specifier pattern {specifier}: {message}")]
    InvalidShotSpecifier { specifier: String, message: String },
}

/// Errors raised by a stats provider while fetching plays
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stats API returned status {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("Malformed stats response: {0}")]
    Malformed(String),

    #[error("Stats provider unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        FetchError::Malformed(error.to_string())
    }
}

/// Errors that can occur when loading the player/team directories
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to read file {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse directory JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Errors that can occur when loading the vocabulary tables
#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("Failed to read file {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    ParseError(String),

    #[error("Vocabulary table '{table}' is empty")]
    EmptyTable { table: &'static str },
}

/// Errors that can occur when loading engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    ParseError(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Errors that prevent the engine from starting
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),

    #[error("Failed to create stats client: {0}")]
    StatsClient(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_message_lists_every_key() {
        let err = QueryError::MissingRequiredParameter {
            missing: vec!["team_id", "player_id"],
        };
        assert_eq!(
            err.to_string(),
            "Missing required parameters: team_id, player_id"
        );
    }

    #[test]
    fn test_player_not_found_message() {
        let err = QueryError::PlayerNotFound {
            name: "nobody".to_string(),
        };
        assert!(err.to_string().contains("nobody"));
    }
}
