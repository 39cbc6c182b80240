//! Search orchestration
//!
//! `SearchEngine::query` runs the whole pipeline for one free-text query:
//!
//! ```text
//! interpret → resolve ids → per category: build params → fetch → derive → filter
//!           → concatenate → sort by date (newest first)
//! ```
//!
//! Nothing here returns an error to the caller. Unresolvable players and
//! teams abort the query with empty rows; a failed fetch empties only its own
//! category. Every failure is logged and recorded on the [`QueryOutcome`].

use serde::Serialize;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{QueryError, StartupError};
use crate::interpret::{ContextMeasure, ParsedQuery, QueryInterpreter};
use crate::params::{
    build_parameters, render_interpretation, SearchParameters, NO_INTERPRETATION,
};
use crate::plays::{sort_by_date_desc, FilterCriteria, PlayRecord, ResultFilter};
use crate::reference::{PlayerId, ReferenceDirectory, ReferenceSnapshot, TeamId};
use crate::stats::{StatsApiClient, StatsProvider};
use crate::vocabulary::Vocabulary;

/// Result of one query
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub query: String,
    pub parsed: ParsedQuery,
    /// One summary per fetched category
    pub interpretations: Vec<String>,
    pub rows: Vec<PlayRecord>,
    #[serde(skip)]
    pub failures: Vec<QueryError>,
}

impl QueryOutcome {
    /// All category summaries in one line
    pub fn interpretation(&self) -> String {
        if self.interpretations.is_empty() {
            NO_INTERPRETATION.to_string()
        } else {
            self.interpretations.join("; ")
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Ids a query resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIds {
    pub player_id: PlayerId,
    pub team_id: Option<TeamId>,
    pub opponent_team_id: Option<TeamId>,
}

/// Offline view of a query: what it means, without fetching anything
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub parsed: ParsedQuery,
    pub parameters: Vec<SearchParameters>,
    pub interpretations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Highlight search engine
pub struct SearchEngine {
    config: EngineConfig,
    directory: Arc<ReferenceSnapshot>,
    interpreter: QueryInterpreter,
    provider: Arc<dyn StatsProvider>,
}

impl SearchEngine {
    pub fn new(
        config: EngineConfig,
        directory: Arc<ReferenceSnapshot>,
        vocabulary: Arc<Vocabulary>,
        provider: Arc<dyn StatsProvider>,
    ) -> Self {
        let interpreter = QueryInterpreter::new(directory.clone(), vocabulary)
            .with_thresholds(config.thresholds)
            .with_stopwords(&config.stopwords);

        Self {
            config,
            directory,
            interpreter,
            provider,
        }
    }

    /// Load directories and vocabulary from the configured paths and talk to
    /// the configured stats API.
    pub fn from_config(config: EngineConfig) -> Result<Self, StartupError> {
        config.validate()?;

        let directory = ReferenceSnapshot::load(&config.paths.players, &config.paths.teams)?;
        let vocabulary = match &config.paths.vocabulary {
            Some(path) => Vocabulary::load_from_file(path)?,
            None => Vocabulary::builtin()?,
        };
        let client =
            StatsApiClient::with_base_url(&config.stats.base_url, config.stats.timeout())?;

        tracing::info!(
            season = %config.season,
            vocabulary = %vocabulary.version(),
            stats_api = %client.base_url(),
            "Search engine ready"
        );

        Ok(Self::new(
            config,
            Arc::new(directory),
            Arc::new(vocabulary),
            Arc::new(client),
        ))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn directory(&self) -> &ReferenceSnapshot {
        &self.directory
    }

    /// Interpret a query without resolving or fetching anything
    pub fn interpret(&self, query: &str) -> ParsedQuery {
        self.interpreter.interpret(query)
    }

    /// Run a query end to end
    pub fn query(&self, query: &str) -> QueryOutcome {
        let parsed = self.interpret(query);
        let mut outcome = QueryOutcome {
            query: query.to_string(),
            parsed,
            interpretations: Vec::new(),
            rows: Vec::new(),
            failures: Vec::new(),
        };

        let ids = match self.resolve(&outcome.parsed, true) {
            Ok(ids) => ids,
            Err(error) => {
                tracing::info!(%query, %error, "Query aborted");
                outcome.failures.push(error);
                return outcome;
            }
        };

        for &measure in &outcome.parsed.context_measures {
            let params = match self.parameters(&outcome.parsed, measure, &ids) {
                Ok(params) => params,
                Err(error) => {
                    tracing::warn!(%measure, %error, "Could not build search parameters");
                    outcome.failures.push(error);
                    continue;
                }
            };

            let interpretation = render_interpretation(
                &params,
                outcome.parsed.shot_specifiers_for(measure),
                self.directory.as_ref(),
            );
            tracing::info!(%measure, "{interpretation}");
            outcome.interpretations.push(interpretation);

            match self.fetch_category(&outcome.parsed, &params) {
                Ok(rows) => outcome.rows.extend(rows),
                Err(error) => {
                    tracing::warn!(%measure, %error, "Fetch failed, category left empty");
                    outcome.failures.push(error);
                }
            }
        }

        sort_by_date_desc(&mut outcome.rows);
        tracing::info!(
            %query,
            rows = outcome.rows.len(),
            failures = outcome.failures.len(),
            "Query complete"
        );
        outcome
    }

    /// Describe a query using the local directory only
    pub fn explain(&self, query: &str) -> Explanation {
        let parsed = self.interpret(query);
        let mut explanation = Explanation {
            parsed,
            parameters: Vec::new(),
            interpretations: Vec::new(),
            error: None,
        };

        let ids = match self.resolve(&explanation.parsed, false) {
            Ok(ids) => ids,
            Err(error) => {
                explanation.error = Some(error.to_string());
                return explanation;
            }
        };

        for &measure in &explanation.parsed.context_measures {
            match self.parameters(&explanation.parsed, measure, &ids) {
                Ok(params) => {
                    explanation.interpretations.push(render_interpretation(
                        &params,
                        explanation.parsed.shot_specifiers_for(measure),
                        self.directory.as_ref(),
                    ));
                    explanation.parameters.push(params);
                }
                Err(error) => {
                    explanation.error = Some(error.to_string());
                    break;
                }
            }
        }

        explanation
    }

    /// Resolve player, team and opponent ids.
    ///
    /// The player's team comes from the directory first; `remote` allows
    /// asking the stats provider when the directory does not know it.
    pub fn resolve(&self, parsed: &ParsedQuery, remote: bool) -> Result<ResolvedIds, QueryError> {
        let name = parsed
            .player_name
            .clone()
            .unwrap_or_else(|| parsed.reformulated.clone());
        let player_id = parsed
            .player_name
            .as_deref()
            .and_then(|n| self.directory.lookup_player(n))
            .ok_or(QueryError::PlayerNotFound { name })?;

        let team_id = match self.directory.player_team_id(player_id) {
            Some(id) => Some(id),
            None if remote => self
                .provider
                .player_team_id(player_id)
                .map_err(|e| QueryError::FetchFailed {
                    category: "commonplayerinfo".to_string(),
                    message: e.to_string(),
                })?,
            None => None,
        };

        let opponent_team_id = match &parsed.team_name {
            Some(team) => Some(
                self.directory
                    .lookup_team(team)
                    .ok_or_else(|| QueryError::UnknownTeam { name: team.clone() })?,
            ),
            None => None,
        };

        Ok(ResolvedIds {
            player_id,
            team_id,
            opponent_team_id,
        })
    }

    fn parameters(
        &self,
        parsed: &ParsedQuery,
        measure: ContextMeasure,
        ids: &ResolvedIds,
    ) -> Result<SearchParameters, QueryError> {
        let params = build_parameters(
            parsed,
            measure,
            &self.config.season,
            Some(ids.player_id),
            ids.team_id,
            ids.opponent_team_id,
        )?;
        Ok(SearchParameters {
            last_n_games: self.config.last_n_games,
            ..params
        })
    }

    /// Fetch, derive and filter one category
    fn fetch_category(
        &self,
        parsed: &ParsedQuery,
        params: &SearchParameters,
    ) -> Result<Vec<PlayRecord>, QueryError> {
        let measure = params.context_measure;
        let upstream = params.for_measure(measure.upstream());

        let raw = self
            .provider
            .fetch_plays(&upstream)
            .map_err(|e| QueryError::FetchFailed {
                category: measure.to_string(),
                message: e.to_string(),
            })?;

        let criteria = FilterCriteria::from_parsed(parsed, measure)
            .with_clutch_margin(self.config.clutch_margin);
        let fetched = raw.len();
        let rows = ResultFilter::new(&criteria)?
            .apply(raw.into_iter().map(PlayRecord::from).collect());

        tracing::debug!(%measure, fetched, kept = rows.len(), "Filtered plays");
        Ok(rows)
    }
}
