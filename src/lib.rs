//! Highlight Search - free-text basketball highlight queries
//!
//! Turns a request like "Wembanyama fadeaways in the playoffs" into one
//! structured play search per statistical category, fetches the plays and
//! narrows them with post-fetch filters.
//!
//! ## Pipeline
//! Query text -> Reformulate -> Extract -> Resolve ids -> Build parameters
//! -> Fetch (per category) -> Derive rows -> Filter -> Sort
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use highlight_search::{EngineConfig, SearchEngine};
//!
//! let engine = SearchEngine::from_config(EngineConfig::default())?;
//! let outcome = engine.query("Lebron James driving layups");
//! println!("{} ({} plays)", outcome.interpretation(), outcome.rows.len());
//! # Ok::<(), highlight_search::error::StartupError>(())
//! ```

// Core error handling
pub mod error;

// Engine configuration (YAML + environment)
pub mod config;

// Text normalization, phrase matching and fuzzy similarity
pub mod matching;

// Player/team directory and vocabulary tables
pub mod reference;
pub mod vocabulary;

// Query interpretation: reformulation and entity extraction
pub mod interpret;

// Search parameters and interpretation rendering
pub mod params;

// Play rows and post-fetch filtering
pub mod plays;

// Stats provider boundary
pub mod stats;

// Orchestration
pub mod engine;

// REST API (when enabled)
#[cfg(feature = "server")]
pub mod api;

pub use config::EngineConfig;
pub use engine::{Explanation, QueryOutcome, SearchEngine};
pub use error::{FetchError, QueryError};
pub use interpret::{ContextMeasure, ParsedQuery, QueryInterpreter};
pub use params::{SearchParameters, SearchParametersBuilder};
pub use plays::{FilterCriteria, PlayRecord, ResultFilter};
pub use reference::{ReferenceDirectory, ReferenceSnapshot};
pub use stats::{StatsApiClient, StatsProvider};
pub use vocabulary::Vocabulary;
