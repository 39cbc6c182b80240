//! Reference directories for players and teams
//!
//! Loaded once at startup and shared read-only with the interpretation
//! pipeline.

pub mod snapshot;

pub use snapshot::{
    PlayerId, PlayerRecord, ReferenceDirectory, ReferenceSnapshot, SnapshotStats, TeamId,
    TeamRecord,
};
