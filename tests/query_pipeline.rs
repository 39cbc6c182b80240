//! Integration tests for the query pipeline
//!
//! Tests verify:
//! 1. Interpretation against the shipped directory and vocabulary
//! 2. Parameters sent to the stats provider per category
//! 3. Post-fetch filtering, row derivation and ordering
//! 4. Failure handling (unknown player/team, failed category)

mod helpers;

use chrono::NaiveDate;
use helpers::{engine, interpreter, play, StubStatsProvider};
use highlight_search::interpret::{
    ClutchWindow, ContextMeasure, ParsedQuery, ScoreSpecifier, SeasonType,
};
use highlight_search::params::NO_INTERPRETATION;
use highlight_search::QueryError;
use std::collections::BTreeSet;

// ============================================================================
// INTERPRETATION
// ============================================================================

#[test]
fn test_one_character_typo_in_full_name() {
    let parsed = interpreter().interpret("Lebrom James dunks");
    assert_eq!(parsed.player_name.as_deref(), Some("lebron james"));
    assert_eq!(parsed.reformulated, "lebron james dunks");
    assert_eq!(parsed.shot_specifiers, vec!["Dunk"]);
}

#[test]
fn test_misspelled_shot_keywords_keep_their_specifier() {
    let parsed = interpreter().interpret("Lebron James dnks");
    assert_eq!(parsed.reformulated, "lebron james dunks");
    assert_eq!(parsed.shot_specifiers, vec!["Dunk"]);

    let parsed = interpreter().interpret("Stephen Curry flaoters");
    assert_eq!(parsed.reformulated, "stephen curry floaters");
    assert_eq!(parsed.shot_specifiers, vec!["Floating"]);
}

#[test]
fn test_no_player_tokens() {
    let parsed = interpreter().interpret("blocks and steals");
    assert_eq!(parsed.player_name, None);
    assert_eq!(
        parsed.context_measures,
        BTreeSet::from([ContextMeasure::Blk, ContextMeasure::Stl])
    );
}

#[test]
fn test_default_category_is_points() {
    let parsed = interpreter().interpret("Jalen Brunson");
    assert_eq!(parsed.player_name.as_deref(), Some("jalen brunson"));
    assert_eq!(parsed.context_measures, BTreeSet::from([ContextMeasure::Pts]));
    assert!(parsed.shot_specifiers.is_empty());
}

#[test]
fn test_playoffs_take_precedence() {
    let parsed = interpreter().interpret("Jayson Tatum playoff blocks in the regular season");
    assert_eq!(parsed.season_type, SeasonType::Playoffs);
    assert_eq!(parsed.context_measures, BTreeSet::from([ContextMeasure::Blk]));
}

#[test]
fn test_most_specific_clutch_window_wins() {
    let parsed = interpreter().interpret("Kevin Durant clutch fadeaways in the last minute");
    assert_eq!(parsed.clutch_window, Some(ClutchWindow::Last1Minute));
    assert_eq!(parsed.shot_specifiers, vec!["Fadeaway"]);
}

#[test]
fn test_wembanyama_resolved_by_last_name() {
    let parsed = interpreter().interpret("Wembanyama fadeaways in the playoffs");
    assert_eq!(parsed.player_name.as_deref(), Some("victor wembanyama"));
    assert_eq!(parsed.season_type, SeasonType::Playoffs);
    assert_eq!(parsed.context_measures, BTreeSet::from([ContextMeasure::Pts]));
    assert_eq!(parsed.shot_specifiers, vec!["Fadeaway"]);
    assert_eq!(parsed.month, "0");
}

#[test]
fn test_reformulation_is_idempotent_on_real_queries() {
    let interpreter = interpreter();
    for query in [
        "Lebrom James dunks",
        "Stephen Curry game tying treys against the Lakers",
        "Luka Doncic bricks in march",
        "blocks and steals",
    ] {
        let once = interpreter.reformulator().reformulate(&interpreter.preprocess(query));
        let twice = interpreter.reformulator().reformulate(&once);
        assert_eq!(once, twice, "query: {query}");
    }
}

// ============================================================================
// END TO END
// ============================================================================

#[test]
fn test_wembanyama_fadeaways_in_the_playoffs() {
    let provider = StubStatsProvider::new().with_rows(
        ContextMeasure::Pts,
        vec![
            play(2024, 4, 2, "Wembanyama 14' Fadeaway Jump Shot (20 PTS)")
                .score((90, 88), (92, 88))
                .build(),
            play(2024, 4, 9, "Wembanyama 3' Driving Dunk (24 PTS)")
                .score((70, 60), (72, 60))
                .build(),
        ],
    );
    let (engine, provider) = engine(provider);

    let outcome = engine.query("Wembanyama fadeaways in the playoffs");

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].player_id, 1641705);
    assert_eq!(requests[0].team_id, 1610612759);
    assert_eq!(requests[0].season_type, SeasonType::Playoffs);
    assert_eq!(requests[0].season, "2023-24");
    assert_eq!(requests[0].last_n_games, 200);

    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].point_change, 2);
    assert_eq!(
        outcome.interpretation(),
        "Interpreted as: Victor Wembanyama fadeaway field goals made \
         in the Playoffs during the 2023-24 season"
    );
}

#[test]
fn test_dejounte_murray_floaters() {
    let (engine, provider) = engine(StubStatsProvider::new());
    let outcome = engine.query("Dejounte Murray floaters");

    assert!(outcome.is_complete());
    assert_eq!(outcome.parsed.shot_specifiers, vec!["Floating"]);
    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].context_measure, ContextMeasure::Pts);
    assert_eq!(requests[0].player_id, 1627749);
    assert_eq!(requests[0].team_id, 1610612737);
    assert_eq!(requests[0].season_type, SeasonType::RegularSeason);
}

#[test]
fn test_game_tying_against_opponent() {
    let provider = StubStatsProvider::new().with_rows(
        ContextMeasure::Pts,
        vec![
            // ties the game
            play(2024, 1, 27, "Curry 26' 3PT Jump Shot (31 PTS)")
                .score((110, 107), (110, 110))
                .build(),
            // extends a lead
            play(2024, 1, 27, "Curry 28' 3PT Pullup Jump Shot (34 PTS)")
                .score((110, 111), (110, 114))
                .event(2)
                .build(),
        ],
    );
    let (engine, provider) = engine(provider);

    let outcome = engine.query("Stephen Curry game tying treys against the Lakers");

    assert_eq!(outcome.parsed.score_specifier, Some(ScoreSpecifier::GameTying));
    assert_eq!(provider.requests()[0].opponent_team_id, Some(1610612747));
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].score_diff_after, 0);
    assert!(outcome.interpretation().contains("against the Los Angeles Lakers"));
}

#[test]
fn test_lead_taking_requires_lead_change() {
    let provider = StubStatsProvider::new().with_rows(
        ContextMeasure::Pts,
        vec![
            play(2024, 2, 1, "Brown 2' Driving Layup").score((88, 89), (90, 89)).build(),
            play(2024, 2, 1, "Brown 1' Cutting Layup")
                .score((88, 88), (90, 88))
                .event(2)
                .build(),
            play(2024, 2, 1, "Brown 3' Layup")
                .score((95, 89), (97, 89))
                .event(3)
                .build(),
        ],
    );
    let (engine, _) = engine(provider);

    let outcome = engine.query("Jaylen Brown lead taking layups");

    assert_eq!(outcome.parsed.score_specifier, Some(ScoreSpecifier::LeadTaking));
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].description, "Brown 2' Driving Layup");
}

#[test]
fn test_misses_are_fetched_as_attempts() {
    let provider = StubStatsProvider::new().with_rows(
        ContextMeasure::Fga,
        vec![
            play(2024, 3, 4, "MISS Doncic 27' 3PT Step Back Jump Shot").build(),
            play(2024, 3, 6, "Doncic 27' 3PT Step Back Jump Shot (40 PTS)")
                .score((100, 100), (103, 100))
                .build(),
        ],
    );
    let (engine, provider) = engine(provider);

    let outcome = engine.query("Luka Doncic bricks in march");

    assert_eq!(provider.requested_measures(), vec![ContextMeasure::Fga]);
    assert_eq!(provider.requests()[0].month, "06");
    assert_eq!(outcome.rows.len(), 1);
    assert!(outcome.rows[0].description.starts_with("MISS"));
    assert!(outcome.interpretation().contains("misses in March"));
}

#[test]
fn test_made_attempts() {
    let provider = StubStatsProvider::new().with_rows(
        ContextMeasure::Fga,
        vec![
            play(2024, 3, 4, "MISS Antetokounmpo 5' Hook Shot").build(),
            play(2024, 3, 6, "Antetokounmpo 2' Dunk (30 PTS)")
                .score((100, 100), (102, 100))
                .build(),
        ],
    );
    let (engine, _) = engine(provider);

    let outcome = engine.query("Giannis Antetokounmpo made shots");

    assert!(outcome.parsed.makes_requested);
    assert_eq!(outcome.parsed.context_measures, BTreeSet::from([ContextMeasure::Fga]));
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].point_change, 2);
}

#[test]
fn test_rows_from_every_category_sorted_newest_first() {
    let provider = StubStatsProvider::new()
        .with_rows(
            ContextMeasure::Blk,
            vec![
                play(2023, 12, 1, "Tatum Block (1 BLK)").build(),
                play(2024, 2, 14, "Tatum Block (2 BLK)").build(),
            ],
        )
        .with_rows(
            ContextMeasure::Stl,
            vec![play(2024, 1, 10, "Tatum Steal (1 STL)")
                .video("https://videos.example/steal.mp4")
                .build()],
        );
    let (engine, provider) = engine(provider);

    let outcome = engine.query("Jayson Tatum blocks and steals");

    assert_eq!(
        provider.requested_measures(),
        vec![ContextMeasure::Blk, ContextMeasure::Stl]
    );
    let dates: Vec<_> = outcome.rows.iter().map(|r| r.game_date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2024, 2, 14),
            NaiveDate::from_ymd_opt(2024, 1, 10),
            NaiveDate::from_ymd_opt(2023, 12, 1),
        ]
    );
    assert_eq!(
        outcome.rows[1].video_link.as_deref(),
        Some("https://videos.example/steal.mp4")
    );
    assert_eq!(outcome.interpretations.len(), 2);
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_failed_category_leaves_others_intact() {
    let provider = StubStatsProvider::new()
        .with_rows(ContextMeasure::Blk, vec![play(2024, 2, 14, "Tatum Block (2 BLK)").build()])
        .failing(ContextMeasure::Stl);
    let (engine, _) = engine(provider);

    let outcome = engine.query("Jayson Tatum blocks and steals");

    assert_eq!(outcome.rows.len(), 1);
    assert!(!outcome.is_complete());
    match outcome.failures.as_slice() {
        [QueryError::FetchFailed { category, message }] => {
            assert_eq!(category, "STL");
            assert!(message.contains("503"));
        }
        other => panic!("unexpected failures: {other:?}"),
    }
}

#[test]
fn test_unknown_player_returns_nothing() {
    let (engine, provider) = engine(StubStatsProvider::new());

    let outcome = engine.query("blocks and steals");

    assert!(outcome.rows.is_empty());
    assert!(provider.requests().is_empty());
    assert_eq!(outcome.interpretation(), NO_INTERPRETATION);
    assert!(matches!(
        outcome.failures.as_slice(),
        [QueryError::PlayerNotFound { name }] if name == "blocks and steals"
    ));
}

#[test]
fn test_unknown_team_aborts_resolution() {
    let (engine, _) = engine(StubStatsProvider::new());
    let parsed = ParsedQuery {
        team_name: Some("seattle supersonics".to_string()),
        ..engine.interpret("Kevin Durant fadeaways")
    };

    let err = engine.resolve(&parsed, true).unwrap_err();
    assert_eq!(
        err,
        QueryError::UnknownTeam {
            name: "seattle supersonics".to_string()
        }
    );
}

#[test]
fn test_explain_is_offline() {
    let (engine, provider) = engine(StubStatsProvider::new());

    let explanation = engine.explain("Kevin Durant clutch fadeaways in the last minute");

    assert!(provider.requests().is_empty());
    assert!(explanation.error.is_none());
    assert_eq!(explanation.parameters.len(), 1);
    assert_eq!(explanation.parameters[0].team_id, 1610612756);
    assert_eq!(
        explanation.parameters[0].clutch_time,
        Some(ClutchWindow::Last1Minute)
    );
    assert!(explanation.interpretations[0].ends_with("in Last 1 Minute"));
}
