//! Entity extraction from reformulated queries
//!
//! Seven independent extractions read the same text:
//!
//! | Entity          | Source                                     | Default         |
//! |-----------------|--------------------------------------------|-----------------|
//! | player          | full-name phrases, then first/last names   | none            |
//! | team            | team-name phrases (exact)                  | none            |
//! | season type     | fixed regexes, Playoffs first              | Regular Season  |
//! | context measure | category keywords (union)                  | `{PTS}`         |
//! | shot specifiers | shot keywords, canonical tags              | empty           |
//! | score specifier | first table phrase, whole word             | none            |
//! | clutch window   | most specific matching phrase              | none            |
//! | month           | first month token                          | `"0"`           |

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::interpret::types::{
    ClutchWindow, ContextMeasure, ParsedQuery, ScoreSpecifier, SeasonType, ANY_MONTH,
};
use crate::matching::{normalize_text, PhraseMatcher, Tokenizer, WordTokenizer};
use crate::reference::ReferenceSnapshot;
use crate::vocabulary::Vocabulary;

/// Season-type patterns in precedence order
static SEASON_PATTERNS: Lazy<Vec<(Regex, SeasonType)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)\b(play[-\s]?offs?|postseason)\b").unwrap(),
            SeasonType::Playoffs,
        ),
        (
            Regex::new(r"(?i)\bregular season\b").unwrap(),
            SeasonType::RegularSeason,
        ),
        (
            Regex::new(r"(?i)\b(pre[-\s]?season)\b").unwrap(),
            SeasonType::PreSeason,
        ),
        (
            Regex::new(r"(?i)\ball[-\s]?star\b").unwrap(),
            SeasonType::AllStar,
        ),
    ]
});

/// Extracts structured entities from a query
pub struct EntityExtractor {
    directory: Arc<ReferenceSnapshot>,
    vocabulary: Arc<Vocabulary>,
    tokenizer: Arc<dyn Tokenizer>,
    player_phrases: PhraseMatcher<String>,
    team_phrases: PhraseMatcher<String>,
}

impl EntityExtractor {
    pub fn new(directory: Arc<ReferenceSnapshot>, vocabulary: Arc<Vocabulary>) -> Self {
        Self::with_tokenizer(directory, vocabulary, Arc::new(WordTokenizer))
    }

    pub fn with_tokenizer(
        directory: Arc<ReferenceSnapshot>,
        vocabulary: Arc<Vocabulary>,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Self {
        let player_phrases = directory
            .player_keys()
            .iter()
            .map(|key| (tokenizer.tokenize(key), key.clone()))
            .collect();
        let team_phrases = directory
            .team_keys()
            .iter()
            .map(|key| (tokenizer.tokenize(key), key.clone()))
            .collect();

        Self {
            directory,
            vocabulary,
            tokenizer,
            player_phrases,
            team_phrases,
        }
    }

    /// Extract every entity from an already reformulated query
    pub fn extract(&self, query: &str) -> ParsedQuery {
        let text = normalize_text(query);
        let tokens = self.tokenizer.tokenize(&text);
        let (context_measures, shot_specifiers) = self.extract_measures(&tokens);

        let parsed = ParsedQuery {
            player_name: self.extract_player(&tokens),
            team_name: self.extract_team(&tokens),
            season_type: extract_season_type(&text),
            context_measures,
            shot_specifiers,
            score_specifier: self.extract_score_specifier(&text),
            month: self.extract_month(&tokens),
            clutch_window: self.extract_clutch_window(&text),
            makes_requested: tokens.iter().any(|t| self.vocabulary.is_makes_keyword(t)),
            reformulated: text,
        };

        tracing::debug!(
            player = ?parsed.player_name,
            team = ?parsed.team_name,
            season_type = %parsed.season_type,
            measures = ?parsed.context_measures,
            shots = ?parsed.shot_specifiers,
            score = ?parsed.score_specifier,
            month = %parsed.month,
            clutch = ?parsed.clutch_window,
            "Extracted entities"
        );

        parsed
    }

    /// Resolve the player's full-name key.
    ///
    /// A full-name phrase wins. Otherwise tokens are scanned left to right: a
    /// first name followed by the rest of a known name, a last name shared by
    /// exactly one player, or an ambiguous last name preceded by its first name.
    pub fn extract_player(&self, tokens: &[String]) -> Option<String> {
        if let Some(found) = self.player_phrases.find_first(tokens) {
            return Some(found.value);
        }

        for (i, token) in tokens.iter().enumerate() {
            if self.directory.full_names_for_first(token).is_some() {
                if let Some(next) = tokens.get(i + 1) {
                    let candidate = format!("{token} {next}");
                    if self.directory.contains_player(&candidate) {
                        return Some(candidate);
                    }
                }
            }

            if let Some(names) = self.directory.full_names_for_last(token) {
                if let [only] = names {
                    return Some(only.clone());
                }
                if i > 0 {
                    let candidate = format!("{} {token}", tokens[i - 1]);
                    if self.directory.contains_player(&candidate) {
                        return Some(candidate);
                    }
                }
            }
        }

        None
    }

    /// First team name appearing in the query
    pub fn extract_team(&self, tokens: &[String]) -> Option<String> {
        self.team_phrases.find_first(tokens).map(|m| m.value)
    }

    /// Union of categories plus canonical shot specifiers in query order
    pub fn extract_measures(&self, tokens: &[String]) -> (BTreeSet<ContextMeasure>, Vec<String>) {
        let mut measures = BTreeSet::new();
        let mut shots: Vec<(usize, &str)> = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            if let Some(term) = self.vocabulary.term(token) {
                measures.extend(term.measures.iter().copied());
                if let Some(tag) = &term.shot_specifier {
                    shots.push((i, tag.as_str()));
                }
            }
        }

        let phrases = self.vocabulary.find_phrase_terms(tokens);
        for found in &phrases {
            measures.extend(found.value.measures.iter().copied());
            if let Some(tag) = &found.value.shot_specifier {
                shots.push((found.start, tag.as_str()));
            }
        }

        if measures.is_empty() {
            measures.insert(ContextMeasure::Pts);
        }

        shots.sort_by_key(|(pos, _)| *pos);
        let mut shot_specifiers: Vec<String> = Vec::new();
        for (_, tag) in shots {
            if !shot_specifiers.iter().any(|s| s == tag) {
                shot_specifiers.push(tag.to_string());
            }
        }

        (measures, shot_specifiers)
    }

    /// Tag of the first score phrase, in table order, found in the query
    pub fn extract_score_specifier(&self, text: &str) -> Option<ScoreSpecifier> {
        self.vocabulary
            .score_patterns()
            .iter()
            .find(|(pattern, _)| pattern.is_match(text))
            .map(|(_, tag)| *tag)
    }

    /// Most specific clutch window among all matching phrases
    pub fn extract_clutch_window(&self, text: &str) -> Option<ClutchWindow> {
        self.vocabulary
            .clutch_patterns()
            .iter()
            .filter(|(pattern, _)| pattern.is_match(text))
            .map(|(_, window)| *window)
            .min()
    }

    /// Season-calendar code of the first month token
    pub fn extract_month(&self, tokens: &[String]) -> String {
        tokens
            .iter()
            .find_map(|t| self.vocabulary.month_code(t))
            .unwrap_or(ANY_MONTH)
            .to_string()
    }
}

/// Season type by pattern precedence
pub fn extract_season_type(text: &str) -> SeasonType {
    SEASON_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, season)| *season)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{PlayerRecord, TeamRecord};

    fn extractor() -> EntityExtractor {
        let players = [
            ("LeBron James", 2544),
            ("Victor Wembanyama", 1641705),
            ("Dejounte Murray", 1627749),
            ("Jamal Murray", 1627750),
            ("Jalen Green", 1630224),
            ("Jalen Johnson", 1630552),
            ("Jaren Jackson Jr.", 1628991),
        ]
        .into_iter()
        .map(|(name, id)| PlayerRecord {
            full_name: name.to_string(),
            id,
            team_id: None,
        })
        .collect();
        let teams = vec![
            TeamRecord {
                name: "LAKERS".to_string(),
                id: 1610612747,
            },
            TeamRecord {
                name: "GOLDEN STATE WARRIORS".to_string(),
                id: 1610612744,
            },
            TeamRecord {
                name: "WARRIORS".to_string(),
                id: 1610612744,
            },
        ];

        EntityExtractor::new(
            Arc::new(ReferenceSnapshot::new(players, teams)),
            Arc::new(Vocabulary::builtin().unwrap()),
        )
    }

    #[test]
    fn test_full_name_phrase() {
        let parsed = extractor().extract("dejounte murray floaters");
        assert_eq!(parsed.player_name.as_deref(), Some("dejounte murray"));
    }

    #[test]
    fn test_unique_last_name() {
        let parsed = extractor().extract("wembanyama fadeaways in playoffs");
        assert_eq!(parsed.player_name.as_deref(), Some("victor wembanyama"));
    }

    #[test]
    fn test_ambiguous_last_name_alone_is_unresolved() {
        assert_eq!(extractor().extract("murray dunks").player_name, None);
    }

    #[test]
    fn test_first_name_needs_following_token() {
        let e = extractor();
        assert_eq!(e.extract("jalen dunks").player_name, None);
        assert_eq!(
            e.extract("jalen green dunks").player_name.as_deref(),
            Some("jalen green")
        );
    }

    #[test]
    fn test_suffix_name_resolves_through_last_token() {
        let parsed = extractor().extract("jaren jackson jr. blocks");
        assert_eq!(parsed.player_name.as_deref(), Some("jaren jackson jr"));
    }

    #[test]
    fn test_no_player_tokens() {
        assert_eq!(extractor().extract("blocks and steals").player_name, None);
    }

    #[test]
    fn test_team_first_match() {
        let e = extractor();
        assert_eq!(
            e.extract("lebron james dunks against golden state warriors")
                .team_name
                .as_deref(),
            Some("golden state warriors")
        );
        assert_eq!(
            e.extract("lebron james vs lakers").team_name.as_deref(),
            Some("lakers")
        );
    }

    #[test]
    fn test_measures_are_a_union() {
        let parsed = extractor().extract("blocks and steals");
        assert_eq!(
            parsed.context_measures,
            BTreeSet::from([ContextMeasure::Blk, ContextMeasure::Stl])
        );
    }

    #[test]
    fn test_default_measure_is_points() {
        let parsed = extractor().extract("lebron james");
        assert_eq!(parsed.context_measures, BTreeSet::from([ContextMeasure::Pts]));
        assert!(parsed.shot_specifiers.is_empty());
    }

    #[test]
    fn test_multi_word_category_phrase() {
        let parsed = extractor().extract("lebron james field goal attempts");
        assert!(parsed.context_measures.contains(&ContextMeasure::Fga));
    }

    #[test]
    fn test_shot_specifiers_canonical_and_deduplicated() {
        let parsed = extractor().extract("lebron james dunks and slams and fadeaways");
        assert_eq!(parsed.shot_specifiers, vec!["Dunk", "Fadeaway"]);
        assert_eq!(parsed.context_measures, BTreeSet::from([ContextMeasure::Pts]));
    }

    #[test]
    fn test_season_precedence() {
        assert_eq!(
            extract_season_type("playoffs and regular season"),
            SeasonType::Playoffs
        );
        assert_eq!(extract_season_type("pre-season"), SeasonType::PreSeason);
        assert_eq!(extract_season_type("all star game"), SeasonType::AllStar);
        assert_eq!(extract_season_type("dunks"), SeasonType::RegularSeason);
    }

    #[test]
    fn test_clutch_precedence() {
        let e = extractor();
        assert_eq!(
            e.extract_clutch_window("clutch last second shots"),
            Some(ClutchWindow::Last10Seconds)
        );
        assert_eq!(
            e.extract_clutch_window("clutch and final minute"),
            Some(ClutchWindow::Last1Minute)
        );
        assert_eq!(e.extract_clutch_window("dunks"), None);
    }

    #[test]
    fn test_score_specifier_first_in_table_order() {
        let e = extractor();
        assert_eq!(
            e.extract_score_specifier("go-ahead and game-tying shots"),
            Some(ScoreSpecifier::GameTying)
        );
        assert_eq!(
            e.extract_score_specifier("go ahead buckets"),
            Some(ScoreSpecifier::LeadTaking)
        );
        assert_eq!(e.extract_score_specifier("untying"), None);
    }

    #[test]
    fn test_month() {
        let e = extractor();
        assert_eq!(e.extract("lebron james dunks in march").month, "06");
        assert_eq!(e.extract("lebron james dunks in oct").month, "01");
        assert_eq!(e.extract("lebron james dunks").month, ANY_MONTH);
    }

    #[test]
    fn test_makes_requested() {
        let e = extractor();
        assert!(e.extract("lebron james made shots").makes_requested);
        assert!(!e.extract("lebron james shots").makes_requested);
    }
}
