//! Text matching primitives shared by the reformulator and the extractor
//!
//! - [`normalize`]: the [`Tokenizer`] capability and the default [`WordTokenizer`]
//! - [`phrase`]: leftmost-longest [`PhraseMatcher`] over token streams
//! - [`similarity`]: 0-100 Indel-based fuzzy scores

pub mod normalize;
pub mod phrase;
pub mod similarity;

pub use normalize::{normalize_key, normalize_text, tokenize, Tokenizer, WordTokenizer};
pub use phrase::{PhraseMatch, PhraseMatcher};
pub use similarity::{extract_one, partial_ratio, ratio, FuzzyMatch};
