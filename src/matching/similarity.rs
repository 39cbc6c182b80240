//! Fuzzy string similarity on a 0-100 scale
//!
//! `ratio` is the Indel similarity: twice the longest common subsequence over
//! the summed lengths, so a dropped or swapped letter costs less than under
//! Levenshtein. `partial_ratio` slides the shorter string across the longer one and keeps
//! the best window, so a name embedded in a longer query still scores high.

/// Whole-string similarity, 0.0 to 100.0
///
/// `100 * 2 * lcs(a, b) / (|a| + |b|)` over characters; two empty strings
/// score 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(&a, &b) as f64 / total as f64
}

/// Longest common subsequence length, one row of the DP table at a time
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Best `ratio` of the shorter string against every equal-length window of
/// the longer string (character windows, not byte windows).
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    let (short, long, short_len, long_len) = if a_len <= b_len {
        (a, b, a_len, b_len)
    } else {
        (b, a, b_len, a_len)
    };

    if short_len == 0 {
        return if long_len == 0 { 100.0 } else { 0.0 };
    }
    if short_len == long_len {
        return ratio(short, long);
    }

    let long_chars: Vec<char> = long.chars().collect();
    let mut best = 0.0_f64;

    for start in 0..=(long_len - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        let score = ratio(short, &window);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }

    best
}

/// Best-scoring candidate from a fuzzy search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatch<'a> {
    /// Position of the candidate in the searched slice
    pub index: usize,
    pub candidate: &'a str,
    pub score: f64,
}

/// Score `query` against every candidate and return the best one.
///
/// Ties keep the earliest candidate, so the result is stable for a fixed
/// candidate order.
pub fn extract_one<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
    scorer: fn(&str, &str) -> f64,
) -> Option<FuzzyMatch<'a>> {
    let mut best: Option<FuzzyMatch<'a>> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let candidate = candidate.as_ref();
        let score = scorer(query, candidate);
        if best.map_or(true, |b| score > b.score) {
            best = Some(FuzzyMatch {
                index,
                candidate,
                score,
            });
        }
    }

    best
}
