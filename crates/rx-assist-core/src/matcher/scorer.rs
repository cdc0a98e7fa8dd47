//! Fuzzy string scoring on a 0 - 100 scale.
//!
//! Scores are indel based: `2 * M / T`, where `M` is the length of the
//! longest common subsequence and `T` the combined length of both strings.
//! Two scorers are offered:
//! - [`Scorer::WeightedRatio`] (default): best of plain, partial and token
//!   based ratios, scaled so that partial and token matches never beat an
//!   exact match
//! - [`Scorer::Ratio`]: plain similarity of the processed strings
//!
//! Scores round half to even.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Scale applied to token sort/set scores.
const TOKEN_SCALE: f64 = 0.95;

/// Length ratio from which partial scorers are considered.
const PARTIAL_LENGTH_RATIO: f64 = 1.5;

/// Length ratio above which partial scores are scaled down hard.
const LONG_LENGTH_RATIO: f64 = 8.0;

/// Similarity function used to rank inventory names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scorer {
    /// Indel similarity of the whole strings
    Ratio,
    /// Best of ratio, partial ratio and token ratios
    #[default]
    WeightedRatio,
}

impl Scorer {
    /// Score two strings (0 - 100). Both are processed first; an empty
    /// processed string scores 0.
    pub fn score(&self, a: &str, b: &str) -> u8 {
        let a = process(a);
        let b = process(b);
        if a.is_empty() || b.is_empty() {
            return 0;
        }
        match self {
            Scorer::Ratio => ratio(&a, &b),
            Scorer::WeightedRatio => weighted_ratio(&a, &b),
        }
    }

    /// Index and score of the best choice for `query`. Ties keep the
    /// earliest choice. `None` when there are no choices.
    pub fn best_match<S: AsRef<str>>(&self, query: &str, choices: &[S]) -> Option<(usize, u8)> {
        let mut best: Option<(usize, u8)> = None;
        for (index, choice) in choices.iter().enumerate() {
            let score = self.score(query, choice.as_ref());
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
            if score == 100 {
                break;
            }
        }
        best
    }
}

impl fmt::Display for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scorer::Ratio => write!(f, "ratio"),
            Scorer::WeightedRatio => write!(f, "weighted"),
        }
    }
}

impl FromStr for Scorer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ratio" => Ok(Scorer::Ratio),
            "weighted" | "wratio" | "weighted_ratio" => Ok(Scorer::WeightedRatio),
            other => Err(format!("unknown scorer: {other}")),
        }
    }
}

/// Lower-case, replace anything that is not alphanumeric with a space, trim.
pub fn process(s: &str) -> String {
    let replaced: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    replaced.trim().to_lowercase()
}

fn to_score(similarity: f64) -> u8 {
    round_score(similarity * 100.0)
}

fn round_score(score: f64) -> u8 {
    score.round_ties_even().clamp(0.0, 100.0) as u8
}

/// Length of the longest common subsequence.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Indel similarity in 0.0 - 1.0.
fn indel_similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * lcs_len(a, b) as f64 / total as f64
}

/// Plain indel similarity.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    to_score(indel_similarity(&a, &b))
}

/// Best ratio of the shorter string against every same-length window of
/// the longer one.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut best = 0.0f64;
    for window in long.windows(short.len()) {
        let similarity = indel_similarity(&short, window);
        if similarity > best {
            best = similarity;
            if best >= 1.0 {
                break;
            }
        }
    }
    to_score(best)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Ratio after sorting whitespace-separated tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn partial_token_sort_ratio(a: &str, b: &str) -> u8 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Token set comparison: shared tokens against each side's remainder.
fn token_set_with(a: &str, b: &str, scorer: fn(&str, &str) -> u8) -> u8 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    let sorted_sect = intersection.join(" ");
    let combined_a = format!("{} {}", sorted_sect, only_a.join(" ")).trim().to_string();
    let combined_b = format!("{} {}", sorted_sect, only_b.join(" ")).trim().to_string();

    [
        scorer(&sorted_sect, &combined_a),
        scorer(&sorted_sect, &combined_b),
        scorer(&combined_a, &combined_b),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

/// Token set ratio.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    token_set_with(a, b, ratio)
}

fn partial_token_set_ratio(a: &str, b: &str) -> u8 {
    token_set_with(a, b, partial_ratio)
}

/// Weighted combination of the scorers above. Inputs must already be processed.
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let base = ratio(a, b) as f64;
    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    let length_ratio = len_a.max(len_b) / len_a.min(len_b);

    let best = if length_ratio < PARTIAL_LENGTH_RATIO {
        let token_sort = token_sort_ratio(a, b) as f64 * TOKEN_SCALE;
        let token_set = token_set_ratio(a, b) as f64 * TOKEN_SCALE;
        base.max(token_sort).max(token_set)
    } else {
        let partial_scale = if length_ratio < LONG_LENGTH_RATIO { 0.9 } else { 0.6 };
        let partial = partial_ratio(a, b) as f64 * partial_scale;
        let partial_sort = partial_token_sort_ratio(a, b) as f64 * TOKEN_SCALE * partial_scale;
        let partial_set = partial_token_set_ratio(a, b) as f64 * TOKEN_SCALE * partial_scale;
        base.max(partial).max(partial_sort).max(partial_set)
    };

    round_score(best)
}
