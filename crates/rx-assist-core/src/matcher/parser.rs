//! Medicine mention parser.
//!
//! Pulls `(name, dosage)` candidates out of raw OCR text with a single
//! pattern: an alphabetic token, an optional number, then `m` with an
//! optional `g`. Matching is left to right and non-overlapping.
//!
//! The pattern is a heuristic. Multi-word names only contribute the last
//! word before the dosage, and units other than mg are not recognised.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ParsedMedicineMention;

/// Mention pattern: name, optional dosage digits, `m` + optional `g`.
pub const MENTION_PATTERN: &str = r"([A-Za-z]+)\s*(\d+)?\s*mg?";

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(MENTION_PATTERN).expect("mention pattern is a valid regex"));

/// Extract all medicine mentions from OCR text, in text order.
pub fn parse_mentions(text: &str) -> Vec<ParsedMedicineMention> {
    MENTION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str().trim().to_lowercase();
            let dosage_mg = caps.get(2).and_then(|d| d.as_str().parse::<u32>().ok());

            Some(ParsedMedicineMention {
                name,
                dosage_mg,
                raw_text: whole.as_str().to_string(),
                start_offset: whole.start(),
                end_offset: whole.end(),
            })
        })
        .collect()
}
