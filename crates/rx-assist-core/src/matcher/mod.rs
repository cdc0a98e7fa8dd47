//! Medicine matcher.
//!
//! Pipeline: OCR text → Mention parsing → Fuzzy scoring → Threshold → Inventory lookup

mod parser;
mod scorer;

pub use parser::*;
pub use scorer::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::inventory::Inventory;
use crate::models::{MatchedMedicine, ParsedMedicineMention};

/// Minimum similarity (0 - 100) for a mention to be accepted.
pub const DEFAULT_THRESHOLD: u8 = 80;

/// Matcher settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum accepted score, inclusive
    pub threshold: u8,
    /// Similarity function
    pub scorer: Scorer,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            scorer: Scorer::default(),
        }
    }
}

/// Matches OCR mentions against a loaded inventory.
pub struct Matcher<'a> {
    inventory: &'a Inventory,
    config: MatcherConfig,
}

impl<'a> Matcher<'a> {
    /// Create a matcher with default settings.
    pub fn new(inventory: &'a Inventory) -> Self {
        Self::with_config(inventory, MatcherConfig::default())
    }

    /// Create a matcher with explicit settings.
    pub fn with_config(inventory: &'a Inventory, config: MatcherConfig) -> Self {
        Self { inventory, config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Match a single mention. `None` when the best score is below threshold
    /// or the inventory is empty.
    pub fn match_mention(&self, mention: &ParsedMedicineMention) -> Option<MatchedMedicine> {
        let keys = self.inventory.match_keys();
        let (index, score) = self.config.scorer.best_match(&mention.name, keys)?;

        if score < self.config.threshold {
            debug!(
                mention = %mention.name,
                best = %keys[index],
                score,
                threshold = self.config.threshold,
                "Mention below threshold, dropping"
            );
            return None;
        }

        let record = self.inventory.find_by_match_key(&keys[index])?;
        debug!(mention = %mention.name, medicine = %record.medicine_name, score, "Mention matched");

        Some(MatchedMedicine {
            mention: mention.clone(),
            record: record.clone(),
            score,
        })
    }

    /// Match every mention in order. Unmatched mentions are silently dropped.
    pub fn match_all(&self, mentions: &[ParsedMedicineMention]) -> Vec<MatchedMedicine> {
        mentions
            .iter()
            .filter_map(|m| self.match_mention(m))
            .collect()
    }

    /// Parse OCR text and match every mention found in it.
    pub fn match_text(&self, text: &str) -> Vec<MatchedMedicine> {
        let mentions = parse_mentions(text);
        let matched = self.match_all(&mentions);
        debug!(
            mentions = mentions.len(),
            matched = matched.len(),
            "Matched OCR text against inventory"
        );
        matched
    }
}
