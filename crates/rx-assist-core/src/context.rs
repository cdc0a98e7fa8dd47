//! Shared state for one session: the loaded inventory plus matcher settings.

use std::path::Path;

use crate::inventory::{Inventory, InventoryResult};
use crate::matcher::{Matcher, MatcherConfig};
use crate::models::{MatchedMedicine, OrderOutcome};
use crate::order::build_order;

/// Inventory loaded once and reused for every match and order.
#[derive(Debug, Clone)]
pub struct PharmacyContext {
    inventory: Inventory,
    matcher_config: MatcherConfig,
}

impl PharmacyContext {
    pub fn new(inventory: Inventory, matcher_config: MatcherConfig) -> Self {
        Self {
            inventory,
            matcher_config,
        }
    }

    /// Load the inventory CSV at `path`.
    pub fn load<P: AsRef<Path>>(path: P, matcher_config: MatcherConfig) -> InventoryResult<Self> {
        Ok(Self::new(Inventory::load_csv(path)?, matcher_config))
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn matcher_config(&self) -> &MatcherConfig {
        &self.matcher_config
    }

    pub fn matcher(&self) -> Matcher<'_> {
        Matcher::with_config(&self.inventory, self.matcher_config)
    }

    /// Parse OCR text and match it against the inventory.
    pub fn match_text(&self, text: &str) -> Vec<MatchedMedicine> {
        self.matcher().match_text(text)
    }

    /// Build an order from matched medicines and requested quantities.
    pub fn build_order(&self, selections: &[(MatchedMedicine, u32)]) -> OrderOutcome {
        build_order(selections)
    }
}
