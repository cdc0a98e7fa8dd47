//! Medicine mentions extracted from OCR text and their inventory matches.

use serde::{Deserialize, Serialize};

use super::inventory::InventoryRecord;

/// Candidate medicine name pulled out of OCR text by the mention parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedMedicineMention {
    /// Lower-cased alphabetic token
    pub name: String,
    /// Dosage in mg, when a number preceded the unit
    pub dosage_mg: Option<u32>,
    /// Text span that produced this mention
    pub raw_text: String,
    /// Start byte offset in the OCR text
    pub start_offset: usize,
    /// End byte offset in the OCR text
    pub end_offset: usize,
}

/// An inventory row accepted as the best fuzzy match for a mention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchedMedicine {
    /// The mention this match was produced for
    pub mention: ParsedMedicineMention,
    /// The inventory row
    pub record: InventoryRecord,
    /// Similarity score (0 - 100)
    pub score: u8,
}

impl MatchedMedicine {
    /// Inventory name of the matched medicine.
    pub fn medicine_name(&self) -> &str {
        &self.record.medicine_name
    }

    /// Units available at read time.
    pub fn available(&self) -> u32 {
        self.record.quantity_in_stock
    }
}
