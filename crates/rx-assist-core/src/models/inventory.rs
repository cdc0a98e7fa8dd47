//! Pharmacy inventory models.

use serde::{Deserialize, Serialize};

/// A single row of the pharmacy stock table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryRecord {
    /// Medicine name as printed in the stock table
    #[serde(rename = "MedicineName")]
    pub medicine_name: String,
    /// Units currently on the shelf
    #[serde(rename = "QuantityInStock")]
    pub quantity_in_stock: u32,
    /// Unit price in rupees
    #[serde(rename = "PriceInRupees")]
    pub price_in_rupees: f64,
}

impl InventoryRecord {
    /// Create a new inventory record.
    pub fn new(medicine_name: impl Into<String>, quantity_in_stock: u32, price_in_rupees: f64) -> Self {
        Self {
            medicine_name: medicine_name.into(),
            quantity_in_stock,
            price_in_rupees,
        }
    }

    /// Lower-cased name used as the fuzzy-matching key.
    pub fn match_key(&self) -> String {
        self.medicine_name.to_lowercase()
    }

    /// Whether at least one unit can be sold.
    pub fn in_stock(&self) -> bool {
        self.quantity_in_stock > 0
    }

    /// Price of `quantity` units.
    pub fn price_for(&self, quantity: u32) -> f64 {
        quantity as f64 * self.price_in_rupees
    }
}
