//! Order models produced by the order builder.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single line of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Inventory name of the medicine
    #[serde(rename = "Medicine")]
    pub medicine: String,
    /// Units reserved (never more than the stock at read time)
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    /// Quantity times unit price, in rupees
    #[serde(rename = "TotalPrice")]
    pub total_price: f64,
}

/// An order assembled for one interaction. Not persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(rename = "OrderItems")]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of all line totals.
    pub fn grand_total(&self) -> f64 {
        self.items.iter().map(|item| item.total_price).sum()
    }

    /// Total units across all lines.
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| item.quantity as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Soft problems found while building an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum OrderWarning {
    /// More units were requested than are on the shelf; the line was capped
    InsufficientStock {
        medicine: String,
        requested: u32,
        available: u32,
    },
    /// Nothing was requested, so no line was added
    ZeroQuantity { medicine: String },
}

impl fmt::Display for OrderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderWarning::InsufficientStock {
                medicine,
                available,
                ..
            } => write!(
                f,
                "Only {} units available for {}. Adding available quantity to order.",
                available, medicine
            ),
            OrderWarning::ZeroQuantity { medicine } => {
                write!(f, "No quantity requested for {}. Skipping.", medicine)
            }
        }
    }
}

/// Result of building an order: the order plus any warnings raised on the way.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderOutcome {
    pub order: Order,
    pub warnings: Vec<OrderWarning>,
}
