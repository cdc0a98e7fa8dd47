//! Inventory table loading.
//!
//! The stock table is read once at startup from a CSV file with at least the
//! columns `MedicineName`, `QuantityInStock` and `PriceInRupees`. Extra columns
//! are ignored. The loaded [`Inventory`] is immutable.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::models::InventoryRecord;

/// Columns every inventory file must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["MedicineName", "QuantityInStock", "PriceInRupees"];

/// Inventory loading errors.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Row as it appears in the file, before validation.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "MedicineName")]
    medicine_name: String,
    #[serde(rename = "QuantityInStock")]
    quantity_in_stock: String,
    #[serde(rename = "PriceInRupees")]
    price_in_rupees: String,
}

impl RawRow {
    fn validate(self, row: usize) -> InventoryResult<InventoryRecord> {
        let name = self.medicine_name.trim();
        if name.is_empty() {
            return Err(InventoryError::InvalidRow {
                row,
                message: "empty MedicineName".into(),
            });
        }

        let quantity = self
            .quantity_in_stock
            .trim()
            .parse::<u32>()
            .map_err(|_| InventoryError::InvalidRow {
                row,
                message: format!(
                    "QuantityInStock must be a non-negative integer, got {:?}",
                    self.quantity_in_stock
                ),
            })?;

        let price = self
            .price_in_rupees
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| InventoryError::InvalidRow {
                row,
                message: format!(
                    "PriceInRupees must be a non-negative number, got {:?}",
                    self.price_in_rupees
                ),
            })?;

        Ok(InventoryRecord::new(name, quantity, price))
    }
}

/// The loaded, read-only stock table.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    records: Vec<InventoryRecord>,
    /// Lower-cased names, index-aligned with `records`
    match_keys: Vec<String>,
}

impl Inventory {
    /// Build an inventory from already-validated records.
    pub fn new(records: Vec<InventoryRecord>) -> Self {
        let match_keys = records.iter().map(|r| r.match_key()).collect();
        Self {
            records,
            match_keys,
        }
    }

    /// Load an inventory CSV from disk.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> InventoryResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let inventory = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = inventory.len(),
            "Loaded inventory"
        );
        Ok(inventory)
    }

    /// Parse inventory CSV from any reader.
    pub fn from_reader<R: Read>(reader: R) -> InventoryResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(InventoryError::MissingColumn(column.to_string()));
            }
        }

        let mut records = Vec::new();
        for (index, result) in csv_reader.deserialize::<RawRow>().enumerate() {
            let raw = result?;
            records.push(raw.validate(index + 1)?);
        }

        Ok(Self::new(records))
    }

    /// All records in file order.
    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    /// Lower-cased names in file order.
    pub fn match_keys(&self) -> &[String] {
        &self.match_keys
    }

    /// First record whose lower-cased name equals `key`.
    pub fn find_by_match_key(&self, key: &str) -> Option<&InventoryRecord> {
        self.match_keys
            .iter()
            .position(|k| k == key)
            .map(|i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
