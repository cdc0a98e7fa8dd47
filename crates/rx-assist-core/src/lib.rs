//! Rx-Assist Core Library
//!
//! Prescription OCR and pharmacy order building against a CSV inventory.
//!
//! # Architecture
//!
//! ```text
//! Prescription image → Preprocess → OCR engine → Plain text
//!                                                    │
//!                                     ┌──────────────┴──────────────┐
//!                                     │                             │
//!                                     ▼                             ▼
//!                               Chat (LLM crate)            Mention parsing
//!                                                                   │
//!                                                      Fuzzy match vs inventory
//!                                                                   │
//!                                                     Quantities (capped by stock)
//!                                                                   │
//!                                                     ┌─────────────▼─────────────┐
//!                                                     │  {"OrderItems": [...]}    │
//!                                                     │  summary lines, CSV       │
//!                                                     └───────────────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **Stock is a soft limit.** A request above stock is capped to what is
//! available and reported as a warning; it never fails the order.
//!
//! # Modules
//!
//! - [`inventory`]: CSV inventory loading and validation
//! - [`models`]: Domain types (InventoryRecord, MatchedMedicine, Order, etc.)
//! - [`ocr`]: Image preprocessing and the OCR engine seam
//! - [`matcher`]: Mention parser and fuzzy scorer
//! - [`order`]: Order building and export
//! - [`context`]: Inventory plus matcher settings for one session

pub mod context;
pub mod inventory;
pub mod matcher;
pub mod models;
pub mod ocr;
pub mod order;

// Re-export commonly used types
pub use context::PharmacyContext;
pub use inventory::{Inventory, InventoryError};
pub use matcher::{parse_mentions, Matcher, MatcherConfig, Scorer, DEFAULT_THRESHOLD};
pub use models::{
    InventoryRecord, MatchedMedicine, Order, OrderItem, OrderOutcome, OrderWarning,
    ParsedMedicineMention,
};
pub use ocr::{OcrEngine, OcrError, OcrOutcome, Preprocessor, Preset, TesseractCli};
pub use order::build_order;
