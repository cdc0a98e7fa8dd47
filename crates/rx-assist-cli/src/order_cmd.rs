//! CLI Order and Match Commands
//!
//! Turns prescription text into matched inventory lines and an order.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;

use rx_assist_core::ocr::Preprocessor;
use rx_assist_core::order::format_rupees;
use rx_assist_core::{MatchedMedicine, OrderOutcome, PharmacyContext};

use crate::config::Config;
use crate::ocr_cmd::ocr_image;
use crate::prompt::collect_quantities;

/// Where the prescription text comes from.
pub enum TextSource {
    Image(PathBuf),
    Text(String),
}

/// What `order` prints on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFormat {
    /// Extracted text, matches, summary and JSON
    Full,
    /// Order JSON only
    Json,
    /// Order CSV only
    Csv,
}

impl OrderFormat {
    fn is_full(self) -> bool {
        self == OrderFormat::Full
    }
}

pub fn run(
    config: &Config,
    ctx: &PharmacyContext,
    source: TextSource,
    quantities: &[(String, u32)],
    format: OrderFormat,
) -> Result<()> {
    let text = match source {
        TextSource::Text(text) => text,
        TextSource::Image(path) => {
            let outcome = ocr_image(config, &path, &Preprocessor::order());
            if let Some(error) = &outcome.error {
                eprintln!("{error}");
            }
            outcome.text
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if format.is_full() {
        writeln!(out, "Extracted Prescription Text:\n{text}\n")?;
    }

    let matched = ctx.match_text(&text);
    if matched.is_empty() {
        if format.is_full() {
            writeln!(out, "No medicines from the prescription were found in the inventory.")?;
        }
        return Ok(());
    }

    if format.is_full() {
        writeln!(out, "Medicines Found in Inventory:")?;
        render_matches(&matched, &mut out)?;
        writeln!(out)?;
    }

    // Prompts go to stderr so stdout stays clean for --json-only and --csv
    let stdin = io::stdin();
    let selections =
        collect_quantities(&matched, quantities, &mut stdin.lock(), &mut io::stderr())?;

    let outcome = ctx.build_order(&selections);
    for warning in &outcome.warnings {
        eprintln!("Warning: {warning}");
    }

    render_order(&outcome, format, &mut out)
}

/// One line per match with the inventory details.
pub fn render_matches<W: Write>(matched: &[MatchedMedicine], out: &mut W) -> Result<()> {
    for m in matched {
        let dosage = m
            .mention
            .dosage_mg
            .map(|d| format!(" {d}mg"))
            .unwrap_or_default();
        writeln!(
            out,
            "- {}{} (score {}): {} in stock at {} each",
            m.medicine_name(),
            dosage,
            m.score,
            m.available(),
            format_rupees(m.record.price_in_rupees)
        )?;
    }
    Ok(())
}

/// Summary lines, grand total and order JSON, or the JSON or CSV alone.
pub fn render_order<W: Write>(
    outcome: &OrderOutcome,
    format: OrderFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OrderFormat::Csv => write!(out, "{}", outcome.order.to_csv())?,
        OrderFormat::Json => writeln!(out, "{}", outcome.order.to_json()?)?,
        OrderFormat::Full => {
            writeln!(out, "Order Summary:")?;
            for line in outcome.order.summary_lines() {
                writeln!(out, "{line}")?;
            }
            writeln!(out, "Total: {}\n", format_rupees(outcome.order.grand_total()))?;
            writeln!(out, "Order JSON:")?;
            writeln!(out, "{}", outcome.order.to_json()?)?;
        }
    }
    Ok(())
}

pub fn run_match(ctx: &PharmacyContext, text: &str) -> Result<()> {
    let matched = ctx.match_text(text);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if matched.is_empty() {
        writeln!(out, "No medicines from the prescription were found in the inventory.")?;
        return Ok(());
    }
    render_matches(&matched, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_assist_core::{Inventory, InventoryRecord, MatcherConfig};

    fn context() -> PharmacyContext {
        PharmacyContext::new(
            Inventory::new(vec![
                InventoryRecord::new("Paracetamol", 10, 5.0),
                InventoryRecord::new("Ibuprofen", 4, 2.5),
            ]),
            MatcherConfig::default(),
        )
    }

    #[test]
    fn test_render_matches() {
        let matched = context().match_text("Paracetamol 500mg");
        let mut out = Vec::new();
        render_matches(&matched, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "- Paracetamol 500mg (score 100): 10 in stock at ₹5.00 each\n"
        );
    }

    #[test]
    fn test_render_order_full_and_json_only() {
        let ctx = context();
        let matched = ctx.match_text("Paracetamol 500mg\nIbuprofen 400mg");
        let selections: Vec<_> = matched.into_iter().zip([3, 9]).collect();
        let outcome = ctx.build_order(&selections);

        let mut full = Vec::new();
        render_order(&outcome, OrderFormat::Full, &mut full).unwrap();
        let full = String::from_utf8(full).unwrap();
        assert!(full.contains("- Paracetamol: 3 units (₹15.00)"));
        assert!(full.contains("- Ibuprofen: 4 units (₹10.00)"));
        assert!(full.contains("Total: ₹25.00"));

        let mut json_only = Vec::new();
        render_order(&outcome, OrderFormat::Json, &mut json_only).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&json_only).unwrap();
        assert_eq!(parsed["OrderItems"][1]["Quantity"], 4);
    }

    #[test]
    fn test_render_order_csv() {
        let ctx = context();
        let matched = ctx.match_text("Paracetamol 500mg\nIbuprofen 400mg");
        let selections: Vec<_> = matched.into_iter().zip([2, 1]).collect();
        let outcome = ctx.build_order(&selections);

        let mut csv = Vec::new();
        render_order(&outcome, OrderFormat::Csv, &mut csv).unwrap();

        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "Medicine,Quantity,TotalPrice\nParacetamol,2,10.00\nIbuprofen,1,2.50\n"
        );
    }
}
