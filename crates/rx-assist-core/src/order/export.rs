//! Order export for display and hand-off.

use crate::models::Order;

impl Order {
    /// Export to pretty JSON: `{"OrderItems": [...]}`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("Medicine,Quantity,TotalPrice\n");

        // Lines
        for item in &self.items {
            csv.push_str(&format!(
                "{},{},{:.2}\n",
                escape_csv(&item.medicine),
                item.quantity,
                item.total_price,
            ));
        }

        csv
    }

    /// One human-readable line per item, e.g. `- Paracetamol: 3 units (₹15.00)`.
    pub fn summary_lines(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| {
                format!(
                    "- {}: {} units ({})",
                    item.medicine,
                    item.quantity,
                    format_rupees(item.total_price)
                )
            })
            .collect()
    }
}

/// Format an amount as rupees with two decimals.
pub fn format_rupees(amount: f64) -> String {
    format!("₹{:.2}", amount)
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
