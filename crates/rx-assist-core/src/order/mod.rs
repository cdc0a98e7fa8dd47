//! Order construction from matched medicines.
//!
//! Building is a pure function over `(MatchedMedicine, requested quantity)`
//! pairs. Stock is a soft limit: a request above stock is capped and a
//! warning is recorded, but a line is still produced.

mod export;

pub use export::*;

use tracing::warn;

use crate::models::{MatchedMedicine, OrderItem, OrderOutcome, OrderWarning};

/// Build an order from matched medicines and the quantities asked for them.
///
/// Lines keep the order of `selections`. A zero request adds no line.
pub fn build_order(selections: &[(MatchedMedicine, u32)]) -> OrderOutcome {
    let mut outcome = OrderOutcome::default();

    for (matched, requested) in selections {
        let record = &matched.record;
        let requested = *requested;

        if requested == 0 {
            outcome.warnings.push(OrderWarning::ZeroQuantity {
                medicine: record.medicine_name.clone(),
            });
            continue;
        }

        let quantity = if requested <= record.quantity_in_stock {
            requested
        } else {
            warn!(
                medicine = %record.medicine_name,
                requested,
                available = record.quantity_in_stock,
                "Insufficient stock, capping order line"
            );
            outcome.warnings.push(OrderWarning::InsufficientStock {
                medicine: record.medicine_name.clone(),
                requested,
                available: record.quantity_in_stock,
            });
            record.quantity_in_stock
        };

        outcome.order.items.push(OrderItem {
            medicine: record.medicine_name.clone(),
            quantity,
            total_price: record.price_for(quantity),
        });
    }

    outcome
}
