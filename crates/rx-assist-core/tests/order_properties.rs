//! Property tests for order building.

use proptest::prelude::*;

use rx_assist_core::models::{InventoryRecord, MatchedMedicine, OrderWarning, ParsedMedicineMention};
use rx_assist_core::order::build_order;

fn matched(stock: u32, price_paise: u32) -> MatchedMedicine {
    MatchedMedicine {
        mention: ParsedMedicineMention {
            name: "paracetamol".into(),
            dosage_mg: Some(500),
            raw_text: "Paracetamol 500mg".into(),
            start_offset: 0,
            end_offset: 17,
        },
        record: InventoryRecord::new("Paracetamol", stock, price_paise as f64 / 100.0),
        score: 100,
    }
}

proptest! {
    #[test]
    fn within_stock_is_exact(stock in 1u32..10_000, price in 0u32..100_000, pick in 0.0f64..1.0) {
        let requested = 1 + ((stock - 1) as f64 * pick) as u32;
        let m = matched(stock, price);
        let outcome = build_order(&[(m.clone(), requested)]);

        prop_assert!(outcome.warnings.is_empty());
        prop_assert_eq!(outcome.order.items.len(), 1);
        prop_assert_eq!(outcome.order.items[0].quantity, requested);
        prop_assert_eq!(
            outcome.order.items[0].total_price,
            requested as f64 * m.record.price_in_rupees
        );
    }

    #[test]
    fn above_stock_is_capped(stock in 0u32..10_000, extra in 1u32..10_000, price in 0u32..100_000) {
        let requested = stock + extra;
        let outcome = build_order(&[(matched(stock, price), requested)]);

        prop_assert_eq!(outcome.order.items[0].quantity, stock);
        prop_assert_eq!(
            &outcome.warnings,
            &vec![OrderWarning::InsufficientStock {
                medicine: "Paracetamol".into(),
                requested,
                available: stock,
            }]
        );
    }

    #[test]
    fn never_exceeds_stock(requests in proptest::collection::vec((0u32..50, 0u32..100), 0..20)) {
        let selections: Vec<_> = requests
            .iter()
            .map(|&(stock, requested)| (matched(stock, 500), requested))
            .collect();
        let outcome = build_order(&selections);

        let non_zero = requests.iter().filter(|(_, r)| *r > 0).count();
        prop_assert_eq!(outcome.order.items.len(), non_zero);

        let stocks = requests.iter().filter(|(_, r)| *r > 0).map(|(s, _)| *s);
        for (item, stock) in outcome.order.items.iter().zip(stocks) {
            prop_assert!(item.quantity <= stock);
            prop_assert!(item.total_price >= 0.0);
        }
    }
}
