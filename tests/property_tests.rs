//! Property tests for sale arithmetic and receipt numbering.

use bookstore_pos_api::services::{
    reports::summarize_daily,
    sales::{generate_sale_number, sale_total, validate_lines, SaleLineInput, MAX_MONEY},
};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

fn cents() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000).prop_map(|c| Decimal::new(c, 2))
}

fn line() -> impl Strategy<Value = SaleLineInput> {
    (1i32..10_000, 1i32..500, cents()).prop_map(|(item_id, quantity, unit_price)| SaleLineInput {
        item_id,
        quantity,
        unit_price,
    })
}

proptest! {
    #[test]
    fn line_total_is_exact_to_the_cent(l in line()) {
        let total = l.line_total().unwrap();
        prop_assert_eq!(total, l.unit_price * Decimal::from(l.quantity));
        prop_assert!(total.scale() <= 2);
        prop_assert!(total >= Decimal::ZERO);
    }

    #[test]
    fn sale_total_does_not_depend_on_line_order(mut lines in prop::collection::vec(line(), 1..12)) {
        let forward = sale_total(&lines).unwrap();
        lines.reverse();
        let backward = sale_total(&lines).unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn positive_lines_always_validate(lines in prop::collection::vec(line(), 1..12)) {
        prop_assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn non_positive_quantity_never_validates(q in -1_000i32..=0, price in cents()) {
        let lines = vec![SaleLineInput { item_id: 1, quantity: q, unit_price: price }];
        prop_assert!(validate_lines(&lines).is_err());
    }

    #[test]
    fn oversized_prices_are_errors_not_panics(
        units in 1i64..=i64::MAX,
        scale in 0u32..=2,
        quantity in 1i32..=i32::MAX,
    ) {
        let price = Decimal::new(units, scale);
        let lines = vec![SaleLineInput { item_id: 1, quantity, unit_price: price }];
        let checked = validate_lines(&lines).and_then(|()| sale_total(&lines));
        match checked {
            Ok(total) => prop_assert!(total <= MAX_MONEY),
            Err(_) => prop_assert!(price > MAX_MONEY || price * Decimal::from(quantity) > MAX_MONEY),
        }
    }

    #[test]
    fn sale_numbers_carry_the_date(day in 1u32..=28, hour in 0u32..24) {
        let at = Utc.with_ymd_and_hms(2025, 2, day, hour, 0, 0).unwrap();
        let number = generate_sale_number(at);
        let expected_prefix = format!("SALE-202502{:02}-", day);
        prop_assert!(number.starts_with(&expected_prefix));
        prop_assert_eq!(number.len(), "SALE-YYYYMMDD-".len() + 8);
    }

    #[test]
    fn daily_revenue_matches_sum_of_sale_totals(totals in prop::collection::vec(cents(), 0..40)) {
        let sales: Vec<_> = totals
            .iter()
            .enumerate()
            .map(|(i, total)| bookstore_pos_api::entities::sale::Model {
                id: i as i32 + 1,
                sale_number: format!("SALE-20250601-{:08X}", i),
                customer_name: String::new(),
                customer_phone: String::new(),
                payment_method: "cash".into(),
                notes: String::new(),
                staff_id: None,
                total_amount: *total,
                created_at: Utc.with_ymd_and_hms(2025, 6, 1 + (i as u32 % 5), 12, 0, 0).unwrap(),
            })
            .collect();

        let rows = summarize_daily(&sales, &HashMap::new(), 30);
        let revenue: Decimal = rows.iter().map(|r| r.total_revenue).sum();
        let transactions: i64 = rows.iter().map(|r| r.total_transactions).sum();
        prop_assert_eq!(revenue, totals.iter().copied().sum::<Decimal>());
        prop_assert_eq!(transactions, totals.len() as i64);
        prop_assert!(rows.windows(2).all(|w| w[0].sale_date > w[1].sale_date));
    }
}
