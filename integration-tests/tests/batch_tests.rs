//! Batch evaluation tests
//!
//! Rows arrive as loosely-typed JSON, the way an uploaded sheet is handed
//! over. Each row succeeds or fails on its own.

use fees_service::{CategoryStore, FeeCalculator, PortfolioSummary, RawProductInput, ValidationError};
use rust_decimal_macros::dec;

fn rows_from_json(json: &str) -> Vec<RawProductInput> {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_uploaded_sheet_with_mixed_rows() {
    let rows = rows_from_json(
        r#"[
            {"asin": "b0001", "category": "General", "sellingPrice": 2999, "weight": 0.5,
             "length": 20, "width": 15, "height": 5, "fulfillment": "FBA", "stepLevel": "Standard"},
            {"asin": "b0002", "category": "General", "sellingPrice": "", "weight": 0.5},
            {"asin": "b0003", "category": "Electronics", "sellingPrice": "1,299", "weight": 1},
            {"asin": "b0004", "sellingPrice": 499, "weight": 0.3},
            {"asin": "b0005", "category": "Books", "sellingPrice": "350", "weight": "0.45", "region": "Local"}
        ]"#,
    );

    let calc = FeeCalculator::with_source(CategoryStore::new());
    let report = calc.calculate_batch(rows);

    assert_eq!(report.outcomes.len(), 5);
    assert_eq!(report.success_count(), 2);

    let errors: Vec<_> = report.failed().collect();
    assert_eq!(errors[0], (2, &ValidationError::Missing("selling price")));
    assert!(matches!(errors[1], (3, ValidationError::NotANumber { .. })));
    assert_eq!(errors[2], (4, &ValidationError::BlankCategory));

    let asins: Vec<_> = report
        .succeeded()
        .map(|r| r.asin.clone().unwrap_or_default())
        .collect();
    assert_eq!(asins, vec!["B0001", "B0005"]);

    let books = report.succeeded().nth(1).unwrap();
    assert_eq!(books.closing_fee, dec!(12));
    assert_eq!(books.shipping_fee, dec!(40));
    assert_eq!(books.removal_fee, dec!(20));
}

#[test]
fn test_summary_over_successful_rows() {
    let rows = rows_from_json(
        r#"[
            {"category": "General", "sellingPrice": 2999, "weight": 0.5, "length": 20, "width": 15, "height": 5},
            {"category": "General", "sellingPrice": "bad", "weight": 0.5},
            {"category": "General", "sellingPrice": 1000, "weight": 0.5}
        ]"#,
    );

    let calc = FeeCalculator::with_source(CategoryStore::new());
    let report = calc.calculate_batch(rows);
    let summary = PortfolioSummary::from_results(report.succeeded());

    assert_eq!(summary.total_products, 2);
    assert_eq!(summary.total_revenue, dec!(3999));
    // 2631.33 + (1000 - 191)
    assert_eq!(summary.total_net_earnings, dec!(3440.33));
    assert_eq!(summary.avg_profit_margin, dec!(84.32));

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["totalProducts"], 2);
}

#[test]
fn test_oversized_row_does_not_sink_the_sheet() {
    let rows = rows_from_json(
        r#"[
            {"asin": "b0010", "category": "General", "sellingPrice": 2999, "weight": 0.5},
            {"asin": "b0011", "category": "General", "sellingPrice": 999, "weight": 0.5,
             "length": 10000000000, "width": 10000000000, "height": 10000000000},
            {"asin": "b0012", "category": "General", "sellingPrice": 999, "weight": "100000000000000000000000000"},
            {"asin": "b0013", "category": "\u200b", "sellingPrice": 999, "weight": 0.5},
            {"asin": "b0014", "category": "Books", "sellingPrice": 350, "weight": 0.45}
        ]"#,
    );

    let calc = FeeCalculator::with_source(CategoryStore::new());
    let report = calc.calculate_batch(rows);

    assert_eq!(report.outcomes.len(), 5);
    let asins: Vec<_> = report
        .succeeded()
        .map(|r| r.asin.clone().unwrap_or_default())
        .collect();
    assert_eq!(asins, vec!["B0010", "B0014"]);

    let errors: Vec<_> = report.failed().collect();
    assert!(matches!(errors[0], (2, ValidationError::OutOfRange { field: "length", .. })));
    assert!(matches!(errors[1], (3, ValidationError::OutOfRange { field: "weight", .. })));
    assert_eq!(errors[2], (4, &ValidationError::BlankCategory));
}
