//! End-to-end fee scenarios
//!
//! Whole-pipeline checks against hand-computed breakdowns, the shared
//! invariants every result must satisfy, and category configuration flowing
//! from the store into the calculator.

use fees_service::{
    CategoryStore, FeeCalculator, ProductInput, RateTables, Region,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn calculator() -> FeeCalculator<Arc<CategoryStore>> {
    FeeCalculator::with_source(Arc::new(CategoryStore::new()))
}

// =============================================================================
// Reference scenario
// =============================================================================

#[test]
fn test_reference_product_breakdown() {
    shared::logger::init_logger();

    let input = ProductInput::new("General", dec!(2999), dec!(0.5), dec!(20), dec!(15), dec!(5))
        .unwrap()
        .with_region(Region::National);

    let result = calculator().calculate(&input).unwrap();

    assert_eq!(result.referral_fee, dec!(239.92));
    assert_eq!(result.closing_fee, dec!(35));
    assert_eq!(result.shipping_fee, dec!(60));
    assert_eq!(result.pick_pack_fee, dec!(11));
    assert_eq!(result.storage_fee, dec!(1.75));
    assert_eq!(result.removal_fee, dec!(20));
    assert_eq!(result.total_other_cost, dec!(32.75));
    assert_eq!(result.total_fees, dec!(367.67));
    assert_eq!(result.net_earnings, dec!(2631.33));
    assert_eq!(result.net_earnings_percentage, dec!(87.74));
}

#[test]
fn test_reference_product_local_delivery() {
    let input = ProductInput::new("General", dec!(2999), dec!(0.5), dec!(20), dec!(15), dec!(5))
        .unwrap()
        .with_region(Region::Local);

    let result = calculator().calculate(&input).unwrap();
    assert_eq!(result.shipping_fee, dec!(40));
    assert_eq!(result.total_fees, dec!(347.67));
}

// =============================================================================
// Invariants over a sweep of inputs
// =============================================================================

#[test]
fn test_invariants_hold_across_price_and_weight_sweep() {
    let calc = calculator();
    let prices = [dec!(0), dec!(1), dec!(250), dec!(251), dec!(999.99), dec!(1001), dec!(45000)];
    let weights = [dec!(0), dec!(0.2), dec!(0.5), dec!(0.501), dec!(2), dec!(15), dec!(15.5), dec!(80)];

    for price in prices {
        for weight in weights {
            for region in [Region::Local, Region::Regional, Region::National] {
                let input = ProductInput::new("Toys", price, weight, dec!(12), dec!(8), dec!(4))
                    .unwrap()
                    .with_region(region);
                let r = calc.calculate(&input).unwrap();

                assert_eq!(
                    r.total_fees,
                    r.referral_fee + r.closing_fee + r.shipping_fee + r.pick_pack_fee + r.storage_fee + r.removal_fee
                );
                assert!((r.final_without_tax + r.tax_to_pay - r.total_fees).abs() < dec!(0.000001));
                assert_eq!(r.net_earnings, price - r.total_fees);
                assert_eq!(r.final_payout, r.net_earnings - r.return_fees);
                assert!(r.shipping_fee > Decimal::ZERO);
                assert!(r.closing_fee > Decimal::ZERO);
                if price.is_zero() {
                    assert_eq!(r.net_earnings_percentage, Decimal::ZERO);
                }
            }
        }
    }
}

#[test]
fn test_defaults_for_unconfigured_category() {
    let input = ProductInput::new("Garden Gnomes", dec!(1000), dec!(1), dec!(0), dec!(0), dec!(0)).unwrap();
    let result = calculator().calculate(&input).unwrap();

    assert_eq!(result.referral_fee_percentage, dec!(8));
    assert_eq!(result.return_percentage, dec!(10));
    assert_eq!(result.tax_credit_percentage, dec!(18));
}

// =============================================================================
// Store-driven configuration
// =============================================================================

#[test]
fn test_admin_configured_category_flows_into_calculation() {
    let store = Arc::new(CategoryStore::new());
    store.upsert_category("Beauty - Haircare, Bath and Shower", dec!(3), true).unwrap();
    store
        .insert_fee("Beauty \u{2013} Haircare, Bath and Shower", dec!(0), dec!(300), dec!(0))
        .unwrap();
    store
        .insert_fee("Beauty - Haircare, Bath and Shower", dec!(300.01), dec!(500), dec!(5))
        .unwrap();
    store
        .insert_fee("Beauty - Haircare, Bath and Shower", dec!(500.01), dec!(99999999), dec!(8))
        .unwrap();

    let calc = FeeCalculator::with_source(store.clone());

    let cheap = ProductInput::new("Beauty - Haircare, Bath and Shower", dec!(299), dec!(0.1), dec!(0), dec!(0), dec!(0))
        .unwrap();
    let cheap = calc.calculate(&cheap).unwrap();
    assert_eq!(cheap.referral_fee, dec!(0));
    assert_eq!(cheap.return_percentage, dec!(3));

    let mid = ProductInput::new("Beauty - Haircare, Bath and Shower", dec!(400), dec!(0.1), dec!(0), dec!(0), dec!(0))
        .unwrap();
    assert_eq!(calc.calculate(&mid).unwrap().referral_fee, dec!(20));

    // Changes to the store are visible to the next calculation
    store.upsert_category("Beauty - Haircare, Bath and Shower", dec!(6), false).unwrap();
    assert_eq!(calc.calculate(&mid).unwrap().return_percentage, dec!(6));
}

#[test]
fn test_substituted_rate_tables() {
    let mut tables = RateTables::default();
    tables.pick_pack.threshold_kg = dec!(0.25);
    tables.storage.monthly_rate_per_cubic_foot = dec!(0);

    let calc = FeeCalculator::new(
        Arc::new(tables),
        fees_service::CategoryRateResolver::with_defaults(CategoryStore::new()),
        fees_service::FeePolicy::default(),
    );

    let input = ProductInput::new("General", dec!(100), dec!(0.5), dec!(20), dec!(15), dec!(5)).unwrap();
    let result = calc.calculate(&input).unwrap();
    assert_eq!(result.pick_pack_fee, dec!(50));
    assert_eq!(result.storage_fee, dec!(0));
}
