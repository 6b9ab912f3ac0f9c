//! Fee calculation pipeline
//!
//! One pass, fixed order, each step using only what came before:
//! referral, closing, shipping, pick & pack, storage, removal, totals,
//! tax extraction, net earnings, returns, payout.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::product::{Fulfillment, ProductInput, RawProductInput, ValidationError};
use crate::rates::RateTables;
use crate::resolver::{CategoryRateResolver, CategoryRateSource};
use crate::result::CalculationResult;
use shared::logger::log_calculation;
use shared::{normalize_category, percent_of, round_half_up};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct FeePolicy {
    /// When set, shipping, pick & pack and storage are only charged to FBA
    /// products. Off by default: every product pays them.
    pub gate_fulfillment_fees: bool,
}

pub struct FeeCalculator<S> {
    tables: Arc<RateTables>,
    resolver: CategoryRateResolver<S>,
    policy: FeePolicy,
}

impl<S: CategoryRateSource> FeeCalculator<S> {
    pub fn new(tables: Arc<RateTables>, resolver: CategoryRateResolver<S>, policy: FeePolicy) -> Self {
        Self {
            tables,
            resolver,
            policy,
        }
    }

    /// Default tables, defaults and policy over the given source.
    pub fn with_source(source: S) -> Self {
        Self::new(
            Arc::new(RateTables::default()),
            CategoryRateResolver::with_defaults(source),
            FeePolicy::default(),
        )
    }

    pub fn tables(&self) -> &RateTables {
        &self.tables
    }

    pub fn resolver(&self) -> &CategoryRateResolver<S> {
        &self.resolver
    }

    pub fn policy(&self) -> FeePolicy {
        self.policy
    }

    pub fn calculate_raw(&self, raw: &RawProductInput) -> Result<CalculationResult, ValidationError> {
        let input = raw.validate()?;
        self.calculate(&input)
    }

    pub fn calculate(&self, input: &ProductInput) -> Result<CalculationResult, ValidationError> {
        input.check()?;

        let category = normalize_category(&input.category);
        let price = input.selling_price;
        let weight = input.weight_kg;
        let tables = &self.tables;

        let referral = self.resolver.resolve_referral_fee(&category, price);
        let closing_fee = tables.closing_fee(price);

        let fulfillment_fees_apply =
            !self.policy.gate_fulfillment_fees || input.fulfillment == Fulfillment::Fba;
        let (shipping_fee, pick_pack_fee, storage_fee) = if fulfillment_fees_apply {
            (
                tables.shipping_fee(weight, input.region),
                tables.pick_pack_fee(weight),
                tables.storage_fee(input.length_cm, input.width_cm, input.height_cm),
            )
        } else {
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
        };

        let removal_fee = tables.removal_fee(weight);

        let total_other_cost = pick_pack_fee + storage_fee + removal_fee;
        let total_fees = referral.amount + closing_fee + shipping_fee + total_other_cost;

        // totalFees is treated as tax-inclusive; this extracts the tax part.
        let tax_credit_percentage = self.resolver.resolve_tax_credit_percent(&category);
        let tax_to_pay = total_fees * tax_credit_percentage / (dec!(100) + tax_credit_percentage);
        let final_without_tax = total_fees - tax_to_pay;

        let net_earnings = price - total_fees;
        let net_earnings_percentage = if price > Decimal::ZERO {
            round_half_up(net_earnings / price * dec!(100), 2)
        } else {
            Decimal::ZERO
        };

        let return_percentage = self.resolver.resolve_return_percent(&category);
        let return_fees = percent_of(price, return_percentage);
        let final_payout = net_earnings - return_fees;

        let volume_cubic_feet = round_half_up(
            tables
                .storage
                .volume_cubic_feet(input.length_cm, input.width_cm, input.height_cm),
            2,
        );

        debug!(
            category = %category,
            referral_percent = %referral.percent,
            closing_fee = %closing_fee,
            shipping_fee = %shipping_fee,
            total_fees = %total_fees,
            tax_to_pay = %tax_to_pay,
            "Fee breakdown"
        );
        log_calculation(
            input.asin.as_deref(),
            &category,
            &price.to_string(),
            &net_earnings.to_string(),
        );

        Ok(CalculationResult {
            asin: input.asin.clone(),
            product_name: input.product_name.clone(),
            category,
            selling_price: price,
            weight,
            length: input.length_cm,
            width: input.width_cm,
            height: input.height_cm,
            fulfillment: input.fulfillment,
            step_level: input.step_level,
            region: input.region,
            referral_fee_percentage: referral.percent,
            referral_fee: referral.amount,
            closing_fee,
            shipping_fee,
            pick_pack_fee,
            storage_fee,
            removal_fee,
            total_other_cost,
            total_fees,
            tax_credit_percentage,
            tax_to_pay,
            final_without_tax,
            net_earnings,
            net_earnings_percentage,
            return_percentage,
            return_fees,
            final_payout,
            volume_cubic_feet,
        })
    }

    /// Calculates every row independently. A bad row is reported, never fatal.
    pub fn calculate_batch<I>(&self, rows: I) -> BatchReport
    where
        I: IntoIterator<Item = RawProductInput>,
    {
        let outcomes = rows
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let row = index + 1;
                let result = self.calculate_raw(&raw);
                if let Err(e) = &result {
                    warn!(row, error = %e, "Skipping invalid product row");
                }
                RowOutcome { row, result }
            })
            .collect();

        BatchReport { outcomes }
    }
}

#[derive(Debug, Clone)]
pub struct RowOutcome {
    /// 1-based position in the input.
    pub row: usize,
    pub result: Result<CalculationResult, ValidationError>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<RowOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &CalculationResult> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (usize, &ValidationError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.row, e)))
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn error_count(&self) -> usize {
        self.failed().count()
    }

    /// Human-readable error lines, `Row N: message`.
    pub fn error_messages(&self) -> Vec<String> {
        self.failed()
            .map(|(row, e)| format!("Row {}: {}", row, e))
            .collect()
    }
}
