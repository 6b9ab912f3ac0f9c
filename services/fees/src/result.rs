use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::{Fulfillment, Region, StepLevel};

/// Full fee breakdown for one product.
///
/// Built once by the calculator and never changed afterwards; persisting or
/// exporting it is up to the caller. Field names serialize in camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    // Echo of the input
    pub asin: Option<String>,
    pub product_name: Option<String>,
    pub category: String,
    pub selling_price: Decimal,
    pub weight: Decimal,
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
    pub fulfillment: Fulfillment,
    pub step_level: StepLevel,
    pub region: Region,

    // Fee components
    pub referral_fee_percentage: Decimal,
    pub referral_fee: Decimal,
    pub closing_fee: Decimal,
    pub shipping_fee: Decimal,
    pub pick_pack_fee: Decimal,
    pub storage_fee: Decimal,
    pub removal_fee: Decimal,

    // Totals
    pub total_other_cost: Decimal,
    pub total_fees: Decimal,

    // Tax
    pub tax_credit_percentage: Decimal,
    pub tax_to_pay: Decimal,
    pub final_without_tax: Decimal,

    // Earnings
    pub net_earnings: Decimal,
    pub net_earnings_percentage: Decimal,
    pub return_percentage: Decimal,
    pub return_fees: Decimal,
    pub final_payout: Decimal,

    pub volume_cubic_feet: Decimal,
}

impl CalculationResult {
    /// Sum of the six fee components.
    pub fn component_sum(&self) -> Decimal {
        self.referral_fee
            + self.closing_fee
            + self.shipping_fee
            + self.pick_pack_fee
            + self.storage_fee
            + self.removal_fee
    }

    pub fn is_profitable(&self) -> bool {
        self.final_payout > Decimal::ZERO
    }
}
