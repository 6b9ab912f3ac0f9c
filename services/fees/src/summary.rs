use rust_decimal::Decimal;
use serde::Serialize;

use crate::result::CalculationResult;
use shared::round_half_up;

/// Dashboard totals over a set of calculated products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_products: usize,
    pub total_revenue: Decimal,
    pub total_net_earnings: Decimal,
    /// Mean net earnings percentage, 0 when there are no products.
    pub avg_profit_margin: Decimal,
}

impl PortfolioSummary {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a CalculationResult>,
    {
        let mut total_products = 0usize;
        let mut total_revenue = Decimal::ZERO;
        let mut total_net_earnings = Decimal::ZERO;
        let mut margin_sum = Decimal::ZERO;

        for result in results {
            total_products += 1;
            total_revenue += result.selling_price;
            total_net_earnings += result.net_earnings;
            margin_sum += result.net_earnings_percentage;
        }

        let avg_profit_margin = if total_products == 0 {
            Decimal::ZERO
        } else {
            round_half_up(margin_sum / Decimal::from(total_products), 2)
        };

        Self {
            total_products,
            total_revenue,
            total_net_earnings,
            avg_profit_margin,
        }
    }
}
