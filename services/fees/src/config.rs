//! Engine configuration
//!
//! Built-in schedules unless overridden from a TOML file or `FBA__*`
//! environment variables. Any table left out keeps its default.

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::calculator::{FeeCalculator, FeePolicy};
use crate::rates::RateTables;
use crate::resolver::{CategoryRateResolver, CategoryRateSource, ResolverDefaults, TaxCreditTable};

pub const ENV_PREFIX: &str = "FBA";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rates: RateTables,
    pub tax_credit: TaxCreditTable,
    pub defaults: ResolverDefaults,
    pub policy: FeePolicy,
}

impl EngineConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config: EngineConfig = shared::load_settings(path, ENV_PREFIX)?;
        tracing::info!(
            gate_fulfillment_fees = config.policy.gate_fulfillment_fees,
            default_referral = %config.defaults.referral_percent,
            default_return = %config.defaults.return_percent,
            "Engine configuration loaded"
        );
        Ok(config)
    }

    pub fn into_calculator<S: CategoryRateSource>(self, source: S) -> FeeCalculator<S> {
        let resolver = CategoryRateResolver::new(source, self.defaults, self.tax_credit);
        FeeCalculator::new(Arc::new(self.rates), resolver, self.policy)
    }
}
