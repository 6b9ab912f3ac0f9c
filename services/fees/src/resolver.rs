//! Category rate resolution
//!
//! Referral and return percentages are configured per category in an external
//! store reached through [`CategoryRateSource`]; tax credit comes from the
//! [`TaxCreditTable`]. The resolver never fails: a miss or a source error
//! resolves to the configured default.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use shared::logger::log_default_rate;
use shared::{normalize_category, percent_of};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("category source unavailable: {0}")]
    Unavailable(String),
    #[error("category source returned bad data: {0}")]
    Corrupt(String),
}

/// Read side of the category store. `category` is always normalized.
pub trait CategoryRateSource: Send + Sync {
    /// Referral percent of the fee record whose price range holds `price`.
    fn referral_fee_percent(&self, category: &str, price: Decimal) -> Result<Option<Decimal>, SourceError>;

    fn return_percent(&self, category: &str) -> Result<Option<Decimal>, SourceError>;
}

impl<S: CategoryRateSource + ?Sized> CategoryRateSource for Arc<S> {
    fn referral_fee_percent(&self, category: &str, price: Decimal) -> Result<Option<Decimal>, SourceError> {
        (**self).referral_fee_percent(category, price)
    }

    fn return_percent(&self, category: &str) -> Result<Option<Decimal>, SourceError> {
        (**self).return_percent(category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferralFee {
    pub percent: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverDefaults {
    pub referral_percent: Decimal,
    pub return_percent: Decimal,
}

impl Default for ResolverDefaults {
    fn default() -> Self {
        Self {
            referral_percent: dec!(8),
            return_percent: dec!(10),
        }
    }
}

/// GST-style tax credit percentage per category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "TaxCreditSettings")]
pub struct TaxCreditTable {
    default_percent: Decimal,
    by_category: HashMap<String, Decimal>,
}

#[derive(Deserialize)]
#[serde(default)]
struct TaxCreditSettings {
    default_percent: Decimal,
    by_category: HashMap<String, Decimal>,
}

impl Default for TaxCreditSettings {
    fn default() -> Self {
        let table = TaxCreditTable::default();
        Self {
            default_percent: table.default_percent,
            by_category: table.by_category,
        }
    }
}

impl From<TaxCreditSettings> for TaxCreditTable {
    fn from(settings: TaxCreditSettings) -> Self {
        TaxCreditTable::new(settings.default_percent, settings.by_category)
    }
}

impl Default for TaxCreditTable {
    fn default() -> Self {
        let categories = [
            "Beauty - Haircare, Bath and Shower",
            "Beauty - Make-up",
            "Laptops",
            "Apparel - Sarees & Dress Materials",
            "Apparel - Dress",
            "Shoes",
            "Home - Other products",
            "Kitchen - Other products",
            "Electronics",
            "General",
        ];
        TaxCreditTable::new(
            dec!(18),
            categories.iter().map(|name| (name.to_string(), dec!(18))),
        )
    }
}

impl TaxCreditTable {
    pub fn new(default_percent: Decimal, entries: impl IntoIterator<Item = (String, Decimal)>) -> Self {
        Self {
            default_percent,
            by_category: entries
                .into_iter()
                .map(|(name, percent)| (normalize_category(&name), percent))
                .collect(),
        }
    }

    pub fn default_percent(&self) -> Decimal {
        self.default_percent
    }

    pub fn lookup(&self, category: &str) -> Option<Decimal> {
        self.by_category.get(&normalize_category(category)).copied()
    }

    pub fn percent_for(&self, category: &str) -> Decimal {
        self.lookup(category).unwrap_or(self.default_percent)
    }
}

pub struct CategoryRateResolver<S> {
    source: S,
    defaults: ResolverDefaults,
    tax_credit: TaxCreditTable,
}

impl<S: CategoryRateSource> CategoryRateResolver<S> {
    pub fn new(source: S, defaults: ResolverDefaults, tax_credit: TaxCreditTable) -> Self {
        Self {
            source,
            defaults,
            tax_credit,
        }
    }

    pub fn with_defaults(source: S) -> Self {
        Self::new(source, ResolverDefaults::default(), TaxCreditTable::default())
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn defaults(&self) -> &ResolverDefaults {
        &self.defaults
    }

    pub fn resolve_referral_fee(&self, category: &str, selling_price: Decimal) -> ReferralFee {
        let category = normalize_category(category);
        let percent = match self.source.referral_fee_percent(&category, selling_price) {
            Ok(Some(percent)) => percent,
            Ok(None) => {
                log_default_rate("referral", &category, &self.defaults.referral_percent.to_string());
                self.defaults.referral_percent
            }
            Err(e) => {
                warn!(category = %category, error = %e, "Referral fee lookup failed, using default");
                self.defaults.referral_percent
            }
        };

        ReferralFee {
            percent,
            amount: percent_of(selling_price, percent),
        }
    }

    pub fn resolve_return_percent(&self, category: &str) -> Decimal {
        let category = normalize_category(category);
        match self.source.return_percent(&category) {
            Ok(Some(percent)) => percent,
            Ok(None) => {
                log_default_rate("return", &category, &self.defaults.return_percent.to_string());
                self.defaults.return_percent
            }
            Err(e) => {
                warn!(category = %category, error = %e, "Return percent lookup failed, using default");
                self.defaults.return_percent
            }
        }
    }

    pub fn resolve_tax_credit_percent(&self, category: &str) -> Decimal {
        let category = normalize_category(category);
        self.tax_credit.lookup(&category).unwrap_or_else(|| {
            let default = self.tax_credit.default_percent();
            log_default_rate("tax credit", &category, &default.to_string());
            default
        })
    }
}
