//! In-memory category store
//!
//! Holds category records and their referral fee bands. Names are normalized
//! on the way in, so lookups through [`CategoryRateSource`] match what the
//! admin typed regardless of quote or dash style.

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::resolver::{CategoryRateSource, SourceError};
use shared::normalize_category;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("category name is blank")]
    BlankName,
    #[error("{field} must not be negative, got {value}")]
    NegativeValue { field: &'static str, value: Decimal },
    #[error("min price {min} is above max price {max}")]
    InvertedRange { min: Decimal, max: Decimal },
    #[error("price range {min}..={max} overlaps existing range {existing_min}..={existing_max} for {category}")]
    OverlappingRange {
        category: String,
        min: Decimal,
        max: Decimal,
        existing_min: Decimal,
        existing_max: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub name: String,
    pub return_percent: Decimal,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFeeRecord {
    pub category_name: String,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub referral_fee_percent: Decimal,
}

impl CategoryFeeRecord {
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min_price && price <= self.max_price
    }

    fn overlaps(&self, min: Decimal, max: Decimal) -> bool {
        self.min_price <= max && min <= self.max_price
    }
}

pub struct CategoryStore {
    categories: DashMap<String, CategoryRecord>,
    // category name -> fee bands sorted by min price
    fees: DashMap<String, Vec<CategoryFeeRecord>>,
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryStore {
    pub fn new() -> Self {
        Self {
            categories: DashMap::new(),
            fees: DashMap::new(),
        }
    }

    pub fn upsert_category(
        &self,
        name: &str,
        return_percent: Decimal,
        is_active: bool,
    ) -> Result<CategoryRecord, StoreError> {
        let name = normalized_name(name)?;
        non_negative("return percent", return_percent)?;

        let record = CategoryRecord {
            name: name.clone(),
            return_percent,
            is_active,
        };
        self.categories.insert(name, record.clone());
        Ok(record)
    }

    /// Adds a referral fee band. Creates the category (0% returns, active)
    /// when it does not exist yet.
    pub fn insert_fee(
        &self,
        category: &str,
        min_price: Decimal,
        max_price: Decimal,
        referral_fee_percent: Decimal,
    ) -> Result<CategoryFeeRecord, StoreError> {
        let category = normalized_name(category)?;
        non_negative("min price", min_price)?;
        non_negative("referral fee percent", referral_fee_percent)?;
        if min_price > max_price {
            return Err(StoreError::InvertedRange {
                min: min_price,
                max: max_price,
            });
        }

        let record = CategoryFeeRecord {
            category_name: category.clone(),
            min_price,
            max_price,
            referral_fee_percent,
        };

        {
            let mut bands = self.fees.entry(category.clone()).or_default();
            if let Some(existing) = bands.iter().find(|b| b.overlaps(min_price, max_price)) {
                return Err(StoreError::OverlappingRange {
                    category,
                    min: min_price,
                    max: max_price,
                    existing_min: existing.min_price,
                    existing_max: existing.max_price,
                });
            }
            let at = bands.partition_point(|b| b.min_price < min_price);
            bands.insert(at, record.clone());
        }

        self.categories.entry(category.clone()).or_insert_with(|| {
            info!(category = %category, "Creating category for imported fee band");
            CategoryRecord {
                name: category.clone(),
                return_percent: Decimal::ZERO,
                is_active: true,
            }
        });

        Ok(record)
    }

    pub fn category(&self, name: &str) -> Option<CategoryRecord> {
        self.categories
            .get(&normalize_category(name))
            .map(|r| r.value().clone())
    }

    /// All categories, sorted by name.
    pub fn categories(&self) -> Vec<CategoryRecord> {
        let mut all: Vec<_> = self.categories.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub fn fees_for(&self, category: &str) -> Vec<CategoryFeeRecord> {
        self.fees
            .get(&normalize_category(category))
            .map(|bands| bands.value().clone())
            .unwrap_or_default()
    }

    /// Drops a category together with its fee bands.
    pub fn remove_category(&self, name: &str) -> Option<CategoryRecord> {
        let name = normalize_category(name);
        self.fees.remove(&name);
        self.categories.remove(&name).map(|(_, record)| record)
    }

    pub fn clear_fees(&self, category: &str) -> usize {
        self.fees
            .remove(&normalize_category(category))
            .map(|(_, bands)| bands.len())
            .unwrap_or(0)
    }
}

impl CategoryRateSource for CategoryStore {
    fn referral_fee_percent(&self, category: &str, price: Decimal) -> Result<Option<Decimal>, SourceError> {
        Ok(self.fees.get(category).and_then(|bands| {
            bands
                .iter()
                .find(|b| b.contains(price))
                .map(|b| b.referral_fee_percent)
        }))
    }

    fn return_percent(&self, category: &str) -> Result<Option<Decimal>, SourceError> {
        Ok(self.categories.get(category).map(|r| r.return_percent))
    }
}

fn normalized_name(name: &str) -> Result<String, StoreError> {
    let name = normalize_category(name);
    if name.is_empty() {
        return Err(StoreError::BlankName);
    }
    Ok(name)
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), StoreError> {
    if value < Decimal::ZERO {
        return Err(StoreError::NegativeValue { field, value });
    }
    Ok(())
}
