//! Product input and validation
//!
//! [`RawProductInput`] is what a form post or spreadsheet row looks like:
//! every field optional, numbers possibly sent as text. [`RawProductInput::validate`]
//! turns it into a [`ProductInput`] or rejects it before any fee is computed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use shared::normalize_category;

/// Upper bound for every numeric input: price, weight and each dimension.
/// Keeps `length × width × height` and the gram conversion well inside
/// `Decimal` range.
pub const MAX_INPUT_VALUE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} is not a valid number: {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },
    #[error("{field} must not exceed {}, got {value}", MAX_INPUT_VALUE)]
    OutOfRange { field: &'static str, value: Decimal },
    #[error("category is required")]
    BlankCategory,
    #[error("unknown {field}: {value:?}")]
    Unknown { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Fulfillment {
    #[default]
    #[serde(rename = "FBA")]
    Fba,
    #[serde(rename = "FBM")]
    Fbm,
}

impl FromStr for Fulfillment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FBA" => Ok(Fulfillment::Fba),
            "FBM" => Ok(Fulfillment::Fbm),
            _ => Err(ValidationError::Unknown {
                field: "fulfillment",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Fulfillment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fulfillment::Fba => write!(f, "FBA"),
            Fulfillment::Fbm => write!(f, "FBM"),
        }
    }
}

/// Seller STEP programme level. Recorded with the result, does not affect fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StepLevel {
    #[default]
    Standard,
    Basic,
    Advanced,
    Premium,
}

impl FromStr for StepLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(StepLevel::Standard),
            "basic" => Ok(StepLevel::Basic),
            "advanced" => Ok(StepLevel::Advanced),
            "premium" => Ok(StepLevel::Premium),
            _ => Err(ValidationError::Unknown {
                field: "step level",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    Local,
    Regional,
    #[default]
    National,
}

impl Region {
    /// Case-insensitive; anything unrecognized ships at the national rate.
    pub fn parse_lenient(s: &str) -> Region {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Region::Local,
            "regional" => Region::Regional,
            _ => Region::National,
        }
    }
}

/// A validated product, ready for fee calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub asin: Option<String>,
    pub product_name: Option<String>,
    pub category: String,
    pub selling_price: Decimal,
    pub weight_kg: Decimal,
    pub length_cm: Decimal,
    pub width_cm: Decimal,
    pub height_cm: Decimal,
    pub fulfillment: Fulfillment,
    pub step_level: StepLevel,
    pub region: Region,
}

impl ProductInput {
    pub fn new(
        category: impl Into<String>,
        selling_price: Decimal,
        weight_kg: Decimal,
        length_cm: Decimal,
        width_cm: Decimal,
        height_cm: Decimal,
    ) -> Result<Self, ValidationError> {
        let input = Self {
            asin: None,
            product_name: None,
            category: category.into(),
            selling_price,
            weight_kg,
            length_cm,
            width_cm,
            height_cm,
            fulfillment: Fulfillment::default(),
            step_level: StepLevel::default(),
            region: Region::default(),
        };
        input.check()?;
        Ok(input)
    }

    pub fn with_asin(mut self, asin: &str) -> Self {
        self.asin = normalize_asin(asin);
        self
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn with_fulfillment(mut self, fulfillment: Fulfillment) -> Self {
        self.fulfillment = fulfillment;
        self
    }

    pub fn with_step_level(mut self, step_level: StepLevel) -> Self {
        self.step_level = step_level;
        self
    }

    /// Re-checks the invariants. Fields are public, so the calculator runs
    /// this before every calculation.
    pub fn check(&self) -> Result<(), ValidationError> {
        if normalize_category(&self.category).is_empty() {
            return Err(ValidationError::BlankCategory);
        }

        for (field, value) in [
            ("selling price", self.selling_price),
            ("weight", self.weight_kg),
            ("length", self.length_cm),
            ("width", self.width_cm),
            ("height", self.height_cm),
        ] {
            if value < Decimal::ZERO {
                return Err(ValidationError::Negative { field, value });
            }
            if value > MAX_INPUT_VALUE {
                return Err(ValidationError::OutOfRange { field, value });
            }
        }

        Ok(())
    }
}

/// A number as it arrives from JSON or a spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(serde_json::Number),
    Text(String),
}

impl RawNumber {
    fn parse(&self, field: &'static str) -> Result<Option<Decimal>, ValidationError> {
        let text = match self {
            RawNumber::Number(n) => n.to_string(),
            RawNumber::Text(s) => s.trim().to_string(),
        };

        if text.is_empty() {
            return Ok(None);
        }

        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map(Some)
            .map_err(|_| ValidationError::NotANumber { field, value: text })
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

impl From<Decimal> for RawNumber {
    fn from(value: Decimal) -> Self {
        RawNumber::Text(value.to_string())
    }
}

/// Unvalidated product fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProductInput {
    pub asin: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub selling_price: Option<RawNumber>,
    pub weight: Option<RawNumber>,
    pub length: Option<RawNumber>,
    pub width: Option<RawNumber>,
    pub height: Option<RawNumber>,
    pub fulfillment: Option<String>,
    pub step_level: Option<String>,
    pub region: Option<String>,
}

impl RawProductInput {
    pub fn validate(&self) -> Result<ProductInput, ValidationError> {
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !normalize_category(c).is_empty())
            .ok_or(ValidationError::BlankCategory)?;

        let selling_price = required(&self.selling_price, "selling price")?;
        let weight_kg = required(&self.weight, "weight")?;
        let length_cm = optional(&self.length, "length")?;
        let width_cm = optional(&self.width, "width")?;
        let height_cm = optional(&self.height, "height")?;

        let fulfillment = match non_blank(&self.fulfillment) {
            Some(s) => s.parse()?,
            None => Fulfillment::default(),
        };
        let step_level = match non_blank(&self.step_level) {
            Some(s) => s.parse()?,
            None => StepLevel::default(),
        };
        let region = non_blank(&self.region)
            .map(Region::parse_lenient)
            .unwrap_or_default();

        let mut input = ProductInput::new(
            category,
            selling_price,
            weight_kg,
            length_cm,
            width_cm,
            height_cm,
        )?
        .with_region(region)
        .with_fulfillment(fulfillment)
        .with_step_level(step_level);

        if let Some(asin) = non_blank(&self.asin) {
            input = input.with_asin(asin);
        }
        if let Some(name) = non_blank(&self.product_name) {
            input = input.with_product_name(name);
        }

        Ok(input)
    }
}

fn required(value: &Option<RawNumber>, field: &'static str) -> Result<Decimal, ValidationError> {
    value
        .as_ref()
        .map(|raw| raw.parse(field))
        .transpose()?
        .flatten()
        .ok_or(ValidationError::Missing(field))
}

fn optional(value: &Option<RawNumber>, field: &'static str) -> Result<Decimal, ValidationError> {
    Ok(value
        .as_ref()
        .map(|raw| raw.parse(field))
        .transpose()?
        .flatten()
        .unwrap_or(Decimal::ZERO))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn normalize_asin(asin: &str) -> Option<String> {
    let asin = asin.trim();
    (!asin.is_empty()).then(|| asin.to_ascii_uppercase())
}
