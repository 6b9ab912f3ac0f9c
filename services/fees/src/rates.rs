//! Rate tables
//!
//! Every fixed fee schedule the calculator uses lives here, as one immutable
//! [`RateTables`] value handed to the calculator. Weight tables are keyed in
//! grams; callers convert with [`kg_to_grams`] before lookup.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use thiserror::Error;

use crate::product::Region;
use shared::round_half_up;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateTableError {
    #[error("rate table has no tiers")]
    Empty,
    #[error("first tier must start at 0, starts at {0}")]
    FirstTierNotZero(Decimal),
    #[error("tier {index} has min {min} above max {max}")]
    InvertedBounds { index: usize, min: Decimal, max: Decimal },
    #[error("tier {index} is open-ended but is not the last tier")]
    OpenTierNotLast { index: usize },
    #[error("tier {index} starts at {min}, overlapping the previous tier ending at {previous_max}")]
    Overlap {
        index: usize,
        min: Decimal,
        previous_max: Decimal,
    },
}

/// One band of a tiered table. `max = None` means open-ended.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateTier<R> {
    pub min: Decimal,
    #[serde(default)]
    pub max: Option<Decimal>,
    pub rate: R,
}

impl<R> RateTier<R> {
    pub fn new(min: Decimal, max: Option<Decimal>, rate: R) -> Self {
        Self { min, max, rate }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

/// Ordered, non-overlapping tiers starting at zero.
///
/// Lookup picks the tier whose `[min, max]` holds the value. Any value no
/// tier holds, whether it lands between one tier's `max` and the next tier's
/// `min` or past the last `max`, resolves to the last (highest) tier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(
    try_from = "Vec<RateTier<R>>",
    bound(deserialize = "R: Deserialize<'de>")
)]
pub struct TierTable<R> {
    tiers: Vec<RateTier<R>>,
}

impl<R> TierTable<R> {
    pub fn new(tiers: Vec<RateTier<R>>) -> Result<Self, RateTableError> {
        let first = tiers.first().ok_or(RateTableError::Empty)?;
        if first.min != Decimal::ZERO {
            return Err(RateTableError::FirstTierNotZero(first.min));
        }

        for (index, tier) in tiers.iter().enumerate() {
            let Some(max) = tier.max else {
                if index + 1 != tiers.len() {
                    return Err(RateTableError::OpenTierNotLast { index });
                }
                continue;
            };

            if tier.min > max {
                return Err(RateTableError::InvertedBounds {
                    index,
                    min: tier.min,
                    max,
                });
            }

            if let Some(next) = tiers.get(index + 1) {
                if next.min <= max {
                    return Err(RateTableError::Overlap {
                        index: index + 1,
                        min: next.min,
                        previous_max: max,
                    });
                }
            }
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[RateTier<R>] {
        &self.tiers
    }

    /// The tier a value falls into. Never fails for a validated table.
    pub fn resolve_tier(&self, value: Decimal) -> &RateTier<R> {
        self.tiers
            .iter()
            .find(|tier| tier.contains(value))
            .unwrap_or_else(|| self.highest())
    }

    pub fn resolve(&self, value: Decimal) -> &R {
        &self.resolve_tier(value).rate
    }

    pub fn highest(&self) -> &RateTier<R> {
        &self.tiers[self.tiers.len() - 1]
    }
}

impl<R> TryFrom<Vec<RateTier<R>>> for TierTable<R> {
    type Error = RateTableError;

    fn try_from(tiers: Vec<RateTier<R>>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

/// Shipping rate per destination region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RegionalRate {
    pub local: Decimal,
    pub regional: Decimal,
    pub national: Decimal,
}

impl RegionalRate {
    pub fn new(local: Decimal, regional: Decimal, national: Decimal) -> Self {
        Self {
            local,
            regional,
            national,
        }
    }

    pub fn for_region(&self, region: Region) -> Decimal {
        match region {
            Region::Local => self.local,
            Region::Regional => self.regional,
            Region::National => self.national,
        }
    }
}

/// Pick-and-pack: flat fee up to the threshold (inclusive), heavier above it.
/// The threshold is in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PickPackRule {
    pub threshold_kg: Decimal,
    pub light_fee: Decimal,
    pub heavy_fee: Decimal,
}

impl Default for PickPackRule {
    fn default() -> Self {
        Self {
            threshold_kg: dec!(15),
            light_fee: dec!(11),
            heavy_fee: dec!(50),
        }
    }
}

impl PickPackRule {
    pub fn fee(&self, weight_kg: Decimal) -> Decimal {
        if weight_kg <= self.threshold_kg {
            self.light_fee
        } else {
            self.heavy_fee
        }
    }
}

/// Monthly storage charged per cubic foot of package volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageRule {
    pub cubic_cm_per_cubic_foot: Decimal,
    pub monthly_rate_per_cubic_foot: Decimal,
}

impl Default for StorageRule {
    fn default() -> Self {
        Self {
            cubic_cm_per_cubic_foot: dec!(28316.84),
            monthly_rate_per_cubic_foot: dec!(33),
        }
    }
}

impl StorageRule {
    /// Unrounded package volume in cubic feet.
    pub fn volume_cubic_feet(&self, length_cm: Decimal, width_cm: Decimal, height_cm: Decimal) -> Decimal {
        length_cm * width_cm * height_cm / self.cubic_cm_per_cubic_foot
    }

    /// Monthly fee, rounded half-up to 2 dp.
    pub fn monthly_fee(&self, length_cm: Decimal, width_cm: Decimal, height_cm: Decimal) -> Decimal {
        let volume = self.volume_cubic_feet(length_cm, width_cm, height_cm);
        round_half_up(volume * self.monthly_rate_per_cubic_foot, 2)
    }
}

pub fn kg_to_grams(weight_kg: Decimal) -> Decimal {
    weight_kg * dec!(1000)
}

/// All fixed fee schedules. `Default` is the published Amazon.in schedule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RateTables {
    /// Closing fee by selling price.
    pub closing: TierTable<Decimal>,
    /// Shipping fee by weight in grams, per region.
    pub shipping: TierTable<RegionalRate>,
    /// Removal fee by weight in grams.
    pub removal: TierTable<Decimal>,
    pub pick_pack: PickPackRule,
    pub storage: StorageRule,
}

impl Default for RateTables {
    fn default() -> Self {
        Self {
            closing: TierTable {
                tiers: vec![
                    RateTier::new(dec!(0), Some(dec!(250)), dec!(26)),
                    RateTier::new(dec!(251), Some(dec!(500)), dec!(12)),
                    RateTier::new(dec!(501), Some(dec!(1000)), dec!(20)),
                    RateTier::new(dec!(1001), None, dec!(35)),
                ],
            },
            shipping: TierTable {
                tiers: vec![
                    RateTier::new(
                        dec!(0),
                        Some(dec!(500)),
                        RegionalRate::new(dec!(40), dec!(50), dec!(60)),
                    ),
                    RateTier::new(
                        dec!(501),
                        Some(dec!(1000)),
                        RegionalRate::new(dec!(60), dec!(75), dec!(90)),
                    ),
                    RateTier::new(
                        dec!(1001),
                        Some(dec!(2000)),
                        RegionalRate::new(dec!(80), dec!(100), dec!(120)),
                    ),
                    RateTier::new(
                        dec!(2001),
                        None,
                        RegionalRate::new(dec!(120), dec!(150), dec!(180)),
                    ),
                ],
            },
            removal: TierTable {
                tiers: vec![
                    RateTier::new(dec!(0), Some(dec!(200)), dec!(15)),
                    RateTier::new(dec!(201), Some(dec!(500)), dec!(20)),
                    RateTier::new(dec!(501), Some(dec!(1000)), dec!(25)),
                    RateTier::new(dec!(1001), Some(dec!(2000)), dec!(40)),
                    RateTier::new(dec!(2001), None, dec!(100)),
                ],
            },
            pick_pack: PickPackRule::default(),
            storage: StorageRule::default(),
        }
    }
}

impl RateTables {
    pub fn closing_fee(&self, selling_price: Decimal) -> Decimal {
        *self.closing.resolve(selling_price)
    }

    pub fn shipping_fee(&self, weight_kg: Decimal, region: Region) -> Decimal {
        self.shipping.resolve(kg_to_grams(weight_kg)).for_region(region)
    }

    pub fn removal_fee(&self, weight_kg: Decimal) -> Decimal {
        *self.removal.resolve(kg_to_grams(weight_kg))
    }

    pub fn pick_pack_fee(&self, weight_kg: Decimal) -> Decimal {
        self.pick_pack.fee(weight_kg)
    }

    pub fn storage_fee(&self, length_cm: Decimal, width_cm: Decimal, height_cm: Decimal) -> Decimal {
        self.storage.monthly_fee(length_cm, width_cm, height_cm)
    }
}
