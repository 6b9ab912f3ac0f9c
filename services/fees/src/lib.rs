pub mod calculator;
pub mod config;
pub mod product;
pub mod rates;
pub mod resolver;
pub mod result;
pub mod store;
pub mod summary;


pub use calculator::{BatchReport, FeeCalculator, FeePolicy, RowOutcome};
pub use config::EngineConfig;
pub use product::{Fulfillment, ProductInput, MAX_INPUT_VALUE, RawNumber, RawProductInput, Region, StepLevel, ValidationError};
pub use rates::{RateTables, RateTier, TierTable};
pub use resolver::{CategoryRateResolver, CategoryRateSource, ReferralFee, ResolverDefaults, SourceError, TaxCreditTable};
pub use result::CalculationResult;
pub use store::{CategoryFeeRecord, CategoryRecord, CategoryStore, StoreError};
pub use summary::PortfolioSummary;
