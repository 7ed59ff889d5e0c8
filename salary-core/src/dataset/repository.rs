use thiserror::Error;

use crate::models::{
    BracketTable, CityRecord, CountryDeductions, DeductionOverride, ExchangeRates, Neighborhood,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("city '{0}' is defined more than once")]
    DuplicateCity(String),

    #[error("unknown city '{0}'")]
    UnknownCity(String),

    #[error("city '{city}' uses currency {currency} which has no exchange rate")]
    UnknownCurrency { city: String, currency: String },

    #[error("neighborhood '{neighborhood}' in '{city}' is defined more than once")]
    DuplicateNeighborhood { city: String, neighborhood: String },

    #[error("neighborhood '{neighborhood}' in '{city}' must have a positive multiplier")]
    InvalidMultiplier { city: String, neighborhood: String },
}

/// Read-only lookups over a loaded cost-of-living dataset.
///
/// Everything the calculators need is keyed by city name or country code.
/// Absence is never an error at this layer: callers decide what a missing
/// table means.
pub trait CostDataset: Send + Sync {
    fn city(
        &self,
        name: &str,
    ) -> Option<&CityRecord>;

    /// All cities in load order.
    fn cities(&self) -> &[CityRecord];

    /// Neighborhoods of `city` in load order; empty when it has none.
    fn neighborhoods(
        &self,
        city: &str,
    ) -> &[Neighborhood];

    fn tax_brackets(
        &self,
        country: &str,
    ) -> Option<&BracketTable>;

    fn country_deductions(
        &self,
        country: &str,
    ) -> Option<&CountryDeductions>;

    /// Local deductions for `city`; empty when it has none.
    fn deduction_overrides(
        &self,
        city: &str,
    ) -> &[DeductionOverride];

    fn exchange_rates(&self) -> &ExchangeRates;
}
