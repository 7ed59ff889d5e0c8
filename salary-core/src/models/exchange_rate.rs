use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code of the currency all cost figures are recorded in.
pub const REFERENCE_CURRENCY: &str = "USD";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeRateError {
    #[error("exchange rate for {currency} must be positive, got {rate}")]
    NonPositiveRate { currency: String, rate: Decimal },

    #[error("no exchange rate for currency {0}")]
    UnknownCurrency(String),
}

/// Currency code → units per fixed reference unit.
///
/// Only the ratio between two entries matters, so the table may be anchored
/// on any currency as long as it also lists USD.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRates {
    rates: BTreeMap<String, Decimal>,
}

impl ExchangeRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        currency: impl Into<String>,
        rate: Decimal,
    ) -> Result<(), ExchangeRateError> {
        let currency = currency.into();
        if rate <= Decimal::ZERO {
            return Err(ExchangeRateError::NonPositiveRate { currency, rate });
        }
        self.rates.insert(currency, rate);
        Ok(())
    }

    pub fn rate(
        &self,
        currency: &str,
    ) -> Option<Decimal> {
        self.rates.get(currency).copied()
    }

    pub fn contains(
        &self,
        currency: &str,
    ) -> bool {
        self.rates.contains_key(currency)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Converts a USD amount into `currency`: `usd * rate[currency] / rate[USD]`.
    pub fn usd_to_local(
        &self,
        usd: Decimal,
        currency: &str,
    ) -> Result<Decimal, ExchangeRateError> {
        let target = self
            .rate(currency)
            .ok_or_else(|| ExchangeRateError::UnknownCurrency(currency.to_string()))?;
        let reference = self
            .rate(REFERENCE_CURRENCY)
            .ok_or_else(|| ExchangeRateError::UnknownCurrency(REFERENCE_CURRENCY.to_string()))?;

        Ok(usd * target / reference)
    }
}
