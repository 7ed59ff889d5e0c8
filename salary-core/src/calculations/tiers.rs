//! Affordability tiers.
//!
//! | Tier | Monthly net budget (USD) |
//! |------|--------------------------|
//! | Get by | rent + essentials |
//! | Comfortable | get-by ÷ 0.5 (essentials are half of take-home, 50/30/20) |
//! | Live well | get-by ÷ 0.4 (essentials are 40% of take-home) |
//!
//! Each budget is annualized, converted to the city's currency, and
//! inverted through the city's tax profile to the gross salary that
//! leaves that much take-home pay.

use std::collections::BTreeSet;
use std::sync::Mutex;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::round_one_dp;
use crate::calculations::inversion::{InversionConfig, InversionError};
use crate::calculations::profile::{MissingTaxDataPolicy, TaxProfile};
use crate::{CostDataset, ExchangeRateError, SalaryTiers};

/// Share of take-home pay that essentials take up in the comfortable tier.
pub const COMFORTABLE_ESSENTIALS_SHARE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Share of take-home pay that essentials take up in the live-well tier.
pub const LIVE_WELL_ESSENTIALS_SHARE: Decimal = Decimal::from_parts(4, 0, 0, false, 1);

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TierError {
    #[error("city '{city}': {source}")]
    Inversion {
        city: String,
        #[source]
        source: InversionError,
    },

    #[error("city '{city}': {source}")]
    Currency {
        city: String,
        #[source]
        source: ExchangeRateError,
    },
}

/// Monthly take-home budgets for the three tiers, in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyBudgets {
    pub get_by: Decimal,
    pub comfortable: Decimal,
    pub live_well: Decimal,
}

impl MonthlyBudgets {
    pub fn from_costs(
        rent_usd: Decimal,
        essentials_usd: Decimal,
    ) -> Self {
        let get_by = rent_usd + essentials_usd;
        Self {
            get_by,
            comfortable: get_by / COMFORTABLE_ESSENTIALS_SHARE,
            live_well: get_by / LIVE_WELL_ESSENTIALS_SHARE,
        }
    }
}

/// Computes [`SalaryTiers`] for cities and neighborhoods of a dataset.
pub struct TierCalculator<'a, D: CostDataset + ?Sized> {
    dataset: &'a D,
    inversion: InversionConfig,
    policy: MissingTaxDataPolicy,
    warned: Mutex<BTreeSet<String>>,
}

impl<'a, D: CostDataset + ?Sized> TierCalculator<'a, D> {
    pub fn new(dataset: &'a D) -> Self {
        Self {
            dataset,
            inversion: InversionConfig::default(),
            policy: MissingTaxDataPolicy::default(),
            warned: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn with_inversion(
        mut self,
        inversion: InversionConfig,
    ) -> Self {
        self.inversion = inversion;
        self
    }

    pub fn with_policy(
        mut self,
        policy: MissingTaxDataPolicy,
    ) -> Self {
        self.policy = policy;
        self
    }

    pub fn dataset(&self) -> &'a D {
        self.dataset
    }

    /// Computes the tiers for `city` with its rent scaled by `multiplier`
    /// (1 for the city as a whole).
    ///
    /// Returns `Ok(None)` for a missing-data city: unknown name, no
    /// currency or country, or (under [`MissingTaxDataPolicy::Exclude`]) a
    /// country with no tax data.
    ///
    /// # Errors
    ///
    /// [`TierError`] when a salary cannot be inverted or the currency has no
    /// exchange rate. Either affects only this city or neighborhood.
    pub fn compute_tiers(
        &self,
        city: &str,
        multiplier: Decimal,
    ) -> Result<Option<SalaryTiers>, TierError> {
        let Some(record) = self.dataset.city(city) else {
            return Ok(None);
        };
        let Some((currency, country)) = record.locale() else {
            return Ok(None);
        };
        let Some(profile) = self.profile(country, city) else {
            return Ok(None);
        };

        let rent_usd = record.rent * multiplier;
        let essentials_usd = record.living.essentials();
        let budgets = MonthlyBudgets::from_costs(rent_usd, essentials_usd);

        let to_local = |usd: Decimal| {
            self.dataset
                .exchange_rates()
                .usd_to_local(usd, currency)
                .map_err(|source| TierError::Currency {
                    city: city.to_string(),
                    source,
                })
        };
        let invert = |annual_net: Decimal| {
            profile
                .gross_from_net(annual_net, &self.inversion)
                .map_err(|source| TierError::Inversion {
                    city: city.to_string(),
                    source,
                })
        };

        let gross_get_by = invert(to_local(budgets.get_by * MONTHS_PER_YEAR)?)?;
        let gross_comfortable = invert(to_local(budgets.comfortable * MONTHS_PER_YEAR)?)?;
        let gross_live_well = invert(to_local(budgets.live_well * MONTHS_PER_YEAR)?)?;

        let effective_tax_rate = if gross_comfortable > Decimal::ZERO {
            round_one_dp(profile.burden(gross_comfortable) / gross_comfortable * Decimal::ONE_HUNDRED)
        } else {
            Decimal::ZERO
        };

        debug!(
            city,
            %multiplier,
            %gross_comfortable,
            currency,
            "computed salary tiers"
        );

        Ok(Some(SalaryTiers {
            currency: currency.to_string(),
            gross_get_by,
            gross_comfortable,
            gross_live_well,
            monthly_rent_local: to_local(rent_usd)?,
            monthly_essentials_local: to_local(essentials_usd)?,
            effective_tax_rate,
            rent_usd,
            essentials_usd,
            has_local_deductions: profile.has_local_deductions(),
        }))
    }

    fn profile(
        &self,
        country: &'a str,
        city: &str,
    ) -> Option<TaxProfile<'a>> {
        if let Some(profile) = TaxProfile::resolve(self.dataset, country, city) {
            return Some(profile);
        }

        match self.policy {
            MissingTaxDataPolicy::AssumeZero => {
                if self.first_warning_for(country) {
                    warn!(country, "no tax data for country; assuming zero tax and deductions");
                }
                Some(TaxProfile::zero_burden(country))
            }
            MissingTaxDataPolicy::Exclude => {
                if self.first_warning_for(country) {
                    warn!(country, "no tax data for country; excluding its cities");
                }
                None
            }
        }
    }

    fn first_warning_for(
        &self,
        country: &str,
    ) -> bool {
        match self.warned.lock() {
            Ok(mut warned) => warned.insert(country.to_string()),
            Err(_) => true,
        }
    }
}
