//! Resolution of the tax and deduction rules that apply to one city.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::deductions::compute_deductions;
use crate::calculations::inversion::{InversionConfig, InversionError, gross_from_net};
use crate::calculations::tax::compute_tax;
use crate::{BracketTable, CostDataset, CountryDeductions, DeductionOverride};

/// What to do with a city whose country has no tax or deduction data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingTaxDataPolicy {
    /// Compute as if the country levied neither tax nor deductions.
    #[default]
    AssumeZero,
    /// Leave the city out, like a city with no currency.
    Exclude,
}

/// The rules governing income earned in one city: the country's bracket
/// schedule and deduction rules plus the city's local overrides.
#[derive(Debug, Clone, Copy)]
pub struct TaxProfile<'a> {
    country: &'a str,
    brackets: Option<&'a BracketTable>,
    deductions: Option<&'a CountryDeductions>,
    overrides: &'a [DeductionOverride],
}

impl<'a> TaxProfile<'a> {
    /// Looks up the rules for `country` and `city`.
    ///
    /// Returns `None` when the country has neither a bracket schedule nor
    /// deduction rules. An empty schedule counts as data: it means the
    /// country levies no income tax. City overrides are only attached when
    /// the country has deduction rules.
    pub fn resolve<D: CostDataset + ?Sized>(
        dataset: &'a D,
        country: &'a str,
        city: &str,
    ) -> Option<Self> {
        let brackets = dataset.tax_brackets(country);
        let deductions = dataset.country_deductions(country);
        if brackets.is_none() && deductions.is_none() {
            return None;
        }

        let overrides: &[DeductionOverride] = if deductions.is_some() {
            dataset.deduction_overrides(city)
        } else {
            &[]
        };

        Some(Self {
            country,
            brackets,
            deductions,
            overrides,
        })
    }

    /// A profile that levies nothing, used for countries with no data when
    /// the policy is [`MissingTaxDataPolicy::AssumeZero`].
    pub fn zero_burden(country: &'a str) -> Self {
        Self {
            country,
            brackets: None,
            deductions: None,
            overrides: &[],
        }
    }

    pub fn country(&self) -> &'a str {
        self.country
    }

    pub fn has_local_deductions(&self) -> bool {
        !self.overrides.is_empty()
    }

    pub fn income_tax(
        &self,
        gross: Decimal,
    ) -> Decimal {
        self.brackets
            .map_or(Decimal::ZERO, |table| compute_tax(gross, table))
    }

    pub fn deductions(
        &self,
        gross: Decimal,
    ) -> Decimal {
        compute_deductions(gross, self.deductions, self.overrides, self.brackets)
    }

    /// Income tax plus deductions.
    pub fn burden(
        &self,
        gross: Decimal,
    ) -> Decimal {
        self.income_tax(gross) + self.deductions(gross)
    }

    /// Take-home pay: `gross - tax(gross) - deductions(gross)`.
    pub fn net(
        &self,
        gross: Decimal,
    ) -> Decimal {
        gross - self.burden(gross)
    }

    /// Gross income whose take-home pay is `target_net`.
    pub fn gross_from_net(
        &self,
        target_net: Decimal,
        config: &InversionConfig,
    ) -> Result<Decimal, InversionError> {
        gross_from_net(target_net, |gross| self.net(gross), config)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        CityRecord, ExchangeRates, InMemoryDataset, LivingCosts, OverrideAmount, SocialSecurityRule,
        TaxBracket,
    };

    fn dataset() -> InMemoryDataset {
        let mut rates = ExchangeRates::new();
        rates.insert("USD", dec!(1)).unwrap();
        let mut dataset = InMemoryDataset::new(rates);

        for (name, country) in [("New York", "US"), ("Dubai", "AE"), ("Atlantis", "XX")] {
            dataset
                .add_city(CityRecord {
                    name: name.to_string(),
                    coli: None,
                    currency: Some("USD".to_string()),
                    country: Some(country.to_string()),
                    rent: dec!(2000),
                    living: LivingCosts::default(),
                })
                .unwrap();
        }

        dataset.set_tax_brackets(
            "US",
            BracketTable::new(vec![
                TaxBracket::new(Some(dec!(50000)), dec!(10)),
                TaxBracket::new(None, dec!(20)),
            ])
            .unwrap(),
        );
        dataset.set_country_deductions(
            "US",
            CountryDeductions {
                social_security: Some(SocialSecurityRule {
                    rate: dec!(7.65),
                    cap: None,
                    reduced_rate: None,
                }),
                solidarity: None,
            },
        );
        dataset
            .add_deduction_override(
                "New York",
                DeductionOverride {
                    name: "nyc".to_string(),
                    amount: OverrideAmount::Rate(dec!(3)),
                },
            )
            .unwrap();

        dataset.set_tax_brackets("AE", BracketTable::default());
        dataset
    }

    #[test]
    fn resolves_country_and_city_rules() {
        let dataset = dataset();
        let profile = TaxProfile::resolve(&dataset, "US", "New York").expect("US has data");

        assert_eq!(profile.country(), "US");
        assert!(profile.has_local_deductions());
        assert_eq!(profile.income_tax(dec!(100000)), dec!(15000));
        // 7.65% + 3%
        assert_eq!(profile.deductions(dec!(100000)), dec!(10650));
        assert_eq!(profile.net(dec!(100000)), dec!(74350));
    }

    #[test]
    fn country_without_any_data_is_unresolved() {
        let dataset = dataset();

        assert!(TaxProfile::resolve(&dataset, "XX", "Atlantis").is_none());
    }

    #[test]
    fn empty_schedule_still_resolves() {
        let dataset = dataset();
        let profile = TaxProfile::resolve(&dataset, "AE", "Dubai").expect("empty table is data");

        assert_eq!(profile.burden(dec!(250000)), Decimal::ZERO);
        assert!(!profile.has_local_deductions());
    }

    #[test]
    fn overrides_need_country_deduction_rules() {
        let mut dataset = dataset();
        dataset
            .add_city(CityRecord {
                name: "Springfield".to_string(),
                coli: None,
                currency: Some("USD".to_string()),
                country: Some("CA".to_string()),
                rent: dec!(1500),
                living: LivingCosts::default(),
            })
            .unwrap();
        dataset.set_tax_brackets(
            "CA",
            BracketTable::new(vec![TaxBracket::new(None, dec!(10))]).unwrap(),
        );
        dataset
            .add_deduction_override(
                "Springfield",
                DeductionOverride {
                    name: "municipal".to_string(),
                    amount: OverrideAmount::Rate(dec!(5)),
                },
            )
            .unwrap();

        let profile = TaxProfile::resolve(&dataset, "CA", "Springfield").expect("CA has brackets");

        assert_eq!(profile.deductions(dec!(100000)), Decimal::ZERO);
        assert_eq!(profile.burden(dec!(100000)), dec!(10000));
        assert!(!profile.has_local_deductions());
    }

    #[test]
    fn zero_burden_profile_passes_income_through() {
        let profile = TaxProfile::zero_burden("XX");

        assert_eq!(profile.net(dec!(42000)), dec!(42000));
        assert_eq!(
            profile.gross_from_net(dec!(42000), &InversionConfig::default()),
            Ok(dec!(42000))
        );
    }
}
