use std::collections::HashMap;

use rust_decimal::Decimal;

use super::repository::{CostDataset, DatasetError};
use crate::models::{
    BracketTable, CityRecord, CountryDeductions, DeductionOverride, ExchangeRates, Neighborhood,
};

/// Dataset held entirely in memory, built once and then only read.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataset {
    cities: Vec<CityRecord>,
    city_index: HashMap<String, usize>,
    neighborhoods: HashMap<String, Vec<Neighborhood>>,
    brackets: HashMap<String, BracketTable>,
    deductions: HashMap<String, CountryDeductions>,
    overrides: HashMap<String, Vec<DeductionOverride>>,
    exchange_rates: ExchangeRates,
}

impl InMemoryDataset {
    pub fn new(exchange_rates: ExchangeRates) -> Self {
        Self {
            exchange_rates,
            ..Self::default()
        }
    }

    pub fn add_city(
        &mut self,
        city: CityRecord,
    ) -> Result<(), DatasetError> {
        if self.city_index.contains_key(&city.name) {
            return Err(DatasetError::DuplicateCity(city.name));
        }
        if let Some(currency) = city.currency.as_deref().filter(|c| !c.is_empty()) {
            if !self.exchange_rates.contains(currency) {
                return Err(DatasetError::UnknownCurrency {
                    city: city.name.clone(),
                    currency: currency.to_string(),
                });
            }
        }

        self.city_index.insert(city.name.clone(), self.cities.len());
        self.cities.push(city);
        Ok(())
    }

    pub fn add_neighborhood(
        &mut self,
        neighborhood: Neighborhood,
    ) -> Result<(), DatasetError> {
        if !self.city_index.contains_key(&neighborhood.city) {
            return Err(DatasetError::UnknownCity(neighborhood.city));
        }
        if neighborhood.multiplier <= Decimal::ZERO {
            return Err(DatasetError::InvalidMultiplier {
                city: neighborhood.city,
                neighborhood: neighborhood.name,
            });
        }

        let entries = self
            .neighborhoods
            .entry(neighborhood.city.clone())
            .or_default();
        if entries.iter().any(|n| n.name == neighborhood.name) {
            return Err(DatasetError::DuplicateNeighborhood {
                city: neighborhood.city,
                neighborhood: neighborhood.name,
            });
        }
        entries.push(neighborhood);
        Ok(())
    }

    /// Replaces any schedule already stored for `country`.
    pub fn set_tax_brackets(
        &mut self,
        country: impl Into<String>,
        table: BracketTable,
    ) {
        self.brackets.insert(country.into(), table);
    }

    pub fn set_country_deductions(
        &mut self,
        country: impl Into<String>,
        rules: CountryDeductions,
    ) {
        self.deductions.insert(country.into(), rules);
    }

    pub fn add_deduction_override(
        &mut self,
        city: &str,
        rule: DeductionOverride,
    ) -> Result<(), DatasetError> {
        if !self.city_index.contains_key(city) {
            return Err(DatasetError::UnknownCity(city.to_string()));
        }
        self.overrides.entry(city.to_string()).or_default().push(rule);
        Ok(())
    }

    pub fn neighborhood_count(&self) -> usize {
        self.neighborhoods.values().map(Vec::len).sum()
    }

    pub fn country_count(&self) -> usize {
        let mut countries: Vec<&String> = self.brackets.keys().chain(self.deductions.keys()).collect();
        countries.sort_unstable();
        countries.dedup();
        countries.len()
    }
}

impl CostDataset for InMemoryDataset {
    fn city(
        &self,
        name: &str,
    ) -> Option<&CityRecord> {
        self.city_index.get(name).map(|&idx| &self.cities[idx])
    }

    fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    fn neighborhoods(
        &self,
        city: &str,
    ) -> &[Neighborhood] {
        self.neighborhoods.get(city).map(Vec::as_slice).unwrap_or(&[])
    }

    fn tax_brackets(
        &self,
        country: &str,
    ) -> Option<&BracketTable> {
        self.brackets.get(country)
    }

    fn country_deductions(
        &self,
        country: &str,
    ) -> Option<&CountryDeductions> {
        self.deductions.get(country)
    }

    fn deduction_overrides(
        &self,
        city: &str,
    ) -> &[DeductionOverride] {
        self.overrides.get(city).map(Vec::as_slice).unwrap_or(&[])
    }

    fn exchange_rates(&self) -> &ExchangeRates {
        &self.exchange_rates
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{LivingCosts, OverrideAmount, TaxBracket};

    fn rates() -> ExchangeRates {
        let mut rates = ExchangeRates::new();
        rates.insert("USD", dec!(1)).unwrap();
        rates.insert("EUR", dec!(0.92)).unwrap();
        rates
    }

    fn city(name: &str, currency: &str) -> CityRecord {
        CityRecord {
            name: name.to_string(),
            coli: None,
            currency: Some(currency.to_string()),
            country: Some("DE".to_string()),
            rent: dec!(1300),
            living: LivingCosts::default(),
        }
    }

    #[test]
    fn cities_keep_load_order_and_resolve_by_name() {
        let mut dataset = InMemoryDataset::new(rates());
        dataset.add_city(city("Munich", "EUR")).unwrap();
        dataset.add_city(city("Berlin", "EUR")).unwrap();

        let names: Vec<_> = dataset.cities().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Munich", "Berlin"]);
        assert_eq!(dataset.city("Berlin").map(|c| c.rent), Some(dec!(1300)));
        assert!(dataset.city("Hamburg").is_none());
    }

    #[test]
    fn duplicate_city_is_rejected() {
        let mut dataset = InMemoryDataset::new(rates());
        dataset.add_city(city("Berlin", "EUR")).unwrap();

        assert_eq!(
            dataset.add_city(city("Berlin", "EUR")),
            Err(DatasetError::DuplicateCity("Berlin".to_string()))
        );
    }

    #[test]
    fn city_with_unlisted_currency_is_rejected() {
        let mut dataset = InMemoryDataset::new(rates());

        assert_eq!(
            dataset.add_city(city("Zurich", "CHF")),
            Err(DatasetError::UnknownCurrency {
                city: "Zurich".to_string(),
                currency: "CHF".to_string(),
            })
        );
    }

    #[test]
    fn neighborhoods_require_known_city_and_positive_multiplier() {
        let mut dataset = InMemoryDataset::new(rates());
        dataset.add_city(city("Berlin", "EUR")).unwrap();

        let orphan = Neighborhood {
            city: "Paris".to_string(),
            name: "Marais".to_string(),
            multiplier: dec!(1.4),
        };
        assert_eq!(
            dataset.add_neighborhood(orphan),
            Err(DatasetError::UnknownCity("Paris".to_string()))
        );

        let free = Neighborhood {
            city: "Berlin".to_string(),
            name: "Mitte".to_string(),
            multiplier: dec!(0),
        };
        assert_eq!(
            dataset.add_neighborhood(free),
            Err(DatasetError::InvalidMultiplier {
                city: "Berlin".to_string(),
                neighborhood: "Mitte".to_string(),
            })
        );

        let mitte = Neighborhood {
            city: "Berlin".to_string(),
            name: "Mitte".to_string(),
            multiplier: dec!(1.3),
        };
        dataset.add_neighborhood(mitte.clone()).unwrap();
        assert_eq!(dataset.neighborhoods("Berlin"), &[mitte.clone()]);
        assert_eq!(
            dataset.add_neighborhood(mitte),
            Err(DatasetError::DuplicateNeighborhood {
                city: "Berlin".to_string(),
                neighborhood: "Mitte".to_string(),
            })
        );
        assert!(dataset.neighborhoods("Munich").is_empty());
        assert_eq!(dataset.neighborhood_count(), 1);
    }

    #[test]
    fn country_tables_and_overrides_are_looked_up_by_key() {
        let mut dataset = InMemoryDataset::new(rates());
        dataset.add_city(city("Berlin", "EUR")).unwrap();
        dataset.set_tax_brackets(
            "DE",
            BracketTable::new(vec![TaxBracket::new(None, dec!(30))]).unwrap(),
        );
        dataset.set_country_deductions("DE", CountryDeductions::default());
        dataset
            .add_deduction_override(
                "Berlin",
                DeductionOverride {
                    name: "church_tax".to_string(),
                    amount: OverrideAmount::Rate(dec!(0.8)),
                },
            )
            .unwrap();

        assert!(dataset.tax_brackets("DE").is_some());
        assert!(dataset.tax_brackets("FR").is_none());
        assert!(dataset.country_deductions("DE").is_some());
        assert_eq!(dataset.deduction_overrides("Berlin").len(), 1);
        assert!(dataset.deduction_overrides("Munich").is_empty());
        assert_eq!(dataset.country_count(), 1);
        assert_eq!(
            dataset.add_deduction_override(
                "Munich",
                DeductionOverride {
                    name: "x".to_string(),
                    amount: OverrideAmount::FlatAnnual(dec!(10)),
                },
            ),
            Err(DatasetError::UnknownCity("Munich".to_string()))
        );
    }
}
