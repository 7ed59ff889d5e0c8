use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monthly living costs for one person, in USD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivingCosts {
    pub groceries: Decimal,
    pub utilities: Decimal,
    pub transport: Decimal,
    pub healthcare: Decimal,
    pub childcare: Decimal,
}

impl LivingCosts {
    /// Sum of the components counted as essentials.
    ///
    /// Childcare is carried on the record but is not an essential: the
    /// salary tiers describe a single adult.
    pub fn essentials(&self) -> Decimal {
        self.groceries + self.utilities + self.transport + self.healthcare
    }
}

impl Default for LivingCosts {
    fn default() -> Self {
        Self {
            groceries: Decimal::from(350),
            utilities: Decimal::from(200),
            transport: Decimal::from(100),
            healthcare: Decimal::from(300),
            childcare: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub coli: Option<Decimal>,
    pub currency: Option<String>,
    pub country: Option<String>,
    /// Monthly rent for a one-bedroom apartment, USD.
    pub rent: Decimal,
    pub living: LivingCosts,
}

impl CityRecord {
    /// Rent used when a city has no rent figure of its own.
    pub const DEFAULT_RENT: Decimal = Decimal::from_parts(1500, 0, 0, false, 0);

    /// Currency and country codes, or `None` when either is missing.
    pub fn locale(&self) -> Option<(&str, &str)> {
        match (self.currency.as_deref(), self.country.as_deref()) {
            (Some(currency), Some(country)) if !currency.is_empty() && !country.is_empty() => {
                Some((currency, country))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub city: String,
    pub name: String,
    /// Applied to the city's rent baseline.
    pub multiplier: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn city(currency: Option<&str>, country: Option<&str>) -> CityRecord {
        CityRecord {
            name: "Lisbon".to_string(),
            coli: Some(dec!(52.3)),
            currency: currency.map(str::to_string),
            country: country.map(str::to_string),
            rent: dec!(1200),
            living: LivingCosts::default(),
        }
    }

    #[test]
    fn essentials_exclude_childcare() {
        let living = LivingCosts {
            groceries: dec!(400),
            utilities: dec!(150),
            transport: dec!(60),
            healthcare: dec!(90),
            childcare: dec!(900),
        };

        assert_eq!(living.essentials(), dec!(700));
    }

    #[test]
    fn default_living_costs_match_fallback_figures() {
        assert_eq!(LivingCosts::default().essentials(), dec!(950));
        assert_eq!(CityRecord::DEFAULT_RENT, dec!(1500));
    }

    #[test]
    fn locale_requires_currency_and_country() {
        assert_eq!(city(Some("EUR"), Some("PT")).locale(), Some(("EUR", "PT")));
        assert_eq!(city(None, Some("PT")).locale(), None);
        assert_eq!(city(Some("EUR"), None).locale(), None);
        assert_eq!(city(Some(""), Some("PT")).locale(), None);
    }
}
