//! Loader for the cost-of-living dataset.
//!
//! A dataset is a directory of CSV tables. Headers are matched by name,
//! whitespace around cells is trimmed, and an empty cell means "absent".
//!
//! | File | Required | Columns |
//! |------|----------|---------|
//! | `cities.csv` | yes | `city, coli, currency, country, rent, groceries, utilities, transport, healthcare, childcare` |
//! | `exchange_rates.csv` | yes | `currency, rate` |
//! | `tax_brackets.csv` | yes | `country, upper_bound, rate` |
//! | `neighborhoods.csv` | no | `city, neighborhood, multiplier` |
//! | `country_deductions.csv` | no | `country, ss_rate, ss_cap, ss_reduced_rate, solidarity_rate` |
//! | `city_deductions.csv` | no | `city, name, rate, flat_annual` |
//!
//! Rates are percentages (`20` means 20%). Bracket rows are read in file
//! order per country; an empty `upper_bound` marks the open top bracket.
//! Missing rent or living-cost cells fall back to the defaults on
//! [`CityRecord`] and [`LivingCosts`].
//!
//! ### Minimal example
//!
//! ```csv
//! city,coli,currency,country,rent
//! Lisbon,52.3,EUR,PT,1150
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use salary_core::{
    BracketTable, BracketTableError, CityRecord, CostDataset, CountryDeductions, DatasetError,
    DeductionOverride,
    DeductionRuleError, ExchangeRateError, ExchangeRates, InMemoryDataset, LivingCosts,
    Neighborhood, OverrideAmount, REFERENCE_CURRENCY, SocialSecurityRule, SolidarityRule,
    TaxBracket,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

const CITIES_FILE: &str = "cities.csv";
const EXCHANGE_RATES_FILE: &str = "exchange_rates.csv";
const TAX_BRACKETS_FILE: &str = "tax_brackets.csv";
const NEIGHBORHOODS_FILE: &str = "neighborhoods.csv";
const COUNTRY_DEDUCTIONS_FILE: &str = "country_deductions.csv";
const CITY_DEDUCTIONS_FILE: &str = "city_deductions.csv";

/// Errors that can occur when loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetLoadError {
    #[error("CSV parse error in {file}: {message}")]
    CsvParse { file: &'static str, message: String },

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("required file '{}' not found", .0.display())]
    MissingFile(PathBuf),

    #[error("{file} row {row}: {message}")]
    InvalidRow {
        file: &'static str,
        row: usize,
        message: String,
    },

    #[error("tax brackets for {country}: {source}")]
    Brackets {
        country: String,
        #[source]
        source: BracketTableError,
    },

    #[error("deduction rules for {key}: {source}")]
    Deductions {
        key: String,
        #[source]
        source: DeductionRuleError,
    },

    #[error("exchange rates: {0}")]
    ExchangeRate(#[from] ExchangeRateError),

    #[error("exchange rates must include the reference currency {REFERENCE_CURRENCY}")]
    MissingReferenceCurrency,

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn deserialize_optional_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// A row of `cities.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CityRecordRow {
    pub city: String,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub coli: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_code")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_code")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub rent: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub groceries: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub utilities: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub transport: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub healthcare: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub childcare: Option<Decimal>,
}

impl CityRecordRow {
    fn into_record(self) -> CityRecord {
        let defaults = LivingCosts::default();
        CityRecord {
            living: LivingCosts {
                groceries: self.groceries.unwrap_or(defaults.groceries),
                utilities: self.utilities.unwrap_or(defaults.utilities),
                transport: self.transport.unwrap_or(defaults.transport),
                healthcare: self.healthcare.unwrap_or(defaults.healthcare),
                childcare: self.childcare.unwrap_or(defaults.childcare),
            },
            name: self.city,
            coli: self.coli,
            currency: self.currency,
            country: self.country,
            rent: self.rent.unwrap_or(CityRecord::DEFAULT_RENT),
        }
    }
}

/// A row of `neighborhoods.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NeighborhoodRecord {
    pub city: String,
    pub neighborhood: String,
    pub multiplier: Decimal,
}

/// A row of `tax_brackets.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub country: String,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

/// A row of `country_deductions.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CountryDeductionRecord {
    pub country: String,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub ss_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub ss_cap: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub ss_reduced_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub solidarity_rate: Option<Decimal>,
}

/// A row of `city_deductions.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CityDeductionRecord {
    pub city: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub rate: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub flat_annual: Option<Decimal>,
}

/// A row of `exchange_rates.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExchangeRateRecord {
    pub currency: String,
    pub rate: Decimal,
}

/// Every table of a dataset, parsed but not yet validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetTables {
    pub cities: Vec<CityRecordRow>,
    pub neighborhoods: Vec<NeighborhoodRecord>,
    pub tax_brackets: Vec<TaxBracketRecord>,
    pub country_deductions: Vec<CountryDeductionRecord>,
    pub city_deductions: Vec<CityDeductionRecord>,
    pub exchange_rates: Vec<ExchangeRateRecord>,
}

/// Reads dataset tables and assembles them into an [`InMemoryDataset`].
pub struct DatasetLoader;

impl DatasetLoader {
    /// Parse the rows of one table from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice. `file` only labels error messages.
    pub fn parse<T, R>(
        file: &'static str,
        reader: R,
    ) -> Result<Vec<T>, DatasetLoadError>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        csv_reader
            .deserialize::<T>()
            .map(|result| {
                result.map_err(|e| DatasetLoadError::CsvParse {
                    file,
                    message: e.to_string(),
                })
            })
            .collect()
    }

    /// Read every table from `dir`. Optional tables that are absent are
    /// treated as empty.
    pub fn read_dir(dir: &Path) -> Result<DatasetTables, DatasetLoadError> {
        Ok(DatasetTables {
            cities: Self::read_table(dir, CITIES_FILE, true)?,
            neighborhoods: Self::read_table(dir, NEIGHBORHOODS_FILE, false)?,
            tax_brackets: Self::read_table(dir, TAX_BRACKETS_FILE, true)?,
            country_deductions: Self::read_table(dir, COUNTRY_DEDUCTIONS_FILE, false)?,
            city_deductions: Self::read_table(dir, CITY_DEDUCTIONS_FILE, false)?,
            exchange_rates: Self::read_table(dir, EXCHANGE_RATES_FILE, true)?,
        })
    }

    /// Read and validate the dataset stored in `dir`.
    pub fn load_dir(dir: &Path) -> Result<InMemoryDataset, DatasetLoadError> {
        info!(dir = %dir.display(), "loading dataset");
        let dataset = Self::build(Self::read_dir(dir)?)?;
        info!(
            cities = dataset.cities().len(),
            neighborhoods = dataset.neighborhood_count(),
            countries = dataset.country_count(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Validate parsed tables and assemble the dataset.
    ///
    /// Exchange rates are inserted first so that every city's currency can
    /// be checked against them; tax schedules and rules follow the cities
    /// they may refer to.
    pub fn build(tables: DatasetTables) -> Result<InMemoryDataset, DatasetLoadError> {
        let mut rates = ExchangeRates::new();
        for record in tables.exchange_rates {
            rates.insert(record.currency, record.rate)?;
        }
        if !rates.contains(REFERENCE_CURRENCY) {
            return Err(DatasetLoadError::MissingReferenceCurrency);
        }

        let mut dataset = InMemoryDataset::new(rates);

        for row in tables.cities {
            dataset.add_city(row.into_record())?;
        }

        for row in tables.neighborhoods {
            dataset.add_neighborhood(Neighborhood {
                city: row.city,
                name: row.neighborhood,
                multiplier: row.multiplier,
            })?;
        }

        for (country, brackets) in Self::group_brackets(tables.tax_brackets) {
            let table = BracketTable::new(brackets).map_err(|source| DatasetLoadError::Brackets {
                country: country.clone(),
                source,
            })?;
            debug!(%country, brackets = table.brackets().len(), "loaded tax schedule");
            dataset.set_tax_brackets(country, table);
        }

        let mut seen_countries = Vec::new();
        for (idx, row) in tables.country_deductions.into_iter().enumerate() {
            let row_number = idx + 1;
            if seen_countries.contains(&row.country) {
                return Err(DatasetLoadError::InvalidRow {
                    file: COUNTRY_DEDUCTIONS_FILE,
                    row: row_number,
                    message: format!("duplicate rules for country {}", row.country),
                });
            }
            seen_countries.push(row.country.clone());

            let (country, rules) = Self::convert_country_deductions(row, row_number)?;
            rules
                .validate()
                .map_err(|source| DatasetLoadError::Deductions {
                    key: country.clone(),
                    source,
                })?;
            dataset.set_country_deductions(country, rules);
        }

        for (idx, row) in tables.city_deductions.into_iter().enumerate() {
            let city = row.city.clone();
            let rule = Self::convert_city_deduction(row, idx + 1)?;
            rule.validate()
                .map_err(|source| DatasetLoadError::Deductions {
                    key: format!("{city}/{}", rule.name),
                    source,
                })?;
            dataset.add_deduction_override(&city, rule)?;
        }

        Ok(dataset)
    }

    fn read_table<T: DeserializeOwned>(
        dir: &Path,
        file: &'static str,
        required: bool,
    ) -> Result<Vec<T>, DatasetLoadError> {
        let path = dir.join(file);
        match File::open(&path) {
            Ok(handle) => Self::parse(file, handle),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
                debug!(file, "optional table absent");
                Ok(Vec::new())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(DatasetLoadError::MissingFile(path)),
            Err(source) => Err(DatasetLoadError::Io { path, source }),
        }
    }

    /// Groups bracket rows by country, keeping file order within a country.
    fn group_brackets(records: Vec<TaxBracketRecord>) -> BTreeMap<String, Vec<TaxBracket>> {
        let mut groups: BTreeMap<String, Vec<TaxBracket>> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.country)
                .or_default()
                .push(TaxBracket::new(record.upper_bound, record.rate));
        }
        groups
    }

    fn convert_country_deductions(
        row: CountryDeductionRecord,
        row_number: usize,
    ) -> Result<(String, CountryDeductions), DatasetLoadError> {
        let social_security = match row.ss_rate {
            Some(rate) => Some(SocialSecurityRule {
                rate,
                cap: row.ss_cap,
                reduced_rate: row.ss_reduced_rate,
            }),
            None if row.ss_cap.is_some() || row.ss_reduced_rate.is_some() => {
                return Err(DatasetLoadError::InvalidRow {
                    file: COUNTRY_DEDUCTIONS_FILE,
                    row: row_number,
                    message: format!(
                        "social security cap or reduced rate given without a rate for {}",
                        row.country
                    ),
                });
            }
            None => None,
        };

        let rules = CountryDeductions {
            social_security,
            solidarity: row.solidarity_rate.map(|rate| SolidarityRule { rate }),
        };
        Ok((row.country, rules))
    }

    fn convert_city_deduction(
        row: CityDeductionRecord,
        row_number: usize,
    ) -> Result<DeductionOverride, DatasetLoadError> {
        let amount = match (row.rate, row.flat_annual) {
            (Some(rate), None) => OverrideAmount::Rate(rate),
            (None, Some(amount)) => OverrideAmount::FlatAnnual(amount),
            (Some(_), Some(_)) => {
                return Err(DatasetLoadError::InvalidRow {
                    file: CITY_DEDUCTIONS_FILE,
                    row: row_number,
                    message: format!("'{}' sets both rate and flat_annual", row.name),
                });
            }
            (None, None) => {
                return Err(DatasetLoadError::InvalidRow {
                    file: CITY_DEDUCTIONS_FILE,
                    row: row_number,
                    message: format!("'{}' sets neither rate nor flat_annual", row.name),
                });
            }
        };

        Ok(DeductionOverride {
            name: row.name,
            amount,
        })
    }
}
