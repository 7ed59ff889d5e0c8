//! Integration tests that load the dataset under `test-data/` from disk.
//!
//! The unit tests in loader.rs parse inline strings; these exercise the
//! directory reader, optional-file handling and the hand-off to the tier
//! calculator.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use salary_core::calculations::TierCalculator;
use salary_core::{CostDataset, OverrideAmount};
use salary_data::{DatasetLoadError, DatasetLoader};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

/// Copies the fixture tables into a scratch directory, minus `skip`.
fn scratch_copy(skip: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for entry in fs::read_dir(fixture_dir()).unwrap() {
        let entry = entry.unwrap();
        let name = entry.file_name();
        if skip.iter().any(|s| name == *s) {
            continue;
        }
        fs::copy(entry.path(), dir.path().join(&name)).unwrap();
    }
    dir
}

#[test]
fn test_load_fixture_dir_succeeds() {
    let dataset = DatasetLoader::load_dir(&fixture_dir()).expect("fixture dataset should load");

    assert_eq!(dataset.cities().len(), 7);
    assert_eq!(dataset.neighborhood_count(), 5);
    assert_eq!(dataset.country_count(), 4);
    assert_eq!(dataset.exchange_rates().len(), 5);
}

#[test]
fn test_load_fixture_city_values() {
    let dataset = DatasetLoader::load_dir(&fixture_dir()).unwrap();

    let lisbon = dataset.city("Lisbon").unwrap();
    assert_eq!(lisbon.rent, dec!(1500));
    assert_eq!(lisbon.living.essentials(), dec!(950));
    assert_eq!(lisbon.locale(), Some(("EUR", "PT")));

    let dubai = dataset.city("Dubai").unwrap();
    assert_eq!(dubai.living.childcare, dec!(0));

    assert_eq!(dataset.city("Atlantis").unwrap().locale(), None);
}

#[test]
fn test_load_fixture_tax_tables() {
    let dataset = DatasetLoader::load_dir(&fixture_dir()).unwrap();

    let de = dataset.tax_brackets("DE").unwrap();
    assert_eq!(de.brackets().len(), 4);
    assert_eq!(de.brackets()[3].upper_bound, None);

    assert!(dataset.tax_brackets("AE").is_none());
    assert!(dataset.tax_brackets("PT").is_none());

    let overrides = dataset.deduction_overrides("New York");
    assert_eq!(overrides.len(), 2);
    assert_eq!(overrides[1].amount, OverrideAmount::Rate(dec!(3.876)));
    assert_eq!(
        dataset.deduction_overrides("London")[0].amount,
        OverrideAmount::FlatAnnual(dec!(1800))
    );
}

#[test]
fn test_loaded_dataset_drives_tier_calculator() {
    let dataset = DatasetLoader::load_dir(&fixture_dir()).unwrap();
    let calculator = TierCalculator::new(&dataset);

    // No tax data for AE: get-by is just the converted budget,
    // 3700 USD/month * 12 * 3.6725.
    let dubai = calculator.compute_tiers("Dubai", dec!(1)).unwrap().unwrap();
    assert_eq!(dubai.currency, "AED");
    assert_eq!(dubai.gross_get_by, dec!(163059));
    assert_eq!(dubai.effective_tax_rate, dec!(0));

    let new_york = calculator.compute_tiers("New York", dec!(1)).unwrap().unwrap();
    assert!(new_york.has_local_deductions);
    assert!(new_york.gross_get_by < new_york.gross_comfortable);
    assert!(new_york.gross_comfortable < new_york.gross_live_well);

    assert_eq!(calculator.compute_tiers("Atlantis", dec!(1)).unwrap(), None);
}

#[test]
fn test_optional_files_may_be_absent() {
    let dir = scratch_copy(&["neighborhoods.csv", "country_deductions.csv", "city_deductions.csv"]);

    let dataset = DatasetLoader::load_dir(dir.path()).unwrap();

    assert_eq!(dataset.cities().len(), 7);
    assert_eq!(dataset.neighborhood_count(), 0);
    assert!(dataset.deduction_overrides("New York").is_empty());
    assert!(dataset.country_deductions("DE").is_none());
}

#[test]
fn test_missing_required_file() {
    for required in ["cities.csv", "tax_brackets.csv", "exchange_rates.csv"] {
        let dir = scratch_copy(&[required]);

        let err = DatasetLoader::load_dir(dir.path()).unwrap_err();
        let DatasetLoadError::MissingFile(path) = err else {
            panic!("Expected MissingFile error for {required}, got: {err:?}");
        };
        assert!(path.ends_with(required));
    }
}

#[test]
fn test_malformed_row_names_the_file() {
    let dir = scratch_copy(&[]);
    fs::write(
        dir.path().join("neighborhoods.csv"),
        "city,neighborhood,multiplier\nLondon,Camden,big\n",
    )
    .unwrap();

    let err = DatasetLoader::load_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("neighborhoods.csv"), "got: {err}");
}

#[test]
fn test_duplicate_city_rejected() {
    let dir = scratch_copy(&[]);
    let mut cities = fs::read_to_string(fixture_dir().join("cities.csv")).unwrap();
    cities.push_str("Berlin,65.2,EUR,DE,1400,320,260,90,150,700\n");
    fs::write(dir.path().join("cities.csv"), cities).unwrap();

    let err = DatasetLoader::load_dir(dir.path()).unwrap_err();
    assert_eq!(err.to_string(), "city 'Berlin' is defined more than once");
}
