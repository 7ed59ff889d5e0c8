use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use salary_core::CostDataset;
use salary_data::DatasetLoader;

/// Load a cost-of-living dataset directory and report what it contains.
///
/// The directory must hold `cities.csv`, `tax_brackets.csv` and
/// `exchange_rates.csv`; `neighborhoods.csv`, `country_deductions.csv` and
/// `city_deductions.csv` are optional. Cities that cannot be priced because
/// their currency or country is blank, or whose country has no tax data,
/// are listed so they can be fixed before generating pages.
#[derive(Parser, Debug)]
#[command(name = "salary-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the dataset CSV files
    #[arg(short, long)]
    dir: PathBuf,

    /// List every city with incomplete data instead of just counting them
    #[arg(short, long, default_value_t = false)]
    list: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading dataset from: {}", args.dir.display());

    let dataset = DatasetLoader::load_dir(&args.dir)
        .with_context(|| format!("Failed to load dataset: {}", args.dir.display()))?;

    let cities = dataset.cities();
    println!("Cities:        {}", cities.len());
    println!("Neighborhoods: {}", dataset.neighborhood_count());
    println!("Countries:     {}", dataset.country_count());
    println!("Currencies:    {}", dataset.exchange_rates().len());

    let mut no_locale = Vec::new();
    let mut no_tax_data = BTreeSet::new();
    for city in cities {
        match city.locale() {
            None => no_locale.push(city.name.as_str()),
            Some((_, country))
                if dataset.tax_brackets(country).is_none()
                    && dataset.country_deductions(country).is_none() =>
            {
                no_tax_data.insert(country);
            }
            Some(_) => {}
        }
    }

    println!(
        "{} cities have no currency or country and will be skipped.",
        no_locale.len()
    );
    if args.list {
        for name in &no_locale {
            println!("  - {name}");
        }
    }

    println!(
        "{} countries have no tax data: {}",
        no_tax_data.len(),
        no_tax_data.into_iter().collect::<Vec<_>>().join(", ")
    );

    println!("Dataset OK.");
    Ok(())
}
