use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use salary_core::calculations::MissingTaxDataPolicy;
use salary_data::DatasetLoader;
use salary_site::{FsSink, GenerationSummary, MemorySink, SiteConfig, generate, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Generates the "What salary do you need in X?" pages.
///
/// Loads the cost-of-living dataset, computes the salary tiers of every
/// city and neighborhood, and writes one HTML page for each plus an index
/// and sitemaps. Flags override values from the config file.
#[derive(Debug, Parser)]
#[command(name = "salary-needed")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing the dataset CSV files.
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Directory the pages are written to.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Scheme and host for canonical links, e.g. `https://example.org`.
    #[arg(long)]
    base_url: Option<String>,

    /// Year shown on the pages.
    #[arg(long)]
    year: Option<i32>,

    /// What to do with cities whose country has no tax data.
    #[arg(long, value_enum)]
    missing_tax_data: Option<PolicyArg>,

    /// Compute everything but write nothing.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Also append log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Command-line names of [`MissingTaxDataPolicy`], matching the config file.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Compute as if the country levied no tax or deductions.
    AssumeZero,
    /// Leave the city out.
    Exclude,
}

impl From<PolicyArg> for MissingTaxDataPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::AssumeZero => MissingTaxDataPolicy::AssumeZero,
            PolicyArg::Exclude => MissingTaxDataPolicy::Exclude,
        }
    }
}

impl Cli {
    /// Loads the config file (or defaults) and applies the flags on top.
    fn site_config(&self) -> Result<SiteConfig> {
        let mut config = match &self.config {
            Some(path) => SiteConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => SiteConfig::default(),
        };

        if let Some(dataset) = &self.dataset {
            config.dataset_dir = dataset.clone();
        }
        if let Some(out) = &self.out {
            config.output_dir = out.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(year) = self.year {
            config.year = year;
        }
        if let Some(policy) = self.missing_tax_data {
            config.missing_tax_data = policy.into();
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

// ─── output ──────────────────────────────────────────────────────────────────

fn print_summary(summary: &GenerationSummary) {
    println!(
        "Generated: {} city pages + {} neighborhood pages + 1 index page",
        summary.cities, summary.neighborhoods
    );
    println!("Total: {} pages ({} files)", summary.pages(), summary.artifacts);
    if summary.skipped > 0 || summary.failed > 0 {
        println!("Skipped: {}, failed: {}", summary.skipped, summary.failed);
    }
    for problem in &summary.problems {
        println!("  - {problem}");
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = cli.site_config()?;
    debug!(?config, "resolved configuration");

    let dataset = DatasetLoader::load_dir(&config.dataset_dir).with_context(|| {
        format!("Failed to load dataset: {}", config.dataset_dir.display())
    })?;

    let summary = if cli.dry_run {
        let mut sink = MemorySink::new();
        let summary = generate(&dataset, &config, &mut sink).context("Generation failed")?;
        info!(files = sink.len(), bytes = sink.total_bytes(), "dry run, nothing written");
        summary
    } else {
        let mut sink = FsSink::new(&config.output_dir);
        generate(&dataset, &config, &mut sink).with_context(|| {
            format!("Generation failed writing to {}", config.output_dir.display())
        })?
    };

    print_summary(&summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_policy_flag_uses_config_names() {
        let cli = Cli::try_parse_from(["salary-needed", "--missing-tax-data", "exclude"]).unwrap();
        let config = cli.site_config().unwrap();

        assert_eq!(config.missing_tax_data, MissingTaxDataPolicy::Exclude);
    }

    #[test]
    fn test_policy_flag_lists_allowed_values() {
        let err = Cli::try_parse_from(["salary-needed", "--missing-tax-data", "ignore"]).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("assume-zero"));
        assert!(message.contains("exclude"));
    }
}
