//! Site generation settings.
//!
//! Settings come from an optional TOML file; every key has a default so an
//! empty file (or no file at all) is valid. Command-line flags are applied
//! on top by the binary.
//!
//! ```toml
//! dataset_dir = "data"
//! output_dir = "public/salary-needed"
//! base_url = "https://salary-converter.com"
//! year = 2026
//! missing_tax_data = "exclude"
//!
//! [inversion]
//! max_multiplier = 500
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use salary_core::calculations::{InversionConfig, InversionError, MissingTaxDataPolicy};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("sitemap_chunk_size must be at least 1")]
    ZeroChunkSize,

    #[error("base_url must not be empty")]
    EmptyBaseUrl,

    #[error("path_prefix must start with '/', got '{0}'")]
    InvalidPathPrefix(String),

    #[error("lastmod must be a date like 2026-01-01, got '{0}'")]
    InvalidLastmod(String),

    #[error(transparent)]
    Inversion(#[from] InversionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding the dataset CSV tables.
    pub dataset_dir: PathBuf,
    /// Directory the pages are written to.
    pub output_dir: PathBuf,
    /// Scheme and host used for canonical links and sitemaps.
    pub base_url: String,
    /// URL path the output directory is served under.
    pub path_prefix: String,
    /// Year shown in titles and copy.
    pub year: i32,
    /// Sitemap `lastmod` date; defaults to January 1st of `year`.
    pub lastmod: Option<String>,
    pub sitemap_chunk_size: usize,
    pub missing_tax_data: MissingTaxDataPolicy,
    pub inversion: InversionConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("salary-needed"),
            base_url: "https://salary-converter.com".to_string(),
            path_prefix: "/salary-needed".to_string(),
            year: 2026,
            lastmod: None,
            sitemap_chunk_size: 2000,
            missing_tax_data: MissingTaxDataPolicy::default(),
            inversion: InversionConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sitemap_chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !self.path_prefix.starts_with('/') {
            return Err(ConfigError::InvalidPathPrefix(self.path_prefix.clone()));
        }
        self.lastmod_date()?;
        self.inversion.validate()?;
        Ok(())
    }

    pub fn lastmod_date(&self) -> Result<NaiveDate, ConfigError> {
        match &self.lastmod {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ConfigError::InvalidLastmod(raw.clone())),
            None => NaiveDate::from_ymd_opt(self.year, 1, 1)
                .ok_or_else(|| ConfigError::InvalidLastmod(format!("{}-01-01", self.year))),
        }
    }

    /// Absolute URL of the page directory, without a trailing slash.
    pub fn site_root(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.path_prefix.trim_end_matches('/')
        )
    }

    /// Root-relative path of the page directory, without a trailing slash.
    pub fn prefix(&self) -> &str {
        self.path_prefix.trim_end_matches('/')
    }
}
