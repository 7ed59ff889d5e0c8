//! The page generation run.
//!
//! For every city in load order the pipeline computes the city's tiers and
//! those of each neighborhood, then writes one page per city, one per
//! neighborhood, the index and the sitemaps. A city or neighborhood that
//! cannot be priced is skipped or counted as failed without stopping the
//! run; only a sink error aborts it.
//!
//! | Artifact | Path |
//! |----------|------|
//! | City page | `{city}.html` |
//! | Neighborhood page | `{city}/{neighborhood}.html` |
//! | Index | `index.html` |
//! | Sitemap | `sitemap.xml`, plus `sitemap-N.xml` when chunked |

use std::collections::BTreeMap;
use std::io;

use rust_decimal::Decimal;
use salary_core::calculations::{TierCalculator, TierError};
use salary_core::{CostDataset, SalaryTiers};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigError, SiteConfig};
use crate::render::{CityView, IndexEntry, NeighborhoodTiers, Renderer};
use crate::sink::ArtifactSink;
use crate::sitemap::build_sitemaps;
use crate::slug::slugify;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("'{name}' has slug '{slug}', already used by '{existing}'")]
    SlugCollision {
        name: String,
        existing: String,
        slug: String,
    },

    #[error("'{name}' has slug '{slug}', which is reserved")]
    ReservedSlug {
        name: String,
        slug: String,
    },

    #[error("'{0}' has no characters usable in a slug")]
    EmptySlug(String),

    #[error(transparent)]
    Tier(#[from] TierError),

    #[error("cannot write artifact '{path}': {source}")]
    Sink {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What a generation run produced.
#[derive(Debug, Default)]
pub struct GenerationSummary {
    /// City pages written.
    pub cities: usize,
    /// Neighborhood pages written.
    pub neighborhoods: usize,
    /// Cities and neighborhoods left out for missing data or unusable slugs.
    pub skipped: usize,
    /// Cities and neighborhoods whose tiers could not be computed.
    pub failed: usize,
    /// Every file written, including the index and sitemaps.
    pub artifacts: usize,
    /// Per-entry problems in the order they were found.
    pub problems: Vec<PipelineError>,
}

impl GenerationSummary {
    /// City, neighborhood and index pages.
    pub fn pages(&self) -> usize {
        self.cities + self.neighborhoods + 1
    }
}

/// Slugs no city may take because a generated file already uses the path.
const RESERVED_CITY_SLUGS: &[&str] = &["index"];

/// Assigns slugs within one namespace (all cities, or the neighborhoods of
/// one city), rejecting empty, reserved and already taken slugs.
#[derive(Default)]
struct SlugRegistry {
    reserved: &'static [&'static str],
    taken: BTreeMap<String, String>,
}

impl SlugRegistry {
    fn reserving(reserved: &'static [&'static str]) -> Self {
        Self {
            reserved,
            taken: BTreeMap::new(),
        }
    }

    fn claim(
        &mut self,
        name: &str,
    ) -> Result<String, PipelineError> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(PipelineError::EmptySlug(name.to_string()));
        }
        if self.reserved.contains(&slug.as_str()) {
            return Err(PipelineError::ReservedSlug {
                name: name.to_string(),
                slug,
            });
        }
        if let Some(existing) = self.taken.get(&slug) {
            return Err(PipelineError::SlugCollision {
                name: name.to_string(),
                existing: existing.clone(),
                slug,
            });
        }
        self.taken.insert(slug.clone(), name.to_string());
        Ok(slug)
    }
}

struct Generator<'a, D: CostDataset + ?Sized, S: ArtifactSink + ?Sized> {
    calculator: TierCalculator<'a, D>,
    renderer: Renderer<'a>,
    sink: &'a mut S,
    summary: GenerationSummary,
    urls: Vec<String>,
}

/// Generates every page for `dataset` into `sink`.
///
/// # Errors
///
/// [`PipelineError::Config`] for invalid settings and
/// [`PipelineError::Sink`] when an artifact cannot be written. Problems
/// with individual cities end up in [`GenerationSummary::problems`].
pub fn generate<D, S>(
    dataset: &D,
    config: &SiteConfig,
    sink: &mut S,
) -> Result<GenerationSummary, PipelineError>
where
    D: CostDataset + ?Sized,
    S: ArtifactSink + ?Sized,
{
    config.validate()?;
    let lastmod = config.lastmod_date()?.format("%Y-%m-%d").to_string();

    info!(
        cities = dataset.cities().len(),
        policy = ?config.missing_tax_data,
        "generating salary pages"
    );

    let mut generator = Generator {
        calculator: TierCalculator::new(dataset)
            .with_inversion(config.inversion.clone())
            .with_policy(config.missing_tax_data),
        renderer: Renderer::new(config),
        sink,
        summary: GenerationSummary::default(),
        urls: Vec::new(),
    };

    let index_url = generator.renderer.absolute(&generator.renderer.index_path());
    generator.urls.push(index_url);

    let mut city_slugs = SlugRegistry::reserving(RESERVED_CITY_SLUGS);
    let mut index = Vec::new();
    for city in dataset.cities() {
        if let Some(entry) = generator.city(&city.name, &mut city_slugs)? {
            index.push(entry);
        }
    }

    index.sort_by(|a, b| a.name.cmp(&b.name));
    let index_html = generator.renderer.index_page(&index);
    generator.emit("index.html", &index_html)?;

    let sitemaps = build_sitemaps(
        &generator.urls,
        &config.site_root(),
        &lastmod,
        config.sitemap_chunk_size,
    );
    for file in sitemaps {
        generator.emit(&file.name, &file.contents)?;
    }

    let summary = generator.summary;
    info!(
        cities = summary.cities,
        neighborhoods = summary.neighborhoods,
        skipped = summary.skipped,
        failed = summary.failed,
        artifacts = summary.artifacts,
        "generation finished"
    );
    Ok(summary)
}

impl<D: CostDataset + ?Sized, S: ArtifactSink + ?Sized> Generator<'_, D, S> {
    /// Writes the pages of one city and returns its index entry, or `None`
    /// when the city could not be priced or its slug is unusable.
    ///
    /// Slugs are claimed only once tiers exist, so an entry that produces no
    /// page never blocks a later one.
    fn city(
        &mut self,
        name: &str,
        city_slugs: &mut SlugRegistry,
    ) -> Result<Option<IndexEntry>, PipelineError> {
        let Some(tiers) = self.tiers(name, None, Decimal::ONE) else {
            return Ok(None);
        };
        let Some(record) = self.calculator.dataset().city(name) else {
            return Ok(None);
        };
        let Some((_, country)) = record.locale() else {
            return Ok(None);
        };
        let city_slug = match city_slugs.claim(name) {
            Ok(slug) => slug,
            Err(problem) => {
                self.skip(problem);
                return Ok(None);
            }
        };
        let slug = city_slug.as_str();

        let mut nb_slugs = SlugRegistry::default();
        let mut neighborhoods = Vec::new();
        for neighborhood in self.calculator.dataset().neighborhoods(name) {
            let nb_name = neighborhood.name.as_str();
            let Some(nb_tiers) = self.tiers(name, Some(nb_name), neighborhood.multiplier) else {
                continue;
            };
            match nb_slugs.claim(nb_name) {
                Ok(nb_slug) => neighborhoods.push(NeighborhoodTiers {
                    name: nb_name.to_string(),
                    slug: nb_slug,
                    tiers: nb_tiers,
                }),
                Err(problem) => self.skip(problem),
            }
        }
        neighborhoods.sort_by(|a, b| {
            b.tiers
                .gross_comfortable
                .cmp(&a.tiers.gross_comfortable)
                .then_with(|| a.name.cmp(&b.name))
        });

        let view = CityView {
            name,
            slug,
            country,
            tiers: &tiers,
            neighborhoods: &neighborhoods,
        };

        let city_path = format!("{slug}.html");
        let city_html = self.renderer.city_page(&view);
        self.emit(&city_path, &city_html)?;
        self.urls.push(self.renderer.absolute(&self.renderer.city_path(slug)));
        self.summary.cities += 1;

        for neighborhood in &neighborhoods {
            let path = format!("{slug}/{}.html", neighborhood.slug);
            let html = self.renderer.neighborhood_page(&view, neighborhood);
            self.emit(&path, &html)?;
            self.urls.push(
                self.renderer
                    .absolute(&self.renderer.neighborhood_path(slug, &neighborhood.slug)),
            );
            self.summary.neighborhoods += 1;
        }

        Ok(Some(IndexEntry {
            name: name.to_string(),
            slug: slug.to_string(),
            currency: tiers.currency.clone(),
            comfortable: tiers.gross_comfortable,
        }))
    }

    /// Tiers for a city (`neighborhood` is `None`) or one of its
    /// neighborhoods. Missing data and failures are recorded, not returned.
    fn tiers(
        &mut self,
        city: &str,
        neighborhood: Option<&str>,
        multiplier: Decimal,
    ) -> Option<SalaryTiers> {
        match self.calculator.compute_tiers(city, multiplier) {
            Ok(Some(tiers)) => Some(tiers),
            Ok(None) => {
                warn!(city, neighborhood, "skipping: no currency, country or tax data");
                self.summary.skipped += 1;
                None
            }
            Err(err) => {
                error!(city, neighborhood, error = %err, "cannot compute salary tiers");
                self.summary.failed += 1;
                self.summary.problems.push(PipelineError::Tier(err));
                None
            }
        }
    }

    fn skip(
        &mut self,
        problem: PipelineError,
    ) {
        warn!(error = %problem, "skipping");
        self.summary.skipped += 1;
        self.summary.problems.push(problem);
    }

    fn emit(
        &mut self,
        path: &str,
        contents: &str,
    ) -> Result<(), PipelineError> {
        self.sink
            .write(path, contents)
            .map_err(|source| PipelineError::Sink {
                path: path.to_string(),
                source,
            })?;
        debug!(path, "emitted");
        self.summary.artifacts += 1;
        Ok(())
    }
}
