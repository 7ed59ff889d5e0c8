pub mod config;
pub mod country;
pub mod currency;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod sink;
pub mod sitemap;
pub mod slug;

pub use config::{ConfigError, SiteConfig};
pub use pipeline::{GenerationSummary, PipelineError, generate};
pub use sink::{ArtifactSink, FsSink, MemorySink};
