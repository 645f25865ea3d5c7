pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{http::HttpFetcher, storage::LocalStorage};
pub use app::pipelines::SpecPipeline;
pub use crate::core::{aggregator::aggregate, etl::EtlEngine};
pub use utils::error::{EtlError, Result};
