use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_fetch_settings, validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "phone-spec-etl")]
#[command(about = "Refresh the phone spec catalog with matching news from RSS feeds")]
pub struct CliConfig {
    /// Directory holding the seed catalog, the source list and the output document
    #[arg(long, env = "SPEC_DATA_DIR", default_value = "data")]
    pub data_dir: String,

    #[arg(long, default_value = "specs_seed.json")]
    pub seed_file: String,

    #[arg(long, default_value = "sources.json")]
    pub sources_file: String,

    #[arg(long, default_value = "specs.json")]
    pub output_file: String,

    #[arg(long, default_value = "4")]
    pub concurrent_requests: usize,

    /// Per-source request timeout
    #[arg(long, default_value = "20")]
    pub timeout_secs: u64,

    #[arg(long, default_value = "spec-bot")]
    pub user_agent: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn seed_file(&self) -> &str {
        &self.seed_file
    }

    fn sources_file(&self) -> &str {
        &self.sources_file
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_path("seed_file", &self.seed_file)?;
        validate_path("sources_file", &self.sources_file)?;
        validate_path("output_file", &self.output_file)?;
        validate_fetch_settings(self.concurrent_requests, self.timeout_secs, &self.user_agent)
    }
}
