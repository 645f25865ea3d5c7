use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_fetch_settings, validate_path, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONCURRENT_REQUESTS: usize = 4;
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_USER_AGENT: &str = "spec-bot";

static ENV_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub paths: PathsConfig,
    pub fetch: Option<FetchConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub data_dir: String,
    pub seed_file: Option<String>,
    pub sources_file: Option<String>,
    pub output_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchConfig {
    pub concurrent_requests: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| EtlError::InputLoadError {
            path: path.as_ref().display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SPEC_DATA_DIR})，未定義的保留原文
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        &self.paths.data_dir
    }

    fn seed_file(&self) -> &str {
        self.paths.seed_file.as_deref().unwrap_or("specs_seed.json")
    }

    fn sources_file(&self) -> &str {
        self.paths.sources_file.as_deref().unwrap_or("sources.json")
    }

    fn output_file(&self) -> &str {
        self.paths.output_file.as_deref().unwrap_or("specs.json")
    }

    fn concurrent_requests(&self) -> usize {
        self.fetch
            .as_ref()
            .and_then(|f| f.concurrent_requests)
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }

    fn timeout_secs(&self) -> u64 {
        self.fetch
            .as_ref()
            .and_then(|f| f.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    fn user_agent(&self) -> &str {
        self.fetch
            .as_ref()
            .and_then(|f| f.user_agent.as_deref())
            .unwrap_or(DEFAULT_USER_AGENT)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("paths.data_dir", self.data_dir())?;
        validate_path("paths.seed_file", self.seed_file())?;
        validate_path("paths.sources_file", self.sources_file())?;
        validate_path("paths.output_file", self.output_file())?;
        validate_fetch_settings(
            self.concurrent_requests(),
            self.timeout_secs(),
            self.user_agent(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[pipeline]
name = "phone-specs"
version = "1.0.0"

[paths]
data_dir = "./data"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "phone-specs");
        assert_eq!(config.seed_file(), "specs_seed.json");
        assert_eq!(config.sources_file(), "sources.json");
        assert_eq!(config.output_file(), "specs.json");
        assert_eq!(config.concurrent_requests(), 4);
        assert_eq!(config.timeout_secs(), 20);
        assert_eq!(config.user_agent(), "spec-bot");
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[pipeline]
name = "phone-specs"
description = "Nightly refresh"
version = "2.0"

[paths]
data_dir = "/srv/specs"
seed_file = "seed.json"
sources_file = "feeds.json"
output_file = "public/specs.json"

[fetch]
concurrent_requests = 2
timeout_seconds = 5
user_agent = "spec-bot/2.0"

[logging]
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.seed_file(), "seed.json");
        assert_eq!(config.sources_file(), "feeds.json");
        assert_eq!(config.output_file(), "public/specs.json");
        assert_eq!(config.concurrent_requests(), 2);
        assert_eq!(config.timeout_secs(), 5);
        assert_eq!(config.user_agent(), "spec-bot/2.0");
        assert!(config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PHONE_SPEC_TEST_DATA_DIR", "/var/lib/specs");

        let toml_content = r#"
[pipeline]
name = "test"
version = "1.0"

[paths]
data_dir = "${PHONE_SPEC_TEST_DATA_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_dir(), "/var/lib/specs");

        std::env::remove_var("PHONE_SPEC_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[pipeline]
name = "test"
version = "1.0"

[paths]
data_dir = "./data"

[fetch]
timeout_seconds = 0
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[pipeline\nname =").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"
version = "1.0"

[paths]
data_dir = "./data"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
    }

    #[test]
    fn test_missing_file_is_input_error() {
        let err = TomlConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, EtlError::InputLoadError { .. }));
    }
}
