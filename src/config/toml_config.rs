use crate::adapters::http::DEFAULT_ENDPOINT;
use crate::core::analysis::MalformedRangePolicy;
use crate::core::export::OutputFormats;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, StatsError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: Option<ReportConfig>,
    #[serde(default)]
    pub source: SourceConfig,
    pub cache: Option<CacheConfig>,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_seconds: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(rename = "trait")]
    pub trait_name: Option<String>,
    pub on_malformed_range: Option<MalformedRangePolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StatsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| StatsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DOG_API_KEY})，找不到的保留原字串
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("source.endpoint", &self.source.endpoint)?;
        crate::utils::validation::validate_path("load.output_path", &self.load.output_path)?;
        crate::utils::validation::validate_choices(
            "load.output_formats",
            &self.load.output_formats,
            &["csv", "json"],
        )?;
        if self.load.output_formats.is_empty() {
            return Err(StatsError::InvalidConfigValueError {
                field: "load.output_formats".to_string(),
                value: "[]".to_string(),
                reason: "At least one of csv, json is required".to_string(),
            });
        }

        if let Some(timeout) = self.source.timeout_seconds {
            crate::utils::validation::validate_range("source.timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(trait_name) = &self.analysis.trait_name {
            crate::utils::validation::validate_non_empty_string("analysis.trait", trait_name)?;
        }

        Ok(())
    }

    pub fn report_name(&self) -> &str {
        self.report
            .as_ref()
            .map(|r| r.name.as_str())
            .unwrap_or("breed-stats")
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn api_key(&self) -> Option<&str> {
        // 未替換成功的 ${VAR} 視為沒有設定
        self.source
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty() && !ENV_VAR.is_match(k))
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn trait_name(&self) -> Option<&str> {
        self.analysis.trait_name.as_deref()
    }

    fn malformed_policy(&self) -> MalformedRangePolicy {
        self.analysis.on_malformed_range.unwrap_or_default()
    }

    fn output_formats(&self) -> OutputFormats {
        OutputFormats::from_names(&self.load.output_formats)
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.as_ref().map(|c| c.ttl_seconds).unwrap_or(0))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(30))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[report]
name = "weekly-breeds"

[source]
endpoint = "https://api.thedogapi.com/v1/breeds"
timeout_seconds = 10

[cache]
ttl_seconds = 600

[analysis]
trait = "Playful"
on_malformed_range = "strict"

[load]
output_path = "./test-output"
output_formats = ["csv", "json"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.report_name(), "weekly-breeds");
        assert_eq!(config.trait_name(), Some("Playful"));
        assert_eq!(config.malformed_policy(), MalformedRangePolicy::Strict);
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.output_formats().json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let toml_content = r#"
[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.malformed_policy(), MalformedRangePolicy::Degrade);
        assert_eq!(config.cache_ttl(), Duration::ZERO);
        assert!(!config.output_formats().json);
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BREED_STATS_TEST_KEY", "live-key");

        let toml_content = r#"
[source]
api_key = "${BREED_STATS_TEST_KEY}"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("live-key"));

        std::env::remove_var("BREED_STATS_TEST_KEY");
    }

    #[test]
    fn test_unresolved_env_var_means_no_key() {
        let toml_content = r#"
[source]
api_key = "${BREED_STATS_SURELY_UNSET_VAR}"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[source]
endpoint = "invalid-url"

[load]
output_path = "./output"
output_formats = ["xlsx"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_formats_select_renderings() {
        let json_only = TomlConfig::from_toml_str(
            r#"
[load]
output_path = "./output"
output_formats = ["json"]
"#,
        )
        .unwrap();
        assert!(json_only.validate().is_ok());
        assert!(!json_only.output_formats().csv);
        assert!(json_only.output_formats().json);

        let none = TomlConfig::from_toml_str(
            r#"
[load]
output_path = "./output"
output_formats = []
"#,
        )
        .unwrap();
        assert!(matches!(
            none.validate(),
            Err(StatsError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let toml_content = r#"
[analysis]
on_malformed_range = "sometimes"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        assert!(matches!(
            TomlConfig::from_toml_str(toml_content),
            Err(StatsError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[report]
name = "file-test"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.report_name(), "file-test");
    }
}
