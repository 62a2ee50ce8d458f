pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::http::DEFAULT_ENDPOINT;
#[cfg(feature = "cli")]
use crate::config::toml_config::{CacheConfig, TomlConfig};
#[cfg(feature = "cli")]
use crate::core::analysis::MalformedRangePolicy;
#[cfg(feature = "cli")]
use crate::core::export::OutputFormats;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "breed-stats")]
#[command(about = "Dog breed statistics from TheDogAPI")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, env = "DOG_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long = "trait", help = "Temperament trait to compute per-group prevalence for")]
    pub trait_name: Option<String>,

    #[arg(long, help = "Fail on malformed range values instead of skipping them")]
    pub strict_ranges: bool,

    #[arg(long, help = "Also write tables.json into the bundle")]
    pub json: bool,

    #[arg(long, help = "Cache fetched records for N seconds (default 0, disabled)")]
    pub cache_ttl_secs: Option<u64>,

    #[arg(long, help = "HTTP timeout in seconds (default 30)")]
    pub timeout_secs: Option<u64>,

    #[arg(
        long,
        help = "Load settings from a TOML file; --api-key, --trait, --strict-ranges, --json, \
                --cache-ttl-secs and --timeout-secs still override it"
    )]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines on stderr")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn trait_name(&self) -> Option<&str> {
        self.trait_name.as_deref()
    }

    fn malformed_policy(&self) -> MalformedRangePolicy {
        if self.strict_ranges {
            MalformedRangePolicy::Strict
        } else {
            MalformedRangePolicy::Degrade
        }
    }

    fn output_formats(&self) -> OutputFormats {
        OutputFormats {
            csv: true,
            json: self.json,
        }
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.unwrap_or(0))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(30))
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Applies the flags given on the command line on top of a TOML config.
    /// The API key also comes from `DOG_API_KEY` through clap.
    pub fn override_toml(&self, config: &mut TomlConfig) {
        if let Some(key) = ConfigProvider::api_key(self) {
            config.source.api_key = Some(key.to_string());
        }
        if let Some(timeout) = self.timeout_secs {
            config.source.timeout_seconds = Some(timeout);
        }
        if let Some(ttl_seconds) = self.cache_ttl_secs {
            config.cache = Some(CacheConfig { ttl_seconds });
        }
        if self.trait_name.is_some() {
            config.analysis.trait_name = self.trait_name.clone();
        }
        if self.strict_ranges {
            config.analysis.on_malformed_range = Some(MalformedRangePolicy::Strict);
        }
        if self.json && !config.load.output_formats.iter().any(|f| f == "json") {
            config.load.output_formats.push("json".to_string());
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_path("output_path", &self.output_path)?;
        if let Some(timeout) = self.timeout_secs {
            validate_range("timeout_secs", timeout, 1, 300)?;
        }
        if let Some(trait_name) = &self.trait_name {
            validate_non_empty_string("trait", trait_name)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["breed-stats"]);

        assert_eq!(config.api_endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.output_path, "./output");
        assert_eq!(config.malformed_policy(), MalformedRangePolicy::Degrade);
        assert_eq!(config.cache_ttl(), Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_flags() {
        let config = CliConfig::parse_from([
            "breed-stats",
            "--trait",
            "Playful",
            "--strict-ranges",
            "--api-key",
            "abc",
            "--cache-ttl-secs",
            "600",
        ]);

        assert_eq!(config.trait_name(), Some("Playful"));
        assert_eq!(config.api_key(), Some("abc"));
        assert_eq!(config.malformed_policy(), MalformedRangePolicy::Strict);
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_cli_flags_override_toml() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[source]
api_key = "file-key"
timeout_seconds = 10

[cache]
ttl_seconds = 60

[analysis]
trait = "Calm"

[load]
output_path = "./out"
output_formats = ["csv"]
"#,
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "breed-stats",
            "--config",
            "report.toml",
            "--api-key",
            "cli-key",
            "--json",
            "--cache-ttl-secs",
            "0",
            "--trait",
            "Playful",
        ]);
        cli.override_toml(&mut config);

        assert_eq!(config.api_key(), Some("cli-key"));
        assert_eq!(config.cache_ttl(), Duration::ZERO);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.trait_name(), Some("Playful"));
        assert_eq!(
            config.output_formats(),
            OutputFormats {
                csv: true,
                json: true
            }
        );
        assert_eq!(config.malformed_policy(), MalformedRangePolicy::Degrade);
    }

    #[test]
    fn test_absent_flags_keep_toml_values() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[source]
api_key = "file-key"

[cache]
ttl_seconds = 60

[load]
output_path = "./out"
output_formats = ["json"]
"#,
        )
        .unwrap();

        let cli = CliConfig::parse_from(["breed-stats", "--config", "report.toml", "--api-key", " "]);
        cli.override_toml(&mut config);

        assert_eq!(config.api_key(), Some("file-key"));
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.output_formats(), OutputFormats::from_names(&["json"]));
    }

    #[test]
    fn test_cli_validation_rejects_blank_trait() {
        let config = CliConfig::parse_from(["breed-stats", "--trait", " "]);
        assert!(config.validate().is_err());
    }
}
