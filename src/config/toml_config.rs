use crate::core::probe::{ProbeSettings, DEFAULT_ASSET, DEFAULT_ITERATIONS, DEFAULT_QUERY};
use crate::core::RetryPolicy;
use crate::utils::error::{FixtureError, Result};
use crate::utils::validation::{
    validate_asset_name, validate_log_level, validate_non_empty, validate_path,
    validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestkitConfig {
    #[serde(default)]
    pub fixtures: FixturesConfig,
    #[serde(default)]
    pub copy: CopyConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
    /// Resource root; assets are looked up under `<assets_dir>/assets/`.
    pub assets_dir: String,
    pub cache_dir: String,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            assets_dir: "./assets-root".to_string(),
            cache_dir: std::env::temp_dir()
                .join("rsdroid-testkit")
                .to_string_lossy()
                .into_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyConfig {
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            retry_attempts: Some(RetryPolicy::DEFAULT_ATTEMPTS),
            retry_delay_ms: Some(RetryPolicy::DEFAULT_DELAY.as_millis() as u64),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub asset: Option<String>,
    pub iterations: Option<usize>,
    pub query: Option<String>,
    pub sample_every: Option<usize>,
    pub fd_growth_warn: Option<usize>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            asset: Some(DEFAULT_ASSET.to_string()),
            iterations: Some(DEFAULT_ITERATIONS),
            query: Some(DEFAULT_QUERY.to_string()),
            sample_every: None,
            fd_growth_warn: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TestkitConfig {
    /// Loads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| FixtureError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FixtureError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` placeholders with environment values; unset ones are kept.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FixtureError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn assets_dir(&self) -> PathBuf {
        PathBuf::from(&self.fixtures.assets_dir)
    }

    pub fn cache_dir(&self) -> PathBuf {
        PathBuf::from(&self.fixtures.cache_dir)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy::new(
            self.copy.retry_attempts.unwrap_or(defaults.attempts),
            self.copy
                .retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.delay),
        )
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        let defaults = ProbeSettings::default();
        ProbeSettings {
            asset: self.probe.asset.clone().unwrap_or(defaults.asset),
            iterations: self.probe.iterations.unwrap_or(defaults.iterations),
            query: self.probe.query.clone().unwrap_or(defaults.query),
            sample_every: self.probe.sample_every.unwrap_or(defaults.sample_every),
            fd_growth_warn: self.probe.fd_growth_warn.unwrap_or(defaults.fd_growth_warn),
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// Crate log level from `[monitoring] log_level`, used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl Validate for TestkitConfig {
    fn validate(&self) -> Result<()> {
        validate_path("fixtures.assets_dir", &self.fixtures.assets_dir)?;
        validate_path("fixtures.cache_dir", &self.fixtures.cache_dir)?;

        if let Some(attempts) = self.copy.retry_attempts {
            validate_positive_number("copy.retry_attempts", attempts as usize, 1)?;
        }

        let probe = self.probe_settings();
        validate_asset_name(&probe.asset)?;
        validate_positive_number("probe.iterations", probe.iterations, 1)?;
        validate_positive_number("probe.sample_every", probe.sample_every, 1)?;
        validate_non_empty("probe.query", &probe.query)?;

        if let Some(level) = self.log_level() {
            validate_log_level("monitoring.log_level", level)?;
        }

        Ok(())
    }
}
